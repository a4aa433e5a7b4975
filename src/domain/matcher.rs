//! Cross-venue market matching by title token overlap.
//!
//! Titles are reduced to sets of lowercase alphabetic words with common
//! stop-words removed, and two markets match when the Jaccard index of
//! their sets reaches the threshold. Every cross-venue pair is compared;
//! a market may match several counterparts.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::market::Market;

/// Default similarity a cross-venue pair must reach to be matched.
pub const DEFAULT_MATCH_THRESHOLD: Decimal = dec!(0.30);

static RE_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z]+").unwrap());
static RE_TERM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?[km]?|[a-z]+").unwrap());

const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "been", "by", "do", "does", "for", "from", "has",
    "have", "if", "in", "is", "it", "of", "on", "or", "than", "that", "the", "this", "to", "was",
    "will", "with",
];

/// Set of content words in a title.
pub type TokenSet = BTreeSet<String>;

/// Lowercase alphabetic words of `title`, minus stop-words.
pub fn tokenize(title: &str) -> TokenSet {
    terms(&RE_WORD, title)
}

/// Like [`tokenize`], but numbers such as `100k` or `2.5` are kept as terms.
///
/// Used for topic grouping, where "$100k" and "$150k" are different events.
pub fn tokenize_with_numbers(title: &str) -> TokenSet {
    terms(&RE_TERM, title)
}

fn terms(pattern: &Regex, title: &str) -> TokenSet {
    let lower = title.to_lowercase();
    pattern
        .find_iter(&lower)
        .map(|m| m.as_str())
        .filter(|word| !STOP_WORDS.contains(word))
        .map(str::to_string)
        .collect()
}

/// Jaccard index `|a ∩ b| / |a ∪ b|`, exact in decimal. Two empty sets score 0.
pub fn jaccard(a: &TokenSet, b: &TokenSet) -> Decimal {
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        return Decimal::ZERO;
    }
    Decimal::from(intersection) / Decimal::from(union)
}

/// Similarity of two titles.
pub fn title_similarity(a: &str, b: &str) -> Decimal {
    jaccard(&tokenize(a), &tokenize(b))
}

/// Hypothesis that two markets on different venues describe the same event.
#[derive(Debug, Clone, Copy)]
pub struct MatchedPair<'a> {
    /// Market on venue A.
    pub market_a: &'a Market,
    /// Market on venue B.
    pub market_b: &'a Market,
    /// Token-overlap score that produced the match.
    pub similarity: Decimal,
}

/// Index form of a match: positions into the two input slices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchIndex {
    pub a: usize,
    pub b: usize,
    pub similarity: Decimal,
}

/// Compare every `(a, b)` title pair and keep those at or above `threshold`.
///
/// Output is ordered by `a` then `b` index.
pub fn match_titles<A, B>(titles_a: &[A], titles_b: &[B], threshold: Decimal) -> Vec<MatchIndex>
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    let tokens_b: Vec<TokenSet> = titles_b.iter().map(|t| tokenize(t.as_ref())).collect();
    let mut matches = Vec::new();

    for (a, title) in titles_a.iter().enumerate() {
        let tokens_a = tokenize(title.as_ref());
        for (b, tokens) in tokens_b.iter().enumerate() {
            let similarity = jaccard(&tokens_a, tokens);
            if similarity >= threshold {
                matches.push(MatchIndex { a, b, similarity });
            }
        }
    }

    matches
}

/// Pair markets across venues.
pub fn match_markets<'a>(
    markets_a: &'a [Market],
    markets_b: &'a [Market],
    threshold: Decimal,
) -> Vec<MatchedPair<'a>> {
    let titles_a: Vec<&str> = markets_a.iter().map(Market::title).collect();
    let titles_b: Vec<&str> = markets_b.iter().map(Market::title).collect();

    match_titles(&titles_a, &titles_b, threshold)
        .into_iter()
        .map(|m| MatchedPair {
            market_a: &markets_a[m.a],
            market_b: &markets_b[m.b],
            similarity: m.similarity,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_drops_stop_words_digits_and_punctuation() {
        let tokens = tokenize("Will the Fed cut rates by March 2026?");
        let expected: TokenSet = ["fed", "cut", "rates", "march"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(tokens, expected);
    }

    #[test]
    fn jaccard_of_empty_sets_is_zero() {
        assert_eq!(jaccard(&TokenSet::new(), &TokenSet::new()), Decimal::ZERO);
    }

    #[test]
    fn similarity_is_exact_fraction() {
        // {x, happen, march} vs {x, march}
        assert_eq!(
            title_similarity("Will X happen by March 2026", "X by March"),
            Decimal::from(2) / Decimal::from(3)
        );
    }

    #[test]
    fn similarity_is_symmetric() {
        let a = "Will the Fed cut rates in March?";
        let b = "Fed rate cut March meeting";
        assert_eq!(title_similarity(a, b), title_similarity(b, a));
    }

    #[test]
    fn default_threshold_is_thirty_percent() {
        assert_eq!(DEFAULT_MATCH_THRESHOLD, dec!(0.30));
    }

    #[test]
    fn match_titles_keeps_pairs_at_threshold() {
        // 3 shared of 10 distinct words -> exactly 0.30
        let a = ["alpha beta gamma delta epsilon zeta"];
        let b = ["alpha beta gamma eta theta iota kappa"];
        let matches = match_titles(&a, &b, dec!(0.30));
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].similarity, dec!(0.3));
    }

    #[test]
    fn match_titles_allows_many_to_many() {
        let a = ["bitcoin above hundred thousand"];
        let b = [
            "bitcoin above hundred thousand",
            "bitcoin above hundred thousand dollars",
        ];
        let matches = match_titles(&a, &b, dec!(0.30));
        assert_eq!(matches.len(), 2);
        assert_eq!((matches[0].a, matches[0].b), (0, 0));
        assert_eq!((matches[1].a, matches[1].b), (0, 1));
    }

    #[test]
    fn match_titles_rejects_pairs_below_threshold() {
        // 3 shared of 11 distinct words -> 0.2727...
        let a = ["alpha beta gamma delta epsilon zeta eta"];
        let b = ["alpha beta gamma theta iota kappa lambda"];
        assert_eq!(
            title_similarity(a[0], b[0]),
            Decimal::from(3) / Decimal::from(11)
        );
        assert!(match_titles(&a, &b, DEFAULT_MATCH_THRESHOLD).is_empty());

        let a = ["alpha beta gamma delta epsilon zeta"];
        let b = ["alpha beta gamma eta theta iota kappa"];
        assert!(match_titles(&a, &b, dec!(0.3001)).is_empty());
    }

    #[test]
    fn match_titles_is_symmetric_under_side_swap() {
        let a = [
            "Will X happen by March 2026",
            "Will the Fed cut rates in March?",
            "Ceasefire in Ukraine by June",
        ];
        let b = [
            "X by March",
            "Fed rate cut March meeting",
            "Bitcoin above hundred thousand",
            "Will X happen by June",
        ];

        let forward: BTreeSet<(usize, usize, Decimal)> =
            match_titles(&a, &b, DEFAULT_MATCH_THRESHOLD)
                .into_iter()
                .map(|m| (m.a, m.b, m.similarity))
                .collect();
        let backward: BTreeSet<(usize, usize, Decimal)> =
            match_titles(&b, &a, DEFAULT_MATCH_THRESHOLD)
                .into_iter()
                .map(|m| (m.b, m.a, m.similarity))
                .collect();

        assert!(!forward.is_empty());
        assert_eq!(forward, backward);
    }

    #[test]
    fn numeric_tokens_are_kept_only_when_asked() {
        let title = "Bitcoin above $150k by 2.5x?";
        assert!(!tokenize(title).contains("150k"));

        let tokens = tokenize_with_numbers(title);
        assert!(tokens.contains("150k"));
        assert!(tokens.contains("2.5"));
        assert!(tokens.contains("bitcoin"));
        assert!(!tokens.contains("by"));
    }
}
