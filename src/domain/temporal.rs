//! Deadline extraction from market titles.
//!
//! Recognized forms (case-insensitive, `by` or `before`):
//!
//! - `by March 15, 2026` - that day
//! - `by March 2026` - last day of the month
//! - `by Q2 2026` - last day of the quarter
//! - `by end of 2026`, `in 2026` - 31 December
//! - `by March 15` - that day in the reference year, or the next year if
//!   it has already passed
//!
//! A title with no recognized form, or with forms that resolve to
//! different dates, has no deadline.

use std::ops::Range;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::{Captures, Regex};

static RE_MONTH_DAY_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:by|before)\s+([a-z]+)\.?\s+(\d{1,2})(?:st|nd|rd|th)?,?\s+(\d{4})\b").unwrap()
});
static RE_MONTH_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:by|before)\s+(?:the\s+end\s+of\s+)?([a-z]+)\.?,?\s+(\d{4})\b").unwrap()
});
static RE_QUARTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:by|before)\s+(?:the\s+end\s+of\s+)?q([1-4])\s+(\d{4})\b").unwrap()
});
static RE_END_OF_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:by|before)\s+(?:the\s+)?end\s+of\s+(\d{4})\b").unwrap()
});
static RE_IN_YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bin\s+(\d{4})\b").unwrap());
static RE_MONTH_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:by|before)\s+([a-z]+)\.?\s+(\d{1,2})(?:st|nd|rd|th)?\b").unwrap()
});

/// A deadline found in a title, with the byte span of the phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deadline {
    pub date: NaiveDate,
    pub span: Range<usize>,
}

/// Parses deadlines out of market titles.
pub trait DeadlineExtractor: Send + Sync {
    /// The title's single deadline, if it has one.
    fn extract(&self, title: &str) -> Option<Deadline>;

    /// The title with its deadline phrase removed and whitespace collapsed.
    fn topic(&self, title: &str) -> String {
        let stripped = match self.extract(title) {
            Some(deadline) => {
                let mut s = String::with_capacity(title.len());
                s.push_str(&title[..deadline.span.start]);
                s.push(' ');
                s.push_str(&title[deadline.span.end..]);
                s
            }
            None => title.to_string(),
        };
        stripped.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

/// Regex grammar extractor.
///
/// Month-and-day forms without a year resolve against `reference`, so a
/// given title always yields the same date for a given scan.
#[derive(Debug, Clone, Copy)]
pub struct PatternExtractor {
    reference: NaiveDate,
}

impl PatternExtractor {
    pub const fn new(reference: NaiveDate) -> Self {
        Self { reference }
    }

    pub const fn reference(&self) -> NaiveDate {
        self.reference
    }

    fn candidates(&self, title: &str) -> Vec<Deadline> {
        let mut found: Vec<Deadline> = Vec::new();
        let mut push = |caps: Captures<'_>, date: Option<NaiveDate>| {
            let (Some(date), Some(whole)) = (date, caps.get(0)) else {
                return;
            };
            let span = whole.range();
            if found.iter().all(|d| !overlaps(&d.span, &span)) {
                found.push(Deadline { date, span });
            }
        };

        // Most specific forms first so shorter forms inside them are ignored.
        for caps in RE_MONTH_DAY_YEAR.captures_iter(title) {
            let date = month(&caps[1]).and_then(|m| {
                NaiveDate::from_ymd_opt(caps[3].parse().ok()?, m, caps[2].parse().ok()?)
            });
            push(caps, date);
        }
        for caps in RE_QUARTER.captures_iter(title) {
            let date = caps[1]
                .parse::<u32>()
                .ok()
                .zip(caps[2].parse::<i32>().ok())
                .and_then(|(q, year)| end_of_month(year, q * 3));
            push(caps, date);
        }
        for caps in RE_END_OF_YEAR.captures_iter(title) {
            let date = caps[1]
                .parse::<i32>()
                .ok()
                .and_then(|year| NaiveDate::from_ymd_opt(year, 12, 31));
            push(caps, date);
        }
        for caps in RE_MONTH_YEAR.captures_iter(title) {
            let date = month(&caps[1])
                .zip(caps[2].parse::<i32>().ok())
                .and_then(|(m, year)| end_of_month(year, m));
            push(caps, date);
        }
        for caps in RE_MONTH_DAY.captures_iter(title) {
            let date = month(&caps[1])
                .zip(caps[2].parse::<u32>().ok())
                .and_then(|(m, day)| self.upcoming(m, day));
            push(caps, date);
        }
        for caps in RE_IN_YEAR.captures_iter(title) {
            let date = caps[1]
                .parse::<i32>()
                .ok()
                .and_then(|year| NaiveDate::from_ymd_opt(year, 12, 31));
            push(caps, date);
        }

        found
    }

    /// `month/day` in the reference year, rolled forward once if already past.
    fn upcoming(&self, month: u32, day: u32) -> Option<NaiveDate> {
        let year = self.reference.year();
        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        if date < self.reference {
            NaiveDate::from_ymd_opt(year + 1, month, day)
        } else {
            Some(date)
        }
    }
}

impl DeadlineExtractor for PatternExtractor {
    fn extract(&self, title: &str) -> Option<Deadline> {
        let mut candidates = self.candidates(title).into_iter();
        let first = candidates.next()?;
        let mut span = first.span.clone();
        for other in candidates {
            if other.date != first.date {
                return None;
            }
            span = span.start.min(other.span.start)..span.end.max(other.span.end);
        }
        Some(Deadline {
            date: first.date,
            span,
        })
    }
}

/// Deadline of `title` relative to `reference`, date granularity.
pub fn extract_deadline(title: &str, reference: NaiveDate) -> Option<NaiveDate> {
    PatternExtractor::new(reference).extract(title).map(|d| d.date)
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

fn month(name: &str) -> Option<u32> {
    let name = name.to_ascii_lowercase();
    let m = match name.as_str() {
        "january" | "jan" => 1,
        "february" | "feb" => 2,
        "march" | "mar" => 3,
        "april" | "apr" => 4,
        "may" => 5,
        "june" | "jun" => 6,
        "july" | "jul" => 7,
        "august" | "aug" => 8,
        "september" | "sep" | "sept" => 9,
        "october" | "oct" => 10,
        "november" | "nov" => 11,
        "december" | "dec" => 12,
        _ => return None,
    };
    Some(m)
}

fn end_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}
