//! Logical constraints between same-topic markets with different deadlines.
//!
//! An event that happens by an earlier deadline has also happened by every
//! later one, so `P(by early) <= P(by late)`. When the earlier market's YES
//! trades above the later one's, buying YES late and NO early costs less
//! than the guaranteed payout.
//!
//! One pass runs per scan through the phases
//! `Collect -> Group -> BuildConstraints -> Evaluate -> Done`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use super::market::Market;
use super::matcher::{jaccard, tokenize_with_numbers, TokenSet};
use super::money::Price;
use super::temporal::DeadlineExtractor;

/// Phase of a constraint pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Collect,
    Group,
    BuildConstraints,
    Evaluate,
    Done,
}

/// A binary market with a parsed deadline.
#[derive(Debug, Clone, Copy)]
pub struct DatedMarket<'a> {
    pub market: &'a Market,
    pub deadline: NaiveDate,
    pub yes_ask: Price,
}

/// Ordering requirement `yes(early) <= yes(late)`.
#[derive(Debug, Clone, Copy)]
pub struct TemporalConstraint<'a> {
    pub early: DatedMarket<'a>,
    pub late: DatedMarket<'a>,
}

impl<'a> TemporalConstraint<'a> {
    /// The violation, if the earlier market is priced above the later one.
    pub fn evaluate(&self) -> Option<Violation<'a>> {
        (self.early.yes_ask > self.late.yes_ask).then(|| Violation {
            constraint: *self,
            magnitude: self.early.yes_ask - self.late.yes_ask,
        })
    }
}

/// A constraint the current prices break.
#[derive(Debug, Clone, Copy)]
pub struct Violation<'a> {
    pub constraint: TemporalConstraint<'a>,
    /// `yes(early) - yes(late)`.
    pub magnitude: Decimal,
}

/// Limits for one constraint pass.
#[derive(Debug, Clone, Copy)]
pub struct ConstraintConfig {
    /// Minimum topic similarity for two markets to share a group.
    pub topic_threshold: Decimal,
    /// Maximum number of dated markets considered.
    pub max_markets: usize,
}

/// Stateful constraint pass over one scan's markets.
///
/// Call [`ConstraintEngine::run`] or drive it phase by phase with
/// [`ConstraintEngine::step`].
pub struct ConstraintEngine<'a, E: DeadlineExtractor + ?Sized> {
    extractor: &'a E,
    config: ConstraintConfig,
    phase: Phase,
    pending: Vec<&'a Market>,
    dated: Vec<(DatedMarket<'a>, TokenSet)>,
    groups: Vec<Vec<usize>>,
    constraints: Vec<TemporalConstraint<'a>>,
    violations: Vec<Violation<'a>>,
}

impl<'a, E: DeadlineExtractor + ?Sized> ConstraintEngine<'a, E> {
    pub fn new(
        extractor: &'a E,
        config: ConstraintConfig,
        markets: impl IntoIterator<Item = &'a Market>,
    ) -> Self {
        Self {
            extractor,
            config,
            phase: Phase::Collect,
            pending: markets.into_iter().collect(),
            dated: Vec::new(),
            groups: Vec::new(),
            constraints: Vec::new(),
            violations: Vec::new(),
        }
    }

    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Run one phase and advance. Does nothing once `Done`.
    pub fn step(&mut self) -> Phase {
        self.phase = match self.phase {
            Phase::Collect => {
                self.collect();
                Phase::Group
            }
            Phase::Group => {
                self.group();
                Phase::BuildConstraints
            }
            Phase::BuildConstraints => {
                self.build_constraints();
                Phase::Evaluate
            }
            Phase::Evaluate => {
                self.evaluate();
                Phase::Done
            }
            Phase::Done => Phase::Done,
        };
        debug!(phase = ?self.phase, "Constraint pass advanced");
        self.phase
    }

    /// Run every remaining phase and return the violations found.
    pub fn run(mut self) -> Vec<Violation<'a>> {
        while self.step() != Phase::Done {}
        self.violations
    }

    pub fn dated_count(&self) -> usize {
        self.dated.len()
    }

    pub fn groups(&self) -> &[Vec<usize>] {
        &self.groups
    }

    pub fn constraints(&self) -> &[TemporalConstraint<'a>] {
        &self.constraints
    }

    fn collect(&mut self) {
        for market in self.pending.drain(..) {
            if self.dated.len() >= self.config.max_markets {
                break;
            }
            if !market.is_binary() {
                continue;
            }
            let (Some(yes_ask), Some(deadline)) =
                (market.yes_ask(), self.extractor.extract(market.title()))
            else {
                continue;
            };
            let topic = tokenize_with_numbers(&self.extractor.topic(market.title()));
            self.dated.push((
                DatedMarket {
                    market,
                    deadline: deadline.date,
                    yes_ask,
                },
                topic,
            ));
        }
    }

    /// Leader clustering: each market joins the first group whose seed it
    /// matches, otherwise it seeds a new group.
    fn group(&mut self) {
        let mut groups: Vec<Vec<usize>> = Vec::new();
        for (i, (_, topic)) in self.dated.iter().enumerate() {
            let home = groups.iter_mut().find(|group| {
                let seed = &self.dated[group[0]].1;
                jaccard(seed, topic) >= self.config.topic_threshold
            });
            match home {
                Some(group) => group.push(i),
                None => groups.push(vec![i]),
            }
        }
        self.groups = groups.into_iter().filter(|g| g.len() > 1).collect();
    }

    fn build_constraints(&mut self) {
        for group in &self.groups {
            for (x, &i) in group.iter().enumerate() {
                for &j in &group[x + 1..] {
                    let (a, b) = (self.dated[i].0, self.dated[j].0);
                    if a.deadline < b.deadline {
                        self.constraints.push(TemporalConstraint { early: a, late: b });
                    } else if b.deadline < a.deadline {
                        self.constraints.push(TemporalConstraint { early: b, late: a });
                    }
                }
            }
        }
    }

    fn evaluate(&mut self) {
        self.violations = self
            .constraints
            .iter()
            .filter_map(TemporalConstraint::evaluate)
            .collect();
    }
}

/// Convenience wrapper running a full pass.
pub fn find_violations<'a, E: DeadlineExtractor + ?Sized>(
    extractor: &'a E,
    config: ConstraintConfig,
    markets: impl IntoIterator<Item = &'a Market>,
) -> Vec<Violation<'a>> {
    ConstraintEngine::new(extractor, config, markets).run()
}
