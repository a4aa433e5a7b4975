//! Venue-agnostic detection core.
//!
//! Everything here is synchronous and operates on one scan's in-memory
//! snapshot: normalization, matching, deadline extraction, the constraint
//! pass, and the detection strategies.

pub mod constraint;
pub mod error;
pub mod ids;
pub mod market;
pub mod matcher;
pub mod money;
pub mod normalize;
pub mod opportunity;
pub mod stats;
pub mod strategy;
pub mod temporal;

pub use error::{DomainError, MalformedMarket};
pub use ids::{MarketId, TokenId, Venue};
pub use market::{Market, Outcome, Quote};
pub use matcher::{match_markets, MatchedPair};
pub use money::Price;
pub use normalize::{normalize, RawMarket};
pub use opportunity::{ArbType, Combination, Leg, Opportunity, OpportunityKey};
pub use stats::{PeriodStats, ScanHistory, ScanSample, ScanStats, VenueStatus};
pub use temporal::{extract_deadline, DeadlineExtractor, PatternExtractor};
