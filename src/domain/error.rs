//! Domain validation errors for core domain types.
//!
//! These errors are returned by `try_new` constructors and by the market
//! normalizer when a venue record violates a domain invariant. A market
//! that fails validation is dropped from the scan; the error never
//! aborts the scan itself.
//!
//! # Examples
//!
//! ```
//! use crossarb::domain::error::DomainError;
//! use crossarb::domain::market::Market;
//! use crossarb::domain::{MarketId, Venue};
//!
//! let result = Market::try_new(
//!     Venue::Kalshi,
//!     MarketId::new("KX-1"),
//!     "Empty market",
//!     vec![],
//!     chrono::Utc::now(),
//! );
//!
//! assert!(matches!(result, Err(DomainError::EmptyOutcomes)));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;

use super::ids::Venue;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Markets must have at least one outcome.
    #[error("outcomes cannot be empty")]
    EmptyOutcomes,

    /// A required field was absent from the venue record.
    #[error("missing required field: {field}")]
    MissingField {
        /// Name of the missing field.
        field: &'static str,
    },

    /// A price field could not be read as a number.
    #[error("non-numeric price for {field}: {raw:?}")]
    NonNumericPrice {
        /// Field or outcome label the price belongs to.
        field: String,
        /// The raw value as it appeared in the record.
        raw: String,
    },

    /// Ask prices are fractions of the $1 payout.
    #[error("price for {label} out of range [0, 1]: {price}")]
    PriceOutOfRange {
        /// Outcome label.
        label: String,
        /// The offending price.
        price: Decimal,
    },

    /// Refreshed quote does not line up with the market's outcomes.
    #[error("quote has {got} outcome prices, market has {expected}")]
    QuoteMismatch { expected: usize, got: usize },
}

/// A venue record that could not be normalized into a [`Market`](super::Market).
#[derive(Error, Debug, Clone, PartialEq)]
#[error("malformed {venue} market '{market_id}': {reason}")]
pub struct MalformedMarket {
    /// Venue the record came from.
    pub venue: Venue,
    /// Best-effort identifier, `"<unknown>"` when the record had none.
    pub market_id: String,
    /// The violated invariant.
    #[source]
    pub reason: DomainError,
}

impl MalformedMarket {
    pub fn new(venue: Venue, market_id: Option<String>, reason: DomainError) -> Self {
        Self {
            venue,
            market_id: market_id.unwrap_or_else(|| "<unknown>".to_string()),
            reason,
        }
    }
}
