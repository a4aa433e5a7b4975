//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`domain`] - Builders for markets, raw venue records, and configs.
//! - [`source`] - [`ScriptedSource`](source::ScriptedSource), a
//!   [`MarketSource`](crate::port::MarketSource) fed from queued responses.

pub mod domain;
pub mod source;
