//! Haggle Bargain Engine
//!
//! Time-boxed, multi-round price negotiation between a user and a pricing
//! policy. A session lives ten minutes and allows a fixed number of offers;
//! in-band offers are accepted immediately, out-of-band offers draw a
//! counter-offer computed from a strategy table, and a background reaper
//! guarantees no session outlives its deadline.

pub mod bargain;
pub mod cli;
pub mod clock;
pub mod error;
pub mod pricing;
pub mod scoring;
pub mod types;

// Re-export commonly used types
pub use bargain::{
    BargainStatus, CounterOffer, ExpiryReaper, HistoryEntry, Outcome, PricingTerms,
    SessionManager, SessionView, Strategy,
};
pub use error::{BargainError, Result};
pub use pricing::{compute_band, PriceBand};
pub use scoring::{AdvisoryScores, HeuristicScorer, Scorer};
pub use types::{BookingType, ItemRef, SessionId, UserId};
