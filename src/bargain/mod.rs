//! Bargain negotiation engine: sessions, offers, counter-offers, expiry

pub mod counter;
pub mod evaluator;
pub mod manager;
pub mod reaper;
pub mod session;
pub mod types;

pub use counter::{CounterOfferGenerator, COUNTER_OFFER_TTL};
pub use manager::{HistoryEntry, Outcome, PricingTerms, SessionManager};
pub use reaper::{ExpiryReaper, DEFAULT_SWEEP_INTERVAL};
pub use session::{BargainSession, SessionView, DEFAULT_MAX_ATTEMPTS, SESSION_TTL};
pub use types::{AttemptKind, BargainAttempt, BargainStatus, CounterOffer, Strategy};
