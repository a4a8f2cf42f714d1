//! Bargain types and state machine

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::SystemTime;

/// Session status state machine.
///
/// `Active` is the sole initial state. Every other status is terminal: there
/// are no outgoing transitions once a session leaves `Active`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BargainStatus {
    Active,
    Accepted,
    Rejected,
    Expired,
    Abandoned,
}

impl BargainStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, BargainStatus::Active)
    }
}

impl fmt::Display for BargainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BargainStatus::Active => "active",
            BargainStatus::Accepted => "accepted",
            BargainStatus::Rejected => "rejected",
            BargainStatus::Expired => "expired",
            BargainStatus::Abandoned => "abandoned",
        };
        write!(f, "{}", s)
    }
}

/// Kind of entry in the attempt log
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptKind {
    UserOffer,
    AiCounter,
    FinalOffer,
}

/// One offer round, appended to the session's log and never modified after
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BargainAttempt {
    pub attempt_number: u32,
    pub kind: AttemptKind,
    pub offered_price: f64,
    pub is_accepted: bool,
    /// Reasoning string for admin analytics
    pub reasoning: Option<String>,
    /// Margin breakdown for admin analytics
    pub margin_analysis: Option<serde_json::Value>,
    pub created_at: SystemTime,
}

/// Negotiation stance when generating a counter offer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Conservative,
    Moderate,
    Aggressive,
}

impl Strategy {
    /// How far the counter price moves from the band ceiling toward the
    /// user's offer
    pub fn adjustment_factor(&self) -> f64 {
        match self {
            Strategy::Aggressive => 0.6,
            Strategy::Moderate => 0.4,
            Strategy::Conservative => 0.2,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Strategy::Conservative => "conservative",
            Strategy::Moderate => "moderate",
            Strategy::Aggressive => "aggressive",
        };
        write!(f, "{}", s)
    }
}

/// The engine's priced response to a rejected attempt.
///
/// Carries its own 5-minute validity, independent of the session deadline.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CounterOffer {
    pub counter_price: f64,
    pub original_offer: f64,
    pub discount_amount: f64,
    pub discount_percentage: f64,
    pub strategy: Strategy,
    pub message: String,
    pub incentives: Option<serde_json::Value>,
    pub valid_until: SystemTime,
    pub is_final_offer: bool,
    pub confidence_level: f64,
    /// Margin the counter price leaves over the net rate, in percent
    pub profit_margin: f64,
    pub was_accepted: bool,
    pub created_at: SystemTime,
}

impl CounterOffer {
    pub fn is_expired(&self, now: SystemTime) -> bool {
        now > self.valid_until
    }
}
