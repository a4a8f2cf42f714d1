//! Advisory scoring for new sessions
//!
//! These scores are cosmetic from the state machine's point of view: they are
//! computed once at session start, carried on the session, and only surface
//! as the counter-offer confidence level. The trait boundary lets a real
//! behavioral model slot in later without touching negotiation logic.

use crate::types::{BookingType, ItemRef, UserId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Advisory metrics attached to a session at creation
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryScores {
    pub ai_confidence_score: f64,
    pub price_sensitivity: f64,
    pub conversion_probability: f64,
}

impl Default for AdvisoryScores {
    fn default() -> Self {
        Self {
            ai_confidence_score: 0.7,
            price_sensitivity: 0.5,
            conversion_probability: 0.6,
        }
    }
}

/// Produces advisory scores for a new session
pub trait Scorer: Send + Sync {
    fn score(&self, user: &UserId, item: &ItemRef) -> AdvisoryScores;
}

/// Heuristic scorer: fixed baselines nudged by item attributes, with random
/// variation clamped to [0.1, 1.0]
pub struct HeuristicScorer {
    rng: Mutex<StdRng>,
}

impl HeuristicScorer {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Seeded variant for deterministic tests
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for HeuristicScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl Scorer for HeuristicScorer {
    fn score(&self, _user: &UserId, item: &ItemRef) -> AdvisoryScores {
        let mut confidence: f64 = 0.7;
        let mut sensitivity: f64 = 0.5;
        let mut conversion: f64 = 0.6;

        // Flights have less bargain flexibility than hotels
        if item.booking_type == BookingType::Flight {
            confidence -= 0.1;
            conversion -= 0.1;
        }

        // Premium inventory attracts less price-sensitive buyers
        if item
            .item_data
            .get("is_premium")
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
        {
            sensitivity -= 0.2;
            conversion += 0.1;
        }

        let mut rng = self.rng.lock().unwrap();
        AdvisoryScores {
            ai_confidence_score: clamp(confidence + rng.gen_range(-0.2..0.2)),
            price_sensitivity: clamp(sensitivity + rng.gen_range(-0.3..0.3)),
            conversion_probability: clamp(conversion + rng.gen_range(-0.2..0.2)),
        }
    }
}

fn clamp(value: f64) -> f64 {
    value.clamp(0.1, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(booking_type: BookingType, premium: bool) -> ItemRef {
        ItemRef {
            booking_type,
            item_id: "item_1".to_string(),
            item_data: serde_json::json!({ "is_premium": premium }),
        }
    }

    #[test]
    fn test_scores_within_bounds() {
        let scorer = HeuristicScorer::with_seed(7);
        let user = UserId("u1".to_string());

        for _ in 0..100 {
            let scores = scorer.score(&user, &item(BookingType::Flight, true));
            assert!((0.1..=1.0).contains(&scores.ai_confidence_score));
            assert!((0.1..=1.0).contains(&scores.price_sensitivity));
            assert!((0.1..=1.0).contains(&scores.conversion_probability));
        }
    }

    #[test]
    fn test_seeded_scorer_is_deterministic() {
        let user = UserId("u1".to_string());
        let a = HeuristicScorer::with_seed(42).score(&user, &item(BookingType::Hotel, false));
        let b = HeuristicScorer::with_seed(42).score(&user, &item(BookingType::Hotel, false));

        assert_eq!(a, b);
    }

    #[test]
    fn test_default_scores() {
        let scores = AdvisoryScores::default();
        assert_eq!(scores.ai_confidence_score, 0.7);
        assert_eq!(scores.price_sensitivity, 0.5);
        assert_eq!(scores.conversion_probability, 0.6);
    }
}
