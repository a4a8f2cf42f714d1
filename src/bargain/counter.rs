//! Counter-offer generation: strategy selection, price formula, and the
//! templated message/incentive layer
//!
//! Price math is deterministic. Only the wording of the message is
//! randomized, through a seedable RNG, so tests can pin strategy and price
//! while leaving copy free-form.

use crate::pricing::PriceBand;
use crate::types::BookingType;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

use super::session::BargainSession;
use super::types::{CounterOffer, Strategy};

/// Counter offers stay valid for 5 minutes, independent of the session TTL
pub const COUNTER_OFFER_TTL: Duration = Duration::from_secs(5 * 60);

/// Final-round counters collapse most of the way to the band floor
const FINAL_ROUND_SQUEEZE: f64 = 0.3;

/// Generates the engine's priced response to a rejected offer
pub struct CounterOfferGenerator {
    rng: Mutex<StdRng>,
}

impl CounterOfferGenerator {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Seeded variant for deterministic message selection in tests
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Build the counter offer for `offered_price` at `attempt_number`
    /// (1-based) within `session`.
    pub fn generate(
        &self,
        session: &BargainSession,
        offered_price: f64,
        attempt_number: u32,
        now: SystemTime,
    ) -> CounterOffer {
        let net_rate = session.net_rate();
        let band = session.band();
        let max_attempts = session.max_attempts();

        let profit_margin = (offered_price - net_rate) / net_rate;
        let strategy = determine_strategy(attempt_number, profit_margin, max_attempts);
        let counter_price =
            calculate_counter_price(offered_price, band, strategy, attempt_number, max_attempts);
        let is_final = attempt_number >= max_attempts.saturating_sub(1);

        let message = self.build_message(
            offered_price,
            counter_price,
            strategy,
            attempt_number,
            max_attempts,
        );
        let incentives = build_incentives(strategy, is_final, session.item().booking_type);

        let counter_margin = (counter_price - net_rate) / net_rate * 100.0;

        CounterOffer {
            counter_price,
            original_offer: offered_price,
            discount_amount: offered_price - counter_price,
            discount_percentage: (offered_price - counter_price) / offered_price * 100.0,
            strategy,
            message,
            incentives,
            valid_until: now + COUNTER_OFFER_TTL,
            is_final_offer: is_final,
            confidence_level: session.scores().ai_confidence_score,
            profit_margin: round2(counter_margin),
            was_accepted: false,
            created_at: now,
        }
    }

    /// Reasoning string recorded on the attempt for admin analytics
    pub fn reasoning(&self, offered_price: f64, counter: &CounterOffer, net_rate: f64) -> String {
        let offer_margin = (offered_price - net_rate) / net_rate * 100.0;
        format!(
            "User offered {:.0} with {:.1}% profit margin | Applied {} strategy | Counter offer: {:.0} at {:.1}% margin",
            offered_price, offer_margin, counter.strategy, counter.counter_price, counter.profit_margin
        )
    }

    /// Margin breakdown recorded on the attempt for admin analytics
    pub fn margin_analysis(
        &self,
        offered_price: f64,
        counter: &CounterOffer,
        band: &PriceBand,
        net_rate: f64,
    ) -> serde_json::Value {
        serde_json::json!({
            "user_offer_margin": round2((offered_price - net_rate) / net_rate * 100.0),
            "counter_offer_margin": counter.profit_margin,
            "min_acceptable_margin": round2((band.range_min - net_rate) / net_rate * 100.0),
        })
    }

    fn build_message(
        &self,
        offered_price: f64,
        counter_price: f64,
        strategy: Strategy,
        attempt_number: u32,
        max_attempts: u32,
    ) -> String {
        let savings = offered_price - counter_price;
        let savings_pct = savings / offered_price * 100.0;

        let templates: Vec<String> = match strategy {
            Strategy::Aggressive => vec![
                format!(
                    "Great offer! I can get you an even better deal at {:.0} - that's {:.0} in savings!",
                    counter_price, savings
                ),
                format!(
                    "You drive a hard bargain! How about {:.0}? You'll save {:.0} from your offer!",
                    counter_price, savings
                ),
                format!(
                    "I like your style! Let's meet at {:.0} - you're saving {:.1}% from your original offer!",
                    counter_price, savings_pct
                ),
            ],
            Strategy::Moderate => vec![
                format!(
                    "I can work with that! How about {:.0}? This gives you great value while ensuring quality service.",
                    counter_price
                ),
                format!(
                    "Let's find a middle ground at {:.0} - you'll still save {:.0}!",
                    counter_price, savings
                ),
                format!(
                    "I can offer you {:.0} - this is a fantastic deal that works for both of us!",
                    counter_price
                ),
            ],
            Strategy::Conservative => vec![
                format!(
                    "I appreciate your offer! The best I can do is {:.0} while maintaining our premium service quality.",
                    counter_price
                ),
                format!(
                    "This is a popular choice! I can offer {:.0} - this ensures you get the best experience.",
                    counter_price
                ),
                format!(
                    "For this premium option, {:.0} is the best available price I can secure for you.",
                    counter_price
                ),
            ],
        };

        let final_templates = [
            format!(
                "This is my final offer: {:.0}. You're getting an incredible deal - save {:.0}!",
                counter_price, savings
            ),
            format!(
                "Last chance for this amazing price: {:.0}! Don't miss out on saving {:.0}!",
                counter_price, savings
            ),
            format!(
                "Final offer: {:.0}. This is the absolute best price I can secure for you!",
                counter_price
            ),
        ];

        let mut rng = self.rng.lock().unwrap();
        if attempt_number == 1 {
            templates[rng.gen_range(0..templates.len())].clone()
        } else if attempt_number >= max_attempts.saturating_sub(1) {
            final_templates[rng.gen_range(0..final_templates.len())].clone()
        } else {
            format!(
                "{} (Attempt {} of {})",
                templates[rng.gen_range(0..templates.len())],
                attempt_number,
                max_attempts
            )
        }
    }
}

impl Default for CounterOfferGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Pick the negotiation stance from attempt position and the margin the
/// user's offer leaves over the net rate.
pub fn determine_strategy(attempt_number: u32, profit_margin: f64, max_attempts: u32) -> Strategy {
    if attempt_number == 1 {
        if profit_margin < 0.05 {
            Strategy::Conservative
        } else if profit_margin > 0.15 {
            Strategy::Aggressive
        } else {
            Strategy::Moderate
        }
    } else if attempt_number >= max_attempts.saturating_sub(1) {
        // Final round: concede as much as the band allows
        Strategy::Aggressive
    } else if profit_margin < 0.08 {
        Strategy::Conservative
    } else {
        Strategy::Moderate
    }
}

/// Move from the band ceiling toward the user's offer by the strategy's
/// adjustment factor, clamp into the band, and squeeze toward the floor on
/// the final round. Rounded to 2 decimals.
pub fn calculate_counter_price(
    offered_price: f64,
    band: &PriceBand,
    strategy: Strategy,
    attempt_number: u32,
    max_attempts: u32,
) -> f64 {
    let difference = band.range_max - offered_price;
    let mut counter = band.range_max - difference * strategy.adjustment_factor();

    counter = counter.clamp(band.range_min, band.range_max);

    if attempt_number >= max_attempts.saturating_sub(1) {
        counter = band.range_min + (counter - band.range_min) * FINAL_ROUND_SQUEEZE;
    }

    round2(counter)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn build_incentives(
    strategy: Strategy,
    is_final: bool,
    booking_type: BookingType,
) -> Option<serde_json::Value> {
    match (strategy, is_final) {
        (Strategy::Aggressive, _) | (_, true) => {
            let mut incentives = serde_json::json!({
                "free_cancellation": "Free cancellation up to 24 hours before travel",
                "priority_support": "24/7 priority customer support",
            });
            let extra = match booking_type {
                BookingType::Flight => {
                    ("extra_baggage", "Complimentary extra baggage allowance")
                }
                BookingType::Hotel => ("late_checkout", "Free late checkout"),
            };
            incentives[extra.0] = serde_json::Value::String(extra.1.to_string());
            Some(incentives)
        }
        (Strategy::Moderate, false) => Some(serde_json::json!({
            "free_cancellation": "Free cancellation up to 48 hours before travel",
            "customer_support": "Dedicated customer support",
        })),
        (Strategy::Conservative, false) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing;
    use crate::scoring::AdvisoryScores;
    use crate::types::{ItemRef, SessionId, UserId};

    fn test_session(booking_type: BookingType) -> BargainSession {
        BargainSession::new(
            SessionId::generate(),
            UserId("u1".to_string()),
            ItemRef {
                booking_type,
                item_id: "item_1".to_string(),
                item_data: serde_json::json!({}),
            },
            1000.0,
            5.0,
            20.0,
            0.0,
            AdvisoryScores::default(),
            SystemTime::UNIX_EPOCH,
        )
        .unwrap()
    }

    #[test]
    fn test_strategy_first_attempt() {
        // margin < 5%
        assert_eq!(determine_strategy(1, -0.10, 3), Strategy::Conservative);
        assert_eq!(determine_strategy(1, 0.04, 3), Strategy::Conservative);
        // margin > 15%
        assert_eq!(determine_strategy(1, 0.20, 3), Strategy::Aggressive);
        // in between
        assert_eq!(determine_strategy(1, 0.10, 3), Strategy::Moderate);
    }

    #[test]
    fn test_strategy_final_round_always_aggressive() {
        for margin in [-0.5, 0.0, 0.04, 0.10, 0.30] {
            assert_eq!(determine_strategy(2, margin, 3), Strategy::Aggressive);
            assert_eq!(determine_strategy(3, margin, 3), Strategy::Aggressive);
            assert_eq!(determine_strategy(4, margin, 5), Strategy::Aggressive);
        }
    }

    #[test]
    fn test_strategy_middle_attempts() {
        assert_eq!(determine_strategy(2, 0.05, 5), Strategy::Conservative);
        assert_eq!(determine_strategy(2, 0.08, 5), Strategy::Moderate);
        assert_eq!(determine_strategy(3, 0.20, 5), Strategy::Moderate);
    }

    #[test]
    fn test_counter_price_first_attempt_conservative() {
        let band = pricing::compute_band(1000.0, 5.0, 20.0, 0.0).unwrap();

        // 1200 - (1200 - 900) * 0.2 = 1140
        let counter = calculate_counter_price(900.0, &band, Strategy::Conservative, 1, 3);
        assert_eq!(counter, 1140.0);
    }

    #[test]
    fn test_counter_price_final_round_squeeze() {
        let band = pricing::compute_band(1000.0, 5.0, 20.0, 0.0).unwrap();

        // raw: 1200 - (1200 - 950) * 0.6 = 1050, squeeze keeps it at the floor
        let counter = calculate_counter_price(950.0, &band, Strategy::Aggressive, 3, 3);
        assert_eq!(counter, 1050.0);
    }

    #[test]
    fn test_counter_price_always_in_band() {
        let band = pricing::compute_band(1000.0, 5.0, 20.0, 0.0).unwrap();

        for offer in [1.0, 500.0, 1049.0, 1100.0, 1300.0, 5000.0] {
            for strategy in [Strategy::Conservative, Strategy::Moderate, Strategy::Aggressive] {
                for attempt in 1..=3 {
                    let counter = calculate_counter_price(offer, &band, strategy, attempt, 3);
                    assert!(
                        counter >= band.range_min && counter <= band.range_max,
                        "counter {} outside band for offer {} ({:?}, attempt {})",
                        counter,
                        offer,
                        strategy,
                        attempt
                    );
                }
            }
        }
    }

    #[test]
    fn test_generate_full_counter() {
        let session = test_session(BookingType::Hotel);
        let gen = CounterOfferGenerator::with_seed(1);
        let now = SystemTime::UNIX_EPOCH;

        let counter = gen.generate(&session, 900.0, 1, now);

        assert_eq!(counter.strategy, Strategy::Conservative);
        assert_eq!(counter.counter_price, 1140.0);
        assert_eq!(counter.original_offer, 900.0);
        assert_eq!(counter.discount_amount, 900.0 - 1140.0);
        assert_eq!(counter.valid_until, now + COUNTER_OFFER_TTL);
        assert!(!counter.is_final_offer);
        assert_eq!(counter.confidence_level, 0.7);
        assert_eq!(counter.profit_margin, 14.0);
        assert!(!counter.message.is_empty());
    }

    #[test]
    fn test_generate_final_offer_flag() {
        let session = test_session(BookingType::Flight);
        let gen = CounterOfferGenerator::with_seed(1);
        let now = SystemTime::UNIX_EPOCH;

        assert!(!gen.generate(&session, 900.0, 1, now).is_final_offer);
        assert!(gen.generate(&session, 910.0, 2, now).is_final_offer);
        assert!(gen.generate(&session, 920.0, 3, now).is_final_offer);
    }

    #[test]
    fn test_incentives_by_strategy_and_item() {
        let flight = build_incentives(Strategy::Aggressive, false, BookingType::Flight).unwrap();
        assert!(flight.get("extra_baggage").is_some());
        assert!(flight.get("late_checkout").is_none());

        let hotel = build_incentives(Strategy::Conservative, true, BookingType::Hotel).unwrap();
        assert!(hotel.get("late_checkout").is_some());

        let moderate = build_incentives(Strategy::Moderate, false, BookingType::Hotel).unwrap();
        assert!(moderate.get("free_cancellation").is_some());
        assert!(moderate.get("priority_support").is_none());

        assert!(build_incentives(Strategy::Conservative, false, BookingType::Hotel).is_none());
    }

    #[test]
    fn test_seeded_messages_are_deterministic() {
        let session = test_session(BookingType::Hotel);
        let now = SystemTime::UNIX_EPOCH;

        let a = CounterOfferGenerator::with_seed(9).generate(&session, 900.0, 1, now);
        let b = CounterOfferGenerator::with_seed(9).generate(&session, 900.0, 1, now);
        assert_eq!(a.message, b.message);
    }

    #[test]
    fn test_reasoning_and_margin_analysis() {
        let session = test_session(BookingType::Hotel);
        let gen = CounterOfferGenerator::with_seed(1);
        let now = SystemTime::UNIX_EPOCH;

        let counter = gen.generate(&session, 900.0, 1, now);
        let reasoning = gen.reasoning(900.0, &counter, session.net_rate());
        assert!(reasoning.contains("conservative"));
        assert!(reasoning.contains("1140"));

        let analysis = gen.margin_analysis(900.0, &counter, session.band(), session.net_rate());
        assert_eq!(analysis["user_offer_margin"], -10.0);
        assert_eq!(analysis["counter_offer_margin"], 14.0);
        assert_eq!(analysis["min_acceptable_margin"], 5.0);
    }
}
