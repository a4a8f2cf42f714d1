//! Demo application driving the bargain engine from the command line

use crate::bargain::{
    ExpiryReaper, Outcome, PricingTerms, SessionManager, DEFAULT_SWEEP_INTERVAL,
};
use crate::error::{BargainError, Result};
use crate::types::{BookingType, ItemRef, UserId};
use std::sync::Arc;

/// In-memory engine plus its background reaper
pub struct HaggleApp {
    manager: Arc<SessionManager>,
    reaper: Option<ExpiryReaper>,
}

impl HaggleApp {
    pub fn new() -> Self {
        let manager = Arc::new(SessionManager::new());
        let reaper = ExpiryReaper::spawn(manager.clone(), DEFAULT_SWEEP_INTERVAL);

        Self {
            manager,
            reaper: Some(reaper),
        }
    }

    pub fn manager(&self) -> Arc<SessionManager> {
        self.manager.clone()
    }

    /// Play a scripted negotiation: submit each offer in turn, stop on
    /// acceptance, optionally accept the last counter when offers run out.
    pub async fn run_demo(
        &self,
        booking_type: BookingType,
        item_id: String,
        terms: PricingTerms,
        offers: &[f64],
        accept_counter: bool,
    ) -> Result<()> {
        let user = UserId("demo-user".to_string());
        let item = ItemRef {
            booking_type,
            item_id,
            item_data: serde_json::json!({ "source": "demo" }),
        };

        let view = self.manager.start_session(user.clone(), item, terms).await?;
        println!(
            "Session {} started: band {:.2}..{:.2}, {} attempts, {}s on the clock",
            view.session_id,
            view.final_price_range_min,
            view.final_price_range_max,
            view.max_attempts,
            view.time_remaining
        );

        for &offer in offers {
            println!("\n> Offering {:.2}", offer);
            match self.manager.submit_offer(&view.session_id, offer).await {
                Ok(Outcome::Accepted {
                    agreed_price,
                    savings,
                    ..
                }) => {
                    println!(
                        "Offer accepted! Agreed price {:.2}, savings {:.2}",
                        agreed_price, savings
                    );
                    return Ok(());
                }
                Ok(Outcome::CounterOffered { counter, session, .. }) => {
                    println!("Counter: {:.2} ({})", counter.counter_price, counter.strategy);
                    println!("  \"{}\"", counter.message);
                    if let Some(incentives) = &counter.incentives {
                        println!("  Incentives: {}", serde_json::to_string(incentives)?);
                    }
                    if counter.is_final_offer {
                        println!("  This is a final offer.");
                    }
                    println!(
                        "  {} of {} attempts used, {}s remaining",
                        session.total_attempts, session.max_attempts, session.time_remaining
                    );
                }
                Err(e @ BargainError::DuplicateOffer(_)) => {
                    println!("Rejected: {}", e);
                }
                Err(e) => return Err(e),
            }
        }

        if accept_counter {
            match self.manager.accept_counter_offer(&view.session_id).await? {
                Outcome::Accepted {
                    agreed_price,
                    savings,
                    ..
                } => {
                    println!(
                        "\nCounter offer accepted: agreed price {:.2}, savings {:.2}",
                        agreed_price, savings
                    );
                }
                Outcome::CounterOffered { .. } => unreachable!("accept never counters"),
            }
        } else {
            let session = self.manager.get_session(&view.session_id).await?;
            println!(
                "\nNo agreement: session {} is {} with best counter {:?}",
                session.session_id, session.status, session.ai_best_counter
            );
        }

        let history = self.manager.list_history(&user).await;
        println!("History: {} session(s) on record", history.len());

        Ok(())
    }

    /// Stop the background reaper
    pub fn shutdown(mut self) {
        if let Some(reaper) = self.reaper.take() {
            reaper.shutdown();
        }
    }
}

impl Default for HaggleApp {
    fn default() -> Self {
        Self::new()
    }
}
