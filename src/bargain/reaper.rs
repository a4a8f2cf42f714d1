//! Background expiry sweep
//!
//! Runs independently of request handling. Together with the inline deadline
//! check in submit/accept-counter, this bounds how long an overdue session
//! can stay marked active. The sweep takes each session's own mutex, so it
//! cannot race a concurrent submit.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use super::manager::SessionManager;

/// How often the sweep runs unless configured otherwise
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(5);

/// Handle to the running sweep task
pub struct ExpiryReaper {
    handle: JoinHandle<()>,
}

impl ExpiryReaper {
    /// Spawn the sweep loop against `manager`
    pub fn spawn(manager: Arc<SessionManager>, every: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                manager.reap_expired().await;
            }
        });

        tracing::debug!("Expiry reaper running every {:?}", every);
        Self { handle }
    }

    /// Stop the sweep. Sessions already reaped stay terminal; the inline
    /// check in submit still catches anything missed.
    pub fn shutdown(self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bargain::counter::CounterOfferGenerator;
    use crate::bargain::manager::PricingTerms;
    use crate::bargain::session::SESSION_TTL;
    use crate::bargain::types::BargainStatus;
    use crate::clock::MockClock;
    use crate::scoring::HeuristicScorer;
    use crate::types::{BookingType, ItemRef, UserId};
    use std::time::SystemTime;

    #[tokio::test]
    async fn test_reaper_expires_overdue_sessions() {
        let clock = Arc::new(MockClock::new(SystemTime::UNIX_EPOCH));
        let manager = Arc::new(SessionManager::with_parts(
            clock.clone(),
            Arc::new(HeuristicScorer::with_seed(1)),
            CounterOfferGenerator::with_seed(1),
        ));

        let view = manager
            .start_session(
                UserId("u1".to_string()),
                ItemRef {
                    booking_type: BookingType::Hotel,
                    item_id: "HTL-1".to_string(),
                    item_data: serde_json::json!({}),
                },
                PricingTerms {
                    net_rate: 1000.0,
                    markup_min: 5.0,
                    markup_max: 20.0,
                    promo_discount: 0.0,
                },
            )
            .await
            .unwrap();

        let reaper = ExpiryReaper::spawn(manager.clone(), Duration::from_millis(10));

        clock.advance(SESSION_TTL + Duration::from_secs(1));
        tokio::time::sleep(Duration::from_millis(50)).await;

        let session = manager.get_session(&view.session_id).await.unwrap();
        assert_eq!(session.status, BargainStatus::Expired);

        reaper.shutdown();
    }
}
