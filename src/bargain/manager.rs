//! Session manager: lifecycle and the five public bargain operations
//!
//! The registry maps session ids to individually locked sessions. Every
//! read-modify-write (submit, accept-counter, reaper sweep) runs under the
//! session's own mutex, so concurrent calls on one session serialize while
//! unrelated sessions proceed in parallel. Sessions are never removed from
//! the registry; terminal sessions remain as the audit log.

use crate::clock::{Clock, SystemClock};
use crate::error::{BargainError, Result};
use crate::scoring::{HeuristicScorer, Scorer};
use crate::types::{BookingType, ItemRef, SessionId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::{Mutex, RwLock};

use super::counter::CounterOfferGenerator;
use super::evaluator;
use super::session::{BargainSession, SessionView};
use super::types::{AttemptKind, BargainAttempt, CounterOffer};

/// Pricing inputs for a new session, snapshotted at start and never mutated
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct PricingTerms {
    pub net_rate: f64,
    pub markup_min: f64,
    pub markup_max: f64,
    pub promo_discount: f64,
}

/// Result of an offer round
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Outcome {
    /// The price was agreed and the session is closed
    Accepted {
        agreed_price: f64,
        savings: f64,
        session: SessionView,
    },
    /// The offer was rejected and countered; the session stays open
    CounterOffered {
        attempt: BargainAttempt,
        counter: CounterOffer,
        session: SessionView,
    },
}

/// One row of a user's bargain history
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub session_id: SessionId,
    pub booking_type: BookingType,
    pub status: super::types::BargainStatus,
    pub base_price: f64,
    pub agreed_price: Option<f64>,
    pub savings: f64,
    pub started_at: SystemTime,
    pub completed_at: Option<SystemTime>,
}

/// History is capped to the most recent sessions
const HISTORY_LIMIT: usize = 20;

/// Owns all bargain sessions and composes the pricing policy, offer
/// evaluator, and counter-offer generator
pub struct SessionManager {
    sessions: RwLock<HashMap<SessionId, Arc<Mutex<BargainSession>>>>,
    clock: Arc<dyn Clock>,
    scorer: Arc<dyn Scorer>,
    generator: CounterOfferGenerator,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::with_parts(
            Arc::new(SystemClock),
            Arc::new(HeuristicScorer::new()),
            CounterOfferGenerator::new(),
        )
    }

    /// Assemble from injected collaborators (deterministic clock/scorer/RNG
    /// in tests, a real behavioral model later)
    pub fn with_parts(
        clock: Arc<dyn Clock>,
        scorer: Arc<dyn Scorer>,
        generator: CounterOfferGenerator,
    ) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            clock,
            scorer,
            generator,
        }
    }

    /// Start a new ten-minute bargain session for `user` over `item`
    pub async fn start_session(
        &self,
        user: UserId,
        item: ItemRef,
        terms: PricingTerms,
    ) -> Result<SessionView> {
        let now = self.clock.now();
        let id = SessionId::generate();
        let scores = self.scorer.score(&user, &item);

        let session = BargainSession::new(
            id.clone(),
            user.clone(),
            item,
            terms.net_rate,
            terms.markup_min,
            terms.markup_max,
            terms.promo_discount,
            scores,
            now,
        )?;

        let view = session.view(now);
        self.sessions
            .write()
            .await
            .insert(id.clone(), Arc::new(Mutex::new(session)));

        tracing::info!(
            "Started bargain session {} for user {} (band {:.2}..{:.2})",
            id,
            user,
            view.final_price_range_min,
            view.final_price_range_max
        );

        Ok(view)
    }

    /// Submit a user offer: one full negotiation round
    pub async fn submit_offer(&self, session_id: &SessionId, offered_price: f64) -> Result<Outcome> {
        let handle = self.handle(session_id).await?;
        let mut session = handle.lock().await;
        let now = self.clock.now();

        // Deadline check first; the Expired transition sticks even though
        // the call fails
        if session.is_expired(now) && session.expire(now) {
            tracing::info!("Session {} expired on submit", session_id);
        }
        if let Some(err) = session.terminal_error() {
            return Err(err);
        }

        evaluator::validate_offer(&session, offered_price)?;

        let attempt_number = session.total_attempts() + 1;

        if evaluator::is_acceptable(&session, offered_price) {
            let attempt = BargainAttempt {
                attempt_number,
                kind: AttemptKind::UserOffer,
                offered_price,
                is_accepted: true,
                reasoning: None,
                margin_analysis: None,
                created_at: now,
            };
            session.record_accepted_offer(attempt, now);

            tracing::info!(
                "Session {}: offer {:.2} accepted on attempt {}",
                session_id,
                offered_price,
                attempt_number
            );

            return Ok(Outcome::Accepted {
                agreed_price: offered_price,
                savings: session.band().base_price - offered_price,
                session: session.view(now),
            });
        }

        let counter = self
            .generator
            .generate(&session, offered_price, attempt_number, now);
        let attempt = BargainAttempt {
            attempt_number,
            kind: AttemptKind::UserOffer,
            offered_price,
            is_accepted: false,
            reasoning: Some(
                self.generator
                    .reasoning(offered_price, &counter, session.net_rate()),
            ),
            margin_analysis: Some(self.generator.margin_analysis(
                offered_price,
                &counter,
                session.band(),
                session.net_rate(),
            )),
            created_at: now,
        };
        session.record_countered_offer(attempt.clone(), counter.clone());

        tracing::info!(
            "Session {}: countered {:.2} with {:.2} ({} strategy, attempt {})",
            session_id,
            offered_price,
            counter.counter_price,
            counter.strategy,
            attempt_number
        );

        Ok(Outcome::CounterOffered {
            attempt,
            counter,
            session: session.view(now),
        })
    }

    /// Accept the engine's most recent counter offer
    pub async fn accept_counter_offer(&self, session_id: &SessionId) -> Result<Outcome> {
        let handle = self.handle(session_id).await?;
        let mut session = handle.lock().await;
        let now = self.clock.now();

        if session.is_expired(now) && session.expire(now) {
            tracing::info!("Session {} expired on accept-counter", session_id);
        }
        if let Some(err) = session.terminal_error() {
            // An already-settled session has no outstanding counter
            return Err(match err {
                BargainError::SessionExpired(id) => BargainError::SessionExpired(id),
                _ => BargainError::CounterOfferExpired(session_id.0.clone()),
            });
        }

        let agreed_price = session.accept_latest_counter(now)?;

        tracing::info!(
            "Session {}: counter offer accepted at {:.2}",
            session_id,
            agreed_price
        );

        Ok(Outcome::Accepted {
            agreed_price,
            savings: session.band().base_price - agreed_price,
            session: session.view(now),
        })
    }

    /// Current projection of one session (read-only; expiry is not applied
    /// here, only observed through time_remaining/can_bargain)
    pub async fn get_session(&self, session_id: &SessionId) -> Result<SessionView> {
        let handle = self.handle(session_id).await?;
        let session = handle.lock().await;
        Ok(session.view(self.clock.now()))
    }

    /// A user's sessions, most recent first, capped at 20
    pub async fn list_history(&self, user: &UserId) -> Vec<HistoryEntry> {
        let handles: Vec<_> = self.sessions.read().await.values().cloned().collect();

        let mut entries = Vec::new();
        for handle in handles {
            let session = handle.lock().await;
            if session.user() != user {
                continue;
            }
            let base_price = session.band().base_price;
            entries.push(HistoryEntry {
                session_id: session.id().clone(),
                booking_type: session.item().booking_type,
                status: session.status(),
                base_price,
                agreed_price: session.agreed_price(),
                savings: base_price - session.agreed_price().unwrap_or(base_price),
                started_at: session.started_at(),
                completed_at: session.completed_at(),
            });
        }

        entries.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        entries.truncate(HISTORY_LIMIT);
        entries
    }

    /// Expire every active session whose deadline has passed. Returns the
    /// number of sessions transitioned. Used by the background reaper.
    pub async fn reap_expired(&self) -> usize {
        let now = self.clock.now();
        let handles: Vec<_> = self.sessions.read().await.values().cloned().collect();

        let mut reaped = 0;
        for handle in handles {
            let mut session = handle.lock().await;
            if session.is_expired(now) && session.expire(now) {
                tracing::debug!("Reaped expired session {}", session.id());
                reaped += 1;
            }
        }

        if reaped > 0 {
            tracing::info!("Expired {} bargain session(s)", reaped);
        }
        reaped
    }

    async fn handle(&self, session_id: &SessionId) -> Result<Arc<Mutex<BargainSession>>> {
        self.sessions
            .read()
            .await
            .get(session_id)
            .cloned()
            .ok_or_else(|| BargainError::SessionNotFound(session_id.0.clone()))
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}
