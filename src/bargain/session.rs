//! Bargain session: one ten-minute negotiation instance

use crate::error::{BargainError, Result};
use crate::pricing::{self, PriceBand};
use crate::scoring::AdvisoryScores;
use crate::types::{ItemRef, SessionId, UserId};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime};

use super::types::{BargainAttempt, BargainStatus, CounterOffer};

/// Fixed session lifetime, set at creation and never extended
pub const SESSION_TTL: Duration = Duration::from_secs(10 * 60);

/// Default number of offers a user may make in one session
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// A negotiation between one user and the pricing policy over one item.
///
/// Sessions are never deleted: terminal sessions are kept with their full
/// attempt and counter-offer log as an audit record.
#[derive(Clone, Debug)]
pub struct BargainSession {
    id: SessionId,
    user: UserId,
    item: ItemRef,
    net_rate: f64,
    markup_min: f64,
    markup_max: f64,
    promo_discount: f64,
    band: PriceBand,
    scores: AdvisoryScores,
    status: BargainStatus,
    started_at: SystemTime,
    expires_at: SystemTime,
    completed_at: Option<SystemTime>,
    total_attempts: u32,
    max_attempts: u32,
    user_best_offer: Option<f64>,
    ai_best_counter: Option<f64>,
    agreed_price: Option<f64>,
    attempts: Vec<BargainAttempt>,
    counters: Vec<CounterOffer>,
}

impl BargainSession {
    /// Create a new active session. Fails if the markup bounds are invalid.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: SessionId,
        user: UserId,
        item: ItemRef,
        net_rate: f64,
        markup_min: f64,
        markup_max: f64,
        promo_discount: f64,
        scores: AdvisoryScores,
        now: SystemTime,
    ) -> Result<Self> {
        let band = pricing::compute_band(net_rate, markup_min, markup_max, promo_discount)?;

        Ok(Self {
            id,
            user,
            item,
            net_rate,
            markup_min,
            markup_max,
            promo_discount,
            band,
            scores,
            status: BargainStatus::Active,
            started_at: now,
            expires_at: now + SESSION_TTL,
            completed_at: None,
            total_attempts: 0,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            user_best_offer: None,
            ai_best_counter: None,
            agreed_price: None,
            attempts: Vec::new(),
            counters: Vec::new(),
        })
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn user(&self) -> &UserId {
        &self.user
    }

    pub fn item(&self) -> &ItemRef {
        &self.item
    }

    pub fn net_rate(&self) -> f64 {
        self.net_rate
    }

    pub fn band(&self) -> &PriceBand {
        &self.band
    }

    pub fn scores(&self) -> &AdvisoryScores {
        &self.scores
    }

    pub fn status(&self) -> BargainStatus {
        self.status
    }

    pub fn started_at(&self) -> SystemTime {
        self.started_at
    }

    pub fn expires_at(&self) -> SystemTime {
        self.expires_at
    }

    pub fn completed_at(&self) -> Option<SystemTime> {
        self.completed_at
    }

    pub fn total_attempts(&self) -> u32 {
        self.total_attempts
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn agreed_price(&self) -> Option<f64> {
        self.agreed_price
    }

    pub fn attempts(&self) -> &[BargainAttempt] {
        &self.attempts
    }

    pub fn counters(&self) -> &[CounterOffer] {
        &self.counters
    }

    /// Whether the deadline has passed at `now`
    pub fn is_expired(&self, now: SystemTime) -> bool {
        now > self.expires_at
    }

    /// Seconds left until the deadline, 0 once `now >= expires_at`
    pub fn time_remaining(&self, now: SystemTime) -> u64 {
        self.expires_at
            .duration_since(now)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }

    /// Whether another offer can be submitted at `now`
    pub fn can_bargain(&self, now: SystemTime) -> bool {
        self.status == BargainStatus::Active
            && !self.is_expired(now)
            && self.total_attempts < self.max_attempts
    }

    /// Error matching the terminal cause, if the session is no longer active
    pub fn terminal_error(&self) -> Option<BargainError> {
        match self.status {
            BargainStatus::Active => None,
            BargainStatus::Expired | BargainStatus::Abandoned => {
                Some(BargainError::SessionExpired(self.id.0.clone()))
            }
            BargainStatus::Accepted | BargainStatus::Rejected => {
                Some(BargainError::AttemptsExhausted(self.id.0.clone()))
            }
        }
    }

    /// Whether an identical price was already offered in this session.
    /// Exact floating-point comparison, matching the duplicate-offer rule.
    pub fn has_prior_offer(&self, price: f64) -> bool {
        self.attempts.iter().any(|a| a.offered_price == price)
    }

    /// Record an in-band offer: logs the accepted attempt and closes the
    /// session at the offered price.
    pub fn record_accepted_offer(&mut self, attempt: BargainAttempt, now: SystemTime) {
        debug_assert!(attempt.is_accepted);
        self.total_attempts += 1;
        self.user_best_offer = Some(attempt.offered_price);
        self.agreed_price = Some(attempt.offered_price);
        self.status = BargainStatus::Accepted;
        self.completed_at = Some(now);
        self.attempts.push(attempt);
    }

    /// Record a rejected offer together with the counter made against it.
    pub fn record_countered_offer(&mut self, attempt: BargainAttempt, counter: CounterOffer) {
        debug_assert!(!attempt.is_accepted);
        self.total_attempts += 1;
        self.user_best_offer = Some(attempt.offered_price);
        self.ai_best_counter = Some(counter.counter_price);
        self.attempts.push(attempt);
        self.counters.push(counter);
    }

    /// Accept the most recent counter offer, if one is still valid at `now`.
    /// Returns the agreed price.
    pub fn accept_latest_counter(&mut self, now: SystemTime) -> Result<f64> {
        let counter = self
            .counters
            .last_mut()
            .filter(|c| !c.is_expired(now))
            .ok_or_else(|| BargainError::CounterOfferExpired(self.id.0.clone()))?;

        counter.was_accepted = true;
        let price = counter.counter_price;
        self.agreed_price = Some(price);
        self.status = BargainStatus::Accepted;
        self.completed_at = Some(now);
        Ok(price)
    }

    /// Transition to `Expired` if still active. Idempotent: returns whether
    /// this call performed the transition.
    pub fn expire(&mut self, now: SystemTime) -> bool {
        if self.status != BargainStatus::Active {
            return false;
        }
        self.status = BargainStatus::Expired;
        self.completed_at = Some(now);
        true
    }

    /// Projection returned to callers
    pub fn view(&self, now: SystemTime) -> SessionView {
        SessionView {
            session_id: self.id.clone(),
            status: self.status,
            time_remaining: self.time_remaining(now),
            total_attempts: self.total_attempts,
            max_attempts: self.max_attempts,
            user_best_offer: self.user_best_offer,
            ai_best_counter: self.ai_best_counter,
            agreed_price: self.agreed_price,
            final_price_range_min: self.band.range_min,
            final_price_range_max: self.band.range_max,
            base_price: self.band.base_price,
            can_bargain: self.can_bargain(now),
        }
    }
}

/// Caller-facing snapshot of session state
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub status: BargainStatus,
    pub time_remaining: u64,
    pub total_attempts: u32,
    pub max_attempts: u32,
    pub user_best_offer: Option<f64>,
    pub ai_best_counter: Option<f64>,
    pub agreed_price: Option<f64>,
    pub final_price_range_min: f64,
    pub final_price_range_max: f64,
    pub base_price: f64,
    pub can_bargain: bool,
}
