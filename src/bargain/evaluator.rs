//! Offer validation and classification
//!
//! Pure checks against a session snapshot. Lifecycle concerns (deadline,
//! terminal status) are handled by the manager before these run.

use crate::error::{BargainError, Result};

use super::session::BargainSession;

/// Validate an offer against session rules: remaining attempts, positive
/// price, and the duplicate-offer rule. Performs no mutation.
pub fn validate_offer(session: &BargainSession, price: f64) -> Result<()> {
    if session.total_attempts() >= session.max_attempts() {
        return Err(BargainError::AttemptsExhausted(session.id().0.clone()));
    }

    if price <= 0.0 {
        return Err(BargainError::InvalidOfferPrice(price));
    }

    if session.has_prior_offer(price) {
        return Err(BargainError::DuplicateOffer(price));
    }

    Ok(())
}

/// Whether the offer lands inside the session's acceptable band
pub fn is_acceptable(session: &BargainSession, price: f64) -> bool {
    session.band().contains(price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bargain::types::{AttemptKind, BargainAttempt};
    use crate::scoring::AdvisoryScores;
    use crate::types::{BookingType, ItemRef, SessionId, UserId};
    use std::time::SystemTime;

    fn test_session() -> BargainSession {
        BargainSession::new(
            SessionId::generate(),
            UserId("u1".to_string()),
            ItemRef {
                booking_type: BookingType::Flight,
                item_id: "FL-1".to_string(),
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
    fn test_band_classification() {
        let session = test_session();

        assert!(is_acceptable(&session, 1050.0));
        assert!(is_acceptable(&session, 1100.0));
        assert!(is_acceptable(&session, 1200.0));
        assert!(!is_acceptable(&session, 900.0));
        assert!(!is_acceptable(&session, 1250.0));
    }

    #[test]
    fn test_rejects_non_positive_price() {
        let session = test_session();

        assert!(matches!(
            validate_offer(&session, 0.0).unwrap_err(),
            BargainError::InvalidOfferPrice(_)
        ));
        assert!(matches!(
            validate_offer(&session, -100.0).unwrap_err(),
            BargainError::InvalidOfferPrice(_)
        ));
    }

    #[test]
    fn test_rejects_duplicate_price() {
        let now = SystemTime::UNIX_EPOCH;
        let mut session = test_session();
        session.record_accepted_offer(
            BargainAttempt {
                attempt_number: 1,
                kind: AttemptKind::UserOffer,
                offered_price: 1100.0,
                is_accepted: true,
                reasoning: None,
                margin_analysis: None,
                created_at: now,
            },
            now,
        );

        assert!(matches!(
            validate_offer(&session, 1100.0).unwrap_err(),
            BargainError::DuplicateOffer(_)
        ));
    }

    #[test]
    fn test_valid_offer_passes() {
        let session = test_session();
        assert!(validate_offer(&session, 900.0).is_ok());
    }
}
