//! Error types for the haggle bargain engine

use thiserror::Error;

/// Main error type for bargain operations
#[derive(Error, Debug)]
pub enum BargainError {
    // Pricing errors
    #[error("Minimum markup must be less than maximum markup: min {min}, max {max}")]
    InvalidMarkupRange { min: f64, max: f64 },

    #[error("Offer price must be greater than 0: {0}")]
    InvalidOfferPrice(f64),

    // Session lifecycle errors
    #[error("Bargain session not found: {0}")]
    SessionNotFound(String),

    #[error("Bargain session has expired: {0}")]
    SessionExpired(String),

    #[error("Maximum bargain attempts reached: {0}")]
    AttemptsExhausted(String),

    // Negotiation errors
    #[error("Offer of {0} was already made in this session")]
    DuplicateOffer(f64),

    #[error("No valid counter offer available: {0}")]
    CounterOfferExpired(String),

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for bargain operations
pub type Result<T> = std::result::Result<T, BargainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BargainError::SessionNotFound("bs_123".to_string());
        assert_eq!(err.to_string(), "Bargain session not found: bs_123");
    }

    #[test]
    fn test_markup_range_error() {
        let err = BargainError::InvalidMarkupRange { min: 20.0, max: 5.0 };
        assert_eq!(
            err.to_string(),
            "Minimum markup must be less than maximum markup: min 20, max 5"
        );
    }

    #[test]
    fn test_result_type() {
        fn sample_function() -> Result<f64> {
            Ok(42.0)
        }

        assert_eq!(sample_function().unwrap(), 42.0);
    }

    #[test]
    fn test_error_conversion() {
        fn io_error_function() -> Result<()> {
            std::fs::read_to_string("/nonexistent/file")?;
            Ok(())
        }

        let result = io_error_function();
        assert!(matches!(result.unwrap_err(), BargainError::Io(_)));
    }
}
