//! Core types used throughout the bargain engine

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for bargain sessions (random opaque token)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    /// Generate a new unique session ID from 16 random bytes
    pub fn generate() -> Self {
        let token: [u8; 16] = rand::random();
        Self(format!("bs_{}", hex::encode(token)))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the negotiating user, as supplied by the identity provider
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of inventory the session negotiates over
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingType {
    Flight,
    Hotel,
}

impl fmt::Display for BookingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingType::Flight => write!(f, "flight"),
            BookingType::Hotel => write!(f, "hotel"),
        }
    }
}

/// Reference to the item being negotiated, with an opaque snapshot of its
/// data as it looked when the session started
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ItemRef {
    pub booking_type: BookingType,
    pub item_id: String,
    pub item_data: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_generation() {
        let a = SessionId::generate();
        let b = SessionId::generate();

        assert!(a.0.starts_with("bs_"));
        assert_eq!(a.0.len(), 3 + 32);
        assert_ne!(a, b);
    }

    #[test]
    fn test_booking_type_serialization() {
        let json = serde_json::to_string(&BookingType::Flight).unwrap();
        assert_eq!(json, "\"flight\"");

        let parsed: BookingType = serde_json::from_str("\"hotel\"").unwrap();
        assert_eq!(parsed, BookingType::Hotel);
    }

    #[test]
    fn test_item_ref_roundtrip() {
        let item = ItemRef {
            booking_type: BookingType::Hotel,
            item_id: "HTL-889".to_string(),
            item_data: serde_json::json!({ "nights": 2, "is_premium": true }),
        };

        let serialized = serde_json::to_string(&item).unwrap();
        let deserialized: ItemRef = serde_json::from_str(&serialized).unwrap();

        assert_eq!(deserialized.item_id, "HTL-889");
        assert_eq!(deserialized.booking_type, BookingType::Hotel);
    }
}
