//! API response payloads
//!
//! The record cached for a successful live call and handed to callers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status reported when the transport never got an HTTP response
pub const STATUS_NETWORK_ERROR: u16 = 0;

// == API Response ==
/// Decoded body and HTTP status of one API call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    /// Decoded response body
    pub data: Value,
    /// HTTP status code
    pub status: u16,
}

impl ApiResponse {
    /// Creates a response from its parts.
    pub fn new(data: Value, status: u16) -> Self {
        Self { data, status }
    }

    /// Creates a failure response for a call that produced no HTTP status.
    pub fn network_error(message: impl Into<String>) -> Self {
        Self::new(Value::String(message.into()), STATUS_NETWORK_ERROR)
    }

    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_range() {
        assert!(ApiResponse::new(json!(null), 200).is_success());
        assert!(ApiResponse::new(json!(null), 204).is_success());
        assert!(!ApiResponse::new(json!(null), 404).is_success());
        assert!(!ApiResponse::network_error("refused").is_success());
    }

    #[test]
    fn test_serialized_shape() {
        let response = ApiResponse::new(json!({"id": 7}), 200);
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"data": {"id": 7}, "status": 200})
        );
    }
}
