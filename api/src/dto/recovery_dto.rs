use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BeginRecoveryRequest {
    #[validate(length(max = 254), email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(max = 2048, message = "Return URL is too long"))]
    pub return_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeginRecoveryResponse {
    pub message: String,
    /// Mail domain the message went to, e.g. "example.com"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

impl BeginRecoveryResponse {
    /// The body returned for every accepted begin request
    pub fn accepted(provider: Option<String>) -> Self {
        Self {
            message: "If an account exists for this address, a recovery link has been sent".to_string(),
            provider,
        }
    }
}

/// `?key=` carried by the confirm and cancel links
#[derive(Debug, Clone, Deserialize)]
pub struct TokenQuery {
    #[serde(default)]
    pub key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmPreviewResponse {
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ConfirmRecoveryRequest {
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    pub password_confirmation: String,
}

impl ConfirmRecoveryRequest {
    pub fn confirmation_matches(&self) -> bool {
        self.password == self.password_confirmation
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmRecoveryResponse {
    pub redirect_to: String,
    pub signed_in: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelRecoveryResponse {
    pub redirect_to: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_request_requires_valid_email() {
        let request = BeginRecoveryRequest {
            email: "not-an-email".to_string(),
            return_url: None,
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));

        let request = BeginRecoveryRequest {
            email: "user@example.com".to_string(),
            return_url: Some("/dashboard".to_string()),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_confirmation_mismatch_is_detected() {
        let request = ConfirmRecoveryRequest {
            password: "secret123".to_string(),
            password_confirmation: "secret124".to_string(),
        };
        assert!(request.validate().is_ok());
        assert!(!request.confirmation_matches());
    }

    #[test]
    fn test_missing_key_deserializes_empty() {
        let query: TokenQuery = serde_json::from_str("{}").unwrap();
        assert!(query.key.is_empty());
    }
}
