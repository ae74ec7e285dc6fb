//! Error types for the kitchen-sakhi service.
//!
//! Every failure the service can produce is a [`KitchenError`]. The variants
//! follow the request lifecycle:
//!
//! * **Validation**: the caller forgot a required field. Reported as `400`
//!   with a short fixed message and nothing else.
//! * **Provider / Storage / Render**: a downstream collaborator (model,
//!   document store, PDF writer) failed. Reported as `500` together with a
//!   diagnostic string in [`ErrorBody::details`].
//! * **ProviderNotConfigured / InvalidConfig**: startup errors; they never
//!   reach an HTTP client because the server refuses to start.
//!
//! The HTTP layer turns errors into an [`ErrorBody`] envelope, so no error
//! ever crosses the request boundary unhandled.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Short text shown to clients when the document store fails.
///
/// The underlying driver error is logged, never returned.
pub const STORAGE_UNAVAILABLE: &str = "history store unavailable";

/// All errors returned by the kitchen-sakhi library.
#[derive(Debug, Error)]
pub enum KitchenError {
    // ── Request errors ────────────────────────────────────────────────────
    /// A required request field is missing or empty.
    #[error("{message}")]
    Validation { message: &'static str },

    /// The request body is not valid JSON for the endpoint.
    #[error("Invalid JSON body: {detail}")]
    MalformedBody { detail: String },

    // ── Downstream errors ─────────────────────────────────────────────────
    /// The generative model call failed (quota, timeout, network, ...).
    #[error("{detail}")]
    Provider { detail: String },

    /// The history record could not be written.
    #[error("History store error: {detail}")]
    Storage { detail: String },

    /// PDF generation or the file write failed.
    #[error("{detail}")]
    Render { detail: String },

    // ── Startup errors ────────────────────────────────────────────────────
    /// The model provider could not be built (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl KitchenError {
    /// HTTP status code this error maps to.
    pub fn status(&self) -> u16 {
        match self {
            KitchenError::Validation { .. } | KitchenError::MalformedBody { .. } => 400,
            _ => 500,
        }
    }

    /// Build the client-facing envelope.
    ///
    /// `failure` is the operation's fixed message ("Plan generation failed",
    /// ...) used for every non-validation error.
    pub fn to_body(&self, failure: &str) -> ErrorBody {
        match self {
            KitchenError::Validation { message } => ErrorBody {
                error: (*message).to_string(),
                details: None,
            },
            KitchenError::MalformedBody { detail } => ErrorBody {
                error: "Invalid JSON body".to_string(),
                details: Some(detail.clone()),
            },
            KitchenError::Storage { .. } => ErrorBody {
                error: failure.to_string(),
                details: Some(STORAGE_UNAVAILABLE.to_string()),
            },
            other => ErrorBody {
                error: failure.to_string(),
                details: Some(other.to_string()),
            },
        }
    }
}

/// JSON error envelope: `{"error": "...", "details": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_body_has_no_details() {
        let e = KitchenError::Validation {
            message: "Ingredients missing",
        };
        assert_eq!(e.status(), 400);
        let json = serde_json::to_string(&e.to_body("ignored")).unwrap();
        assert_eq!(json, r#"{"error":"Ingredients missing"}"#);
    }

    #[test]
    fn provider_body_carries_raw_detail() {
        let e = KitchenError::Provider {
            detail: "quota exceeded".into(),
        };
        assert_eq!(e.status(), 500);
        let body = e.to_body("Failed to generate response");
        assert_eq!(body.error, "Failed to generate response");
        assert_eq!(body.details.as_deref(), Some("quota exceeded"));
    }

    #[test]
    fn storage_body_hides_driver_error() {
        let e = KitchenError::Storage {
            detail: "connection refused at 10.0.0.3:27017".into(),
        };
        let body = e.to_body("Plan generation failed");
        assert_eq!(body.details.as_deref(), Some(STORAGE_UNAVAILABLE));
        assert!(!serde_json::to_string(&body).unwrap().contains("10.0.0.3"));
    }

    #[test]
    fn malformed_body_is_client_error() {
        let e = KitchenError::MalformedBody {
            detail: "expected value at line 1".into(),
        };
        assert_eq!(e.status(), 400);
        assert_eq!(e.to_body("x").error, "Invalid JSON body");
    }

    #[test]
    fn provider_not_configured_display() {
        let e = KitchenError::ProviderNotConfigured {
            provider: "gemini".into(),
            hint: "Set GEMINI_API_KEY".into(),
        };
        assert!(e.to_string().contains("gemini"));
        assert!(e.to_string().contains("GEMINI_API_KEY"));
    }
}
