//! Remote API failure taxonomy.
//!
//! The messages match what the dashboard shows to users, so a hook can put
//! `err.to_string()` straight into its `error` field or a notification.

use thiserror::Error;

/// A classified failure of a remote API call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No response was received at all.
    #[error("Network error - please check your connection")]
    NetworkUnreachable,

    /// HTTP 401.
    #[error("Authentication required")]
    AuthenticationRequired,

    /// HTTP 403.
    #[error("Access forbidden")]
    AccessForbidden,

    /// HTTP 404.
    #[error("Resource not found")]
    NotFound,

    /// HTTP 500.
    #[error("Server error - please try again later")]
    ServerFault,

    /// HTTP 503.
    #[error("Service unavailable - please try again later")]
    ServiceUnavailable,

    /// HTTP 400, optionally with the server's own explanation.
    #[error("{}", .message.as_deref().unwrap_or("Bad request"))]
    Validation { message: Option<String> },

    /// Any other status.
    #[error("{}", unknown_message(.status, .message))]
    Unknown { status: u16, message: Option<String> },
}

fn unknown_message(status: &u16, message: &Option<String>) -> String {
    match message {
        Some(msg) => msg.clone(),
        None => format!("Request failed with status {}", status),
    }
}

impl ApiError {
    /// Classify an HTTP error status.
    ///
    /// `body_error` is the `error` field of the response body, if the server
    /// sent one. It is only used for 400 and unrecognized statuses.
    pub fn from_status(status: u16, body_error: Option<String>) -> Self {
        match status {
            400 => ApiError::Validation {
                message: body_error,
            },
            401 => ApiError::AuthenticationRequired,
            403 => ApiError::AccessForbidden,
            404 => ApiError::NotFound,
            500 => ApiError::ServerFault,
            503 => ApiError::ServiceUnavailable,
            _ => ApiError::Unknown {
                status,
                message: body_error,
            },
        }
    }

    /// Short code for logging.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NetworkUnreachable => "E_API_NETWORK",
            ApiError::AuthenticationRequired => "E_API_AUTH",
            ApiError::AccessForbidden => "E_API_FORBIDDEN",
            ApiError::NotFound => "E_API_NOT_FOUND",
            ApiError::ServerFault => "E_API_SERVER",
            ApiError::ServiceUnavailable => "E_API_UNAVAILABLE",
            ApiError::Validation { .. } => "E_API_VALIDATION",
            ApiError::Unknown { .. } => "E_API_UNKNOWN",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_known_codes() {
        assert_eq!(ApiError::from_status(401, None), ApiError::AuthenticationRequired);
        assert_eq!(ApiError::from_status(403, None), ApiError::AccessForbidden);
        assert_eq!(ApiError::from_status(404, None), ApiError::NotFound);
        assert_eq!(ApiError::from_status(500, None), ApiError::ServerFault);
        assert_eq!(ApiError::from_status(503, None), ApiError::ServiceUnavailable);
    }

    #[test]
    fn test_from_status_ignores_body_for_fixed_messages() {
        let err = ApiError::from_status(404, Some("workout missing".to_string()));
        assert_eq!(err.to_string(), "Resource not found");
    }

    #[test]
    fn test_validation_message() {
        assert_eq!(ApiError::from_status(400, None).to_string(), "Bad request");
        assert_eq!(
            ApiError::from_status(400, Some("name is required".to_string())).to_string(),
            "name is required"
        );
    }

    #[test]
    fn test_unknown_status_message() {
        assert_eq!(
            ApiError::from_status(418, None).to_string(),
            "Request failed with status 418"
        );
        assert_eq!(
            ApiError::from_status(502, Some("bad gateway".to_string())).to_string(),
            "bad gateway"
        );
    }

    #[test]
    fn test_network_message() {
        assert_eq!(
            ApiError::NetworkUnreachable.to_string(),
            "Network error - please check your connection"
        );
    }

    #[test]
    fn test_codes_are_distinct() {
        let codes = [
            ApiError::NetworkUnreachable.code(),
            ApiError::AuthenticationRequired.code(),
            ApiError::AccessForbidden.code(),
            ApiError::NotFound.code(),
            ApiError::ServerFault.code(),
            ApiError::ServiceUnavailable.code(),
            ApiError::Validation { message: None }.code(),
            ApiError::Unknown {
                status: 0,
                message: None,
            }
            .code(),
        ];
        let unique: std::collections::HashSet<_> = codes.iter().collect();
        assert_eq!(unique.len(), codes.len());
    }
}
