//! REST error taxonomy.
//!
//! Every failure is classified into one of four [`ErrorKind`]s that decide
//! how it is surfaced: authentication failures force a sign-out,
//! validation failures show the server's detail text, connectivity
//! failures show a network notice, anything else gets a generic notice.

use bridgeai_core::error::CoreError;

/// Fallback notice texts, one per failure class.
pub mod messages {
    pub const NETWORK_ERROR: &str = "Network error. Please check your connection and try again.";
    pub const UNAUTHORIZED: &str = "You are not authorized to perform this action.";
    pub const NOT_FOUND: &str = "The requested resource was not found.";
    pub const VALIDATION_ERROR: &str = "Please check your input and try again.";
    pub const SERVER_ERROR: &str = "Something went wrong. Please try again later.";
    pub const SESSION_EXPIRED: &str = "Please sign in to continue.";
}

/// How an error should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or rejected credentials; the caller should route to login.
    Authentication,
    /// The request was understood and refused (4xx other than 401).
    Validation,
    /// The server could not be reached or did not answer in time.
    Connectivity,
    Unclassified,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No credentials in the session; nothing was sent.
    #[error("Not signed in")]
    NotAuthenticated,

    /// The backend answered 401. The session has been cleared.
    #[error("Unauthorized: {}", .0.as_deref().unwrap_or("credentials rejected"))]
    Unauthorized(Option<String>),

    /// The backend answered with a 4xx status other than 401.
    #[error("Request rejected ({status}): {}", .detail.as_deref().unwrap_or("no detail"))]
    Validation { status: u16, detail: Option<String> },

    /// The backend answered with a 5xx status.
    #[error("Server error ({status}): {}", .detail.as_deref().unwrap_or("no detail"))]
    Server { status: u16, detail: Option<String> },

    /// The HTTP request itself failed (network, DNS, TLS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The response body did not match the expected shape.
    #[error("Unexpected response body: {0}")]
    Decode(#[source] serde_json::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::NotAuthenticated | ApiError::Unauthorized(_) => ErrorKind::Authentication,
            ApiError::Validation { .. } => ErrorKind::Validation,
            ApiError::Core(CoreError::Validation(_)) => ErrorKind::Validation,
            ApiError::Request(e) if e.is_connect() || e.is_timeout() || e.is_request() => {
                ErrorKind::Connectivity
            }
            _ => ErrorKind::Unclassified,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized(_) => Some(401),
            ApiError::Validation { status, .. } | ApiError::Server { status, .. } => Some(*status),
            ApiError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Text for a transient user-facing notice.
    ///
    /// Prefers the server-provided detail, falling back to a fixed message
    /// for the error's kind.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::NotAuthenticated => messages::SESSION_EXPIRED.to_string(),
            ApiError::Unauthorized(detail) => {
                detail.clone().unwrap_or_else(|| messages::UNAUTHORIZED.to_string())
            }
            ApiError::Validation { status, detail } => detail.clone().unwrap_or_else(|| {
                if *status == 404 {
                    messages::NOT_FOUND.to_string()
                } else {
                    messages::VALIDATION_ERROR.to_string()
                }
            }),
            ApiError::Server { detail, .. } => {
                detail.clone().unwrap_or_else(|| messages::SERVER_ERROR.to_string())
            }
            ApiError::Core(CoreError::Validation(msg)) => msg.clone(),
            _ if self.kind() == ErrorKind::Connectivity => messages::NETWORK_ERROR.to_string(),
            _ => messages::SERVER_ERROR.to_string(),
        }
    }
}

/// Pull a human-readable message out of an error body.
///
/// Understands `{"detail": "..."}`, FastAPI's validation list
/// `{"detail": [{"msg": "..."}, ...]}`, and `{"error": "..."}`. A
/// non-JSON body is returned as-is when short enough to show.
pub fn extract_detail(body: &str) -> Option<String> {
    const MAX_PLAIN_DETAIL: usize = 200;

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(json) => {
            let detail = json.get("detail").or_else(|| json.get("error"))?;
            match detail {
                serde_json::Value::String(s) => Some(s.clone()),
                serde_json::Value::Array(items) => {
                    let msgs: Vec<&str> = items
                        .iter()
                        .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                        .collect();
                    (!msgs.is_empty()).then(|| msgs.join("; "))
                }
                _ => None,
            }
        }
        Err(_) if trimmed.len() <= MAX_PLAIN_DETAIL && !trimmed.starts_with('<') => {
            Some(trimmed.to_string())
        }
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_string() {
        assert_eq!(
            extract_detail(r#"{"detail":"Email already registered"}"#).as_deref(),
            Some("Email already registered")
        );
    }

    #[test]
    fn detail_validation_list() {
        let body = r#"{"detail":[{"loc":["body","email"],"msg":"field required"},{"msg":"too short"}]}"#;
        assert_eq!(
            extract_detail(body).as_deref(),
            Some("field required; too short")
        );
    }

    #[test]
    fn detail_error_key_and_plain_text() {
        assert_eq!(extract_detail(r#"{"error":"nope"}"#).as_deref(), Some("nope"));
        assert_eq!(extract_detail("Bad Gateway").as_deref(), Some("Bad Gateway"));
        assert_eq!(extract_detail("<html>oops</html>"), None);
        assert_eq!(extract_detail("   "), None);
    }

    #[test]
    fn classification() {
        assert_eq!(ApiError::NotAuthenticated.kind(), ErrorKind::Authentication);
        assert_eq!(ApiError::Unauthorized(None).kind(), ErrorKind::Authentication);
        assert_eq!(
            ApiError::Validation { status: 400, detail: None }.kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            ApiError::Server { status: 500, detail: None }.kind(),
            ErrorKind::Unclassified
        );
        assert_eq!(
            ApiError::Core(CoreError::Validation("bad".into())).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            ApiError::Core(CoreError::SessionStorage("disk full".into())).kind(),
            ErrorKind::Unclassified
        );
    }

    #[test]
    fn user_message_prefers_server_detail() {
        let err = ApiError::Validation {
            status: 400,
            detail: Some("Email already registered".into()),
        };
        assert_eq!(err.user_message(), "Email already registered");

        let err = ApiError::Validation { status: 404, detail: None };
        assert_eq!(err.user_message(), messages::NOT_FOUND);

        let err = ApiError::Server { status: 502, detail: None };
        assert_eq!(err.user_message(), messages::SERVER_ERROR);
    }

    #[test]
    fn not_found_detection() {
        assert!(ApiError::Validation { status: 404, detail: None }.is_not_found());
        assert!(!ApiError::Validation { status: 400, detail: None }.is_not_found());
        assert!(!ApiError::NotAuthenticated.is_not_found());
    }
}
