//! Typed errors for the weather API boundary.
//!
//! The client surfaces these upward unmodified; only the controller
//! collapses them into a user-facing message.

use thiserror::Error;

use tenki_auth::AuthError;

#[derive(Debug, Error)]
pub enum WeatherApiError {
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("HTTP error: status {status}")]
    Http { status: u16 },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl WeatherApiError {
    /// HTTP status of the failed response, if this was a status failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status } => Some(*status),
            _ => None,
        }
    }

    /// Whether retrying the request could plausibly succeed without the
    /// user re-authenticating first.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Auth(_) => false,
            Self::Http { status } => *status != 401 && *status != 403,
            Self::Network(_) => true,
            Self::Parse(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn http_error_carries_status() {
        let err = WeatherApiError::Http { status: 500 };
        assert_eq!(err.status(), Some(500));
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn auth_error_converts() {
        let err: WeatherApiError = AuthError::NoSession.into();
        assert!(matches!(err, WeatherApiError::Auth(AuthError::NoSession)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn server_errors_are_retryable_but_auth_statuses_are_not() {
        assert!(WeatherApiError::Http { status: 500 }.is_retryable());
        assert!(!WeatherApiError::Http { status: 401 }.is_retryable());
        assert!(!WeatherApiError::Http { status: 403 }.is_retryable());
    }
}
