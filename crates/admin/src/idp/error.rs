//! Error types for the identity provider client.

use thiserror::Error;

/// Errors that can occur when calling the identity provider API.
#[derive(Debug, Error)]
pub enum IdpError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// No account exists for the email.
    #[error("no account for this email")]
    UserNotFound,

    /// Password did not match.
    #[error("wrong password")]
    WrongPassword,

    /// The provider rejected the email as malformed.
    #[error("malformed email")]
    InvalidEmail,

    /// The account has been disabled on the provider side.
    #[error("account disabled")]
    UserDisabled,

    /// Too many failed attempts; the provider is rate-limiting.
    #[error("too many attempts")]
    TooManyAttempts,

    /// Any other coded error from the provider.
    #[error("identity provider error ({code})")]
    Api {
        /// Error code reported by the provider.
        code: String,
    },
}

impl IdpError {
    /// Map a provider error code to a typed error.
    ///
    /// Unknown codes are kept verbatim in [`IdpError::Api`] so logs stay
    /// useful, but they all collapse to one generic user message.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "EMAIL_NOT_FOUND" => Self::UserNotFound,
            "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => Self::WrongPassword,
            "INVALID_EMAIL" => Self::InvalidEmail,
            "USER_DISABLED" => Self::UserDisabled,
            c if c.starts_with("TOO_MANY_ATTEMPTS") => Self::TooManyAttempts,
            other => Self::Api {
                code: other.to_owned(),
            },
        }
    }

    /// A single-line message safe to show on the sign-in form.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::UserNotFound => "No account was found for this email.",
            Self::WrongPassword => "Incorrect password.",
            Self::InvalidEmail => "Enter a valid email address.",
            Self::UserDisabled => "This account has been disabled.",
            Self::TooManyAttempts => "Too many attempts. Please try again later.",
            Self::Http(_) | Self::Api { .. } => "Sign-in failed. Please try again.",
        }
    }
}

/// Error response body from the identity provider.
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorResponse {
    /// Nested error details.
    pub error: ApiError,
}

/// Nested error details.
#[derive(Debug, serde::Deserialize)]
pub struct ApiError {
    /// Machine-readable error code (e.g., `INVALID_PASSWORD`).
    pub message: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code_known_categories() {
        assert!(matches!(
            IdpError::from_code("EMAIL_NOT_FOUND"),
            IdpError::UserNotFound
        ));
        assert!(matches!(
            IdpError::from_code("INVALID_PASSWORD"),
            IdpError::WrongPassword
        ));
        assert!(matches!(
            IdpError::from_code("USER_DISABLED"),
            IdpError::UserDisabled
        ));
        assert!(matches!(
            IdpError::from_code("TOO_MANY_ATTEMPTS_TRY_LATER"),
            IdpError::TooManyAttempts
        ));
    }

    #[test]
    fn test_from_code_unknown_collapses_to_api() {
        let err = IdpError::from_code("QUOTA_EXCEEDED");
        assert!(matches!(err, IdpError::Api { ref code } if code == "QUOTA_EXCEEDED"));
        assert_eq!(err.user_message(), "Sign-in failed. Please try again.");
    }

    #[test]
    fn test_distinct_user_messages() {
        // Each mapped category gets its own message (unknowns share one).
        let messages = [
            IdpError::UserNotFound.user_message(),
            IdpError::WrongPassword.user_message(),
            IdpError::InvalidEmail.user_message(),
            IdpError::UserDisabled.user_message(),
            IdpError::TooManyAttempts.user_message(),
        ];
        for (i, a) in messages.iter().enumerate() {
            for b in messages.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_api_error_deserialization() {
        let json = r#"{
            "error": {
                "code": 400,
                "message": "INVALID_PASSWORD"
            }
        }"#;

        let response: ApiErrorResponse = serde_json::from_str(json).expect("deserialize");
        assert_eq!(response.error.message, "INVALID_PASSWORD");
    }
}
