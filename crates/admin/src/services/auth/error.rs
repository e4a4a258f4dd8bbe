//! Error types for the admin authentication service.

use thiserror::Error;

use rptra_core::EmailError;

use crate::db::RepositoryError;
use crate::idp::IdpError;

/// Errors that can occur during sign-in and sign-out.
#[derive(Debug, Error)]
pub enum AdminAuthError {
    /// The submitted email failed local validation.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// The submitted password was empty.
    #[error("empty password")]
    EmptyPassword,

    /// The email is not permitted to sign in. Deliberately does not say
    /// which check failed.
    #[error("not an authorized admin")]
    NotAuthorized,

    /// The signed-in identity carries no email, so no admin record can be
    /// attached to it.
    #[error("identity has no email")]
    MissingEmail,

    /// The identity provider rejected the credentials or the call failed.
    #[error("identity provider: {0}")]
    Provider(#[from] IdpError),

    /// The admin record could not be read. Distinct from "no record": the
    /// backend was unreachable or returned bad data.
    #[error("failed to load admin record")]
    GetAdminData(#[source] RepositoryError),

    /// The admin record could not be created or refreshed.
    #[error("failed to update admin record")]
    UpsertFailed(#[source] RepositoryError),

    /// Sign-out delegation failed. Local session state is already cleared
    /// when this is returned.
    #[error("sign-out failed")]
    SignOutFailed,
}

impl AdminAuthError {
    /// A single-line message safe to show on the sign-in form.
    ///
    /// Authorization failures stay generic so the form does not reveal
    /// whether an email is on the allow-list; provider errors keep their
    /// distinct per-category messages.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidEmail(_) => "Enter a valid email address.",
            Self::EmptyPassword => "Enter your password.",
            Self::NotAuthorized | Self::MissingEmail => {
                "This account is not an authorized admin."
            }
            Self::Provider(e) => e.user_message(),
            Self::GetAdminData(_) | Self::UpsertFailed(_) => {
                "Could not reach the admin backend. Please try again."
            }
            Self::SignOutFailed => "Sign-out failed. Please try again.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_message_is_generic() {
        // Allow-list misses and email-less identities read the same, so the
        // form never reveals which check failed.
        assert_eq!(
            AdminAuthError::NotAuthorized.user_message(),
            AdminAuthError::MissingEmail.user_message()
        );
    }

    #[test]
    fn test_provider_messages_pass_through() {
        let err = AdminAuthError::Provider(IdpError::WrongPassword);
        assert_eq!(err.user_message(), IdpError::WrongPassword.user_message());
    }
}
