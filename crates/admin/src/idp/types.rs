//! Wire types for the identity provider REST API.

use serde::{Deserialize, Serialize};

/// Request body for `accounts:signInWithPassword`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest<'a> {
    /// Account email.
    pub email: &'a str,
    /// Account password.
    pub password: &'a str,
    /// Ask the provider to mint tokens for the session.
    pub return_secure_token: bool,
}

/// Response body for a successful `accounts:signInWithPassword`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    /// Provider-assigned uid.
    pub local_id: String,
    /// Account email as stored by the provider.
    pub email: Option<String>,
    /// Short-lived session token.
    pub id_token: String,
    /// Refresh token (unused here; revoked wholesale on sign-out).
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Request body for `accounts:signOut` (token revocation).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignOutRequest<'a> {
    /// The session token to revoke.
    pub id_token: &'a str,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_in_request_is_camel_case() {
        let req = SignInRequest {
            email: "staff@rptra.example",
            password: "pw",
            return_secure_token: true,
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"returnSecureToken\":true"));
    }

    #[test]
    fn test_sign_in_response_deserialization() {
        let json = r#"{
            "localId": "fWq3x9YkL2",
            "email": "staff@rptra.example",
            "idToken": "tok-123",
            "refreshToken": "ref-456",
            "expiresIn": "3600"
        }"#;

        let resp: SignInResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.local_id, "fWq3x9YkL2");
        assert_eq!(resp.email.as_deref(), Some("staff@rptra.example"));
        assert_eq!(resp.id_token, "tok-123");
    }
}
