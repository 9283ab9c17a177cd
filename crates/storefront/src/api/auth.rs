//! Account and first-run setup endpoints.

use elegance_core::models::{
    AuthSession, ChangePasswordRequest, SetupStatus, SignInRequest, SignUpRequest,
    UpdateAccountRequest, User,
};
use reqwest::Method;
use serde::Deserialize;
use tracing::{info, instrument};

use super::ApiClient;
use crate::error::ApiError;

#[derive(Deserialize)]
struct UserPayload {
    user: User,
}

impl ApiClient {
    /// Register a customer account. Does not sign in.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is taken or the request fails.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<User, ApiError> {
        let payload: UserPayload = self
            .send_json(Method::POST, "/api/auth/signup", request)
            .await?;
        Ok(payload.user)
    }

    /// Sign in and keep the returned token for later requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the token cannot
    /// be persisted.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn sign_in(&self, request: &SignInRequest) -> Result<AuthSession, ApiError> {
        let session: AuthSession = self
            .send_json(Method::POST, "/api/auth/signin", request)
            .await?;
        self.set_token(Some(session.token.clone())).await?;
        info!(user_id = %session.user.id, "Signed in");
        Ok(session)
    }

    /// Forget the signed-in token.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored token cannot be removed.
    #[instrument(skip(self))]
    pub async fn sign_out(&self) -> Result<(), ApiError> {
        self.set_token(None).await?;
        self.invalidate_all().await;
        info!("Signed out");
        Ok(())
    }

    /// The signed-in user's profile.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] when no valid token is held.
    #[instrument(skip(self))]
    pub async fn me(&self) -> Result<User, ApiError> {
        let payload: UserPayload = self.get("/api/auth/me").await?;
        Ok(payload.user)
    }

    /// Update the signed-in user's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, request))]
    pub async fn update_me(&self, request: &UpdateAccountRequest) -> Result<User, ApiError> {
        let payload: UserPayload = self.send_json(Method::PUT, "/api/auth/me", request).await?;
        Ok(payload.user)
    }

    /// Change the signed-in user's password.
    ///
    /// # Errors
    ///
    /// Returns an error if the current password is wrong or the request
    /// fails.
    #[instrument(skip(self, request))]
    pub async fn change_password(&self, request: &ChangePasswordRequest) -> Result<(), ApiError> {
        self.send_discarding(
            self.request(Method::PUT, "/api/auth/me/password")
                .json(request),
        )
        .await
    }

    /// Whether the store has been set up with an administrator.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn setup_status(&self) -> Result<SetupStatus, ApiError> {
        self.get("/api/setup/status").await
    }

    /// Create the first administrator and sign in as them.
    ///
    /// # Errors
    ///
    /// Returns an error if setup was already completed or the request fails.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn setup_admin(&self, request: &SignUpRequest) -> Result<AuthSession, ApiError> {
        let session: AuthSession = self
            .send_json(Method::POST, "/api/setup/admin", request)
            .await?;
        self.set_token(Some(session.token.clone())).await?;
        info!(user_id = %session.user.id, "Administrator created");
        Ok(session)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::config::ClientConfig;
    use crate::store::{AUTH_TOKEN_KEY, LocalStore};

    use super::*;

    fn user_json() -> serde_json::Value {
        json!({"id": "u1", "email": "wanjiru@example.com", "first_name": "Wanjiru", "role": "customer"})
    }

    #[tokio::test]
    async fn test_sign_in_persists_token_and_sends_it() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/signin"))
            .and(body_json(json!({"email": "wanjiru@example.com", "password": "secret1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"token": "jwt-abc", "user": user_json()},
                "status": 200, "success": true
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/auth/me"))
            .and(header("Authorization", "Bearer jwt-abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"user": user_json()}, "status": 200, "success": true
            })))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path()).unwrap();
        let client =
            ApiClient::with_store(ClientConfig::new(&server.uri()).unwrap(), store.clone())
                .unwrap();

        let session = client
            .sign_in(&SignInRequest {
                email: "wanjiru@example.com".to_owned(),
                password: "secret1".to_owned(),
            })
            .await
            .unwrap();
        assert_eq!(session.token, "jwt-abc");
        assert_eq!(
            store.get::<String>(AUTH_TOKEN_KEY).unwrap().as_deref(),
            Some("jwt-abc")
        );

        let me = client.me().await.unwrap();
        assert_eq!(me.first_name, "Wanjiru");

        client.sign_out().await.unwrap();
        assert!(!client.is_signed_in().await);
        assert_eq!(store.get::<String>(AUTH_TOKEN_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_rejected_sign_in_keeps_signed_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/signin"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": "Invalid email or password", "status": 401, "success": false
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(ClientConfig::new(&server.uri()).unwrap()).unwrap();
        let err = client
            .sign_in(&SignInRequest {
                email: "x@y.z".to_owned(),
                password: "nope".to_owned(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Unauthorized(ref m) if m == "Invalid email or password"));
        assert!(!client.is_signed_in().await);
    }
}
