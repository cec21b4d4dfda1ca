use reqwest::Method;

use crate::error::ApiError;
use crate::http::ApiClient;
use crate::types::{AccessToken, LoginPayload, RefreshPayload, RegisterPayload, TokenPair};

/// `/auth/*` endpoints.
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Exchange credentials for an access/refresh pair.
    pub async fn login(&self, payload: &LoginPayload) -> Result<TokenPair, ApiError> {
        self.client
            .send_json(Method::POST, "auth/token", payload)
            .await
    }

    pub async fn refresh(&self, refresh: &str) -> Result<AccessToken, ApiError> {
        let payload = RefreshPayload {
            refresh: refresh.to_string(),
        };
        self.client
            .send_json(Method::POST, "auth/token/refresh", &payload)
            .await
    }

    /// The response body is not used.
    pub async fn register(&self, payload: &RegisterPayload) -> Result<(), ApiError> {
        self.client
            .send_unit(Method::POST, "auth/register", Some(payload))
            .await
    }

    /// Blacklist the refresh token server-side.
    pub async fn logout(&self, refresh: &str) -> Result<(), ApiError> {
        let payload = RefreshPayload {
            refresh: refresh.to_string(),
        };
        self.client
            .send_unit(Method::POST, "auth/logout", Some(&payload))
            .await
    }
}
