use std::sync::Arc;

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::auth::AuthApi;
use crate::error::ApiError;
use crate::posts::PostsApi;
use crate::profiles::ProfilesApi;
use crate::tags::TagsApi;
use crate::token::TokenSource;

/// Query string pairs, already normalized by the caller.
pub type QueryPairs = Vec<(String, String)>;

/// Shared HTTP plumbing for every resource API.
///
/// Cheap to clone: the connection pool and token source are shared.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token_source: Arc<dyn TokenSource>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, token_source: Arc<dyn TokenSource>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token_source,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn posts(&self) -> PostsApi<'_> {
        PostsApi::new(self)
    }

    pub fn profiles(&self) -> ProfilesApi<'_> {
        ProfilesApi::new(self)
    }

    pub fn tags(&self) -> TagsApi<'_> {
        TagsApi::new(self)
    }

    /// `{base}/{path}/`. The API expects the trailing slash.
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}/", self.base_url, path.trim_matches('/'))
    }

    async fn authed(&self, builder: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        match self.token_source.token().await? {
            Some(token) => Ok(builder.bearer_auth(token)),
            None => Ok(builder),
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let resp = self.authed(builder).await?.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let code = status.as_u16();
            let message = resp.text().await.unwrap_or_default();
            tracing::warn!(status = code, body = excerpt(&message), "request failed");
            return Err(ApiError::Server {
                status: code,
                message,
            });
        }
        Ok(resp)
    }

    async fn parse<R: DeserializeOwned>(resp: Response) -> Result<R, ApiError> {
        resp.json::<R>()
            .await
            .map_err(|e| ApiError::Decode(format!("response body: {e}")))
    }

    pub(crate) async fn get<R: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<R, ApiError> {
        let url = self.url(path);
        tracing::debug!(%url, ?query, "GET");
        let resp = self.send(self.http.get(&url).query(query)).await?;
        Self::parse(resp).await
    }

    pub(crate) async fn send_json<B, R>(&self, method: Method, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.url(path);
        tracing::debug!(%url, %method, "send");
        let resp = self.send(self.http.request(method, &url).json(body)).await?;
        Self::parse(resp).await
    }

    /// POST without a body, decoding the response.
    pub(crate) async fn post_empty<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        let url = self.url(path);
        tracing::debug!(%url, "POST");
        let resp = self.send(self.http.post(&url)).await?;
        Self::parse(resp).await
    }

    /// Request whose response body is ignored.
    pub(crate) async fn send_unit<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<(), ApiError> {
        let url = self.url(path);
        tracing::debug!(%url, %method, "send");
        let mut builder = self.http.request(method, &url);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.send(builder).await.map(|_| ())
    }
}

/// First 120 characters of an error body, for log lines.
fn excerpt(message: &str) -> &str {
    let end = message
        .char_indices()
        .nth(120)
        .map(|(i, _)| i)
        .unwrap_or(message.len());
    &message[..end]
}
