//! Client for the upstream travel REST API
//!
//! Every request carries the `apiKey` header. Responses are normalised so
//! callers only ever see a decoded JSON body or an [`UpstreamError`].

use reqwest::{Client, Response, header::CONTENT_TYPE};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};
use url::Url;

use crate::{
    error::{UpstreamError, UpstreamResult},
    settings::ApiConfig,
};

/// Header carrying the upstream API key
pub const API_KEY_HEADER: &str = "apiKey";

/// Upstream REST API client
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    api_key: String,
}

impl ApiClient {
    /// Create a new client for the configured upstream
    pub fn new(config: &ApiConfig) -> UpstreamResult<Self> {
        let http = Client::builder().build().map_err(UpstreamError::Network)?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Build the URL of an endpoint from its path segments
    ///
    /// Segments are percent-encoded, so ids taken from request paths cannot
    /// escape the endpoint.
    pub fn endpoint(&self, segments: &[&str]) -> UpstreamResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| UpstreamError::Url(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// POST a JSON body and return the decoded JSON response
    ///
    /// When `bearer` is given it is sent as an `Authorization: Bearer` header.
    pub async fn post_json<B>(
        &self,
        segments: &[&str],
        body: &B,
        bearer: Option<&str>,
    ) -> UpstreamResult<Value>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(segments)?;
        debug!("POST {}", url);

        let mut request = self
            .http
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(body);

        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            error!("Upstream request failed: {}", e);
            UpstreamError::Network(e)
        })?;

        decode_response(response).await
    }

    /// GET an endpoint and return its JSON body
    ///
    /// Non-JSON responses are reported as [`UpstreamError::Decode`].
    pub async fn get_json(&self, segments: &[&str]) -> UpstreamResult<Value> {
        let url = self.endpoint(segments)?;
        debug!("GET {}", url);

        let response = self
            .http
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(UpstreamError::Network)?;

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.contains("application/json"));

        if response.status().is_success() && !is_json {
            return Err(UpstreamError::Decode(
                "response is not application/json".to_string(),
            ));
        }

        decode_response(response).await
    }
}

/// Turn a response into JSON, mapping non-success statuses to errors
async fn decode_response(response: Response) -> UpstreamResult<Value> {
    let status = response.status();
    let bytes = response.bytes().await.map_err(UpstreamError::Network)?;
    let body: Option<Value> = serde_json::from_slice(&bytes).ok();

    if !status.is_success() {
        let message = body
            .as_ref()
            .and_then(|body| body.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Server error: {}", status.as_u16()));

        error!("Upstream error {}: {}", status.as_u16(), message);
        return Err(UpstreamError::Status {
            code: status.as_u16(),
            message,
        });
    }

    body.ok_or_else(|| UpstreamError::Decode("response body is not valid JSON".to_string()))
}
