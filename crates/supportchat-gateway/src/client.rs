// SPDX-FileCopyrightText: 2026 SupportChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the support backend's REST endpoints.
//!
//! Provides [`BackendClient`], which handles URL construction, JSON bodies and
//! status checking. There is no retry: a failed request is reported once and
//! the widget turns it into a visible message.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use supportchat_core::SupportChatError;
use tracing::debug;

/// HTTP client bound to one backend base URL.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: Url,
}

impl BackendClient {
    /// Creates a client for `base_url` with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SupportChatError> {
        let base_url = Url::parse(base_url.trim()).map_err(|e| {
            SupportChatError::Config(format!("invalid backend base URL `{base_url}`: {e}"))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(SupportChatError::Config(format!(
                "backend base URL `{base_url}` cannot carry a path"
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| SupportChatError::Network {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self { client, base_url })
    }

    /// Returns the configured base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Joins path segments onto the base URL, percent-encoding each one.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Issues a GET and decodes the JSON success body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
    ) -> Result<T, SupportChatError> {
        let response = self.execute(Method::GET, segments, None::<&()>).await?;
        decode(response).await
    }

    /// Issues a POST with a JSON body and decodes the JSON success body.
    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, SupportChatError> {
        let response = self.execute(Method::POST, segments, Some(body)).await?;
        decode(response).await
    }

    /// Issues a DELETE. Only the status matters; the body is ignored.
    pub async fn delete(&self, segments: &[&str]) -> Result<(), SupportChatError> {
        self.execute(Method::DELETE, segments, None::<&()>).await?;
        Ok(())
    }

    async fn execute<B: Serialize>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<Response, SupportChatError> {
        let url = self.endpoint(segments);
        let mut request = self.client.request(method.clone(), url.clone());
        if let Some(body) = body {
            let payload = serde_json::to_vec(body).map_err(|e| SupportChatError::Network {
                message: format!("failed to encode request body: {e}"),
                source: Some(Box::new(e)),
            })?;
            request = request
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(payload);
        }

        let response = request.send().await.map_err(|e| SupportChatError::Network {
            message: format!("{method} {} failed: {e}", url.path()),
            source: Some(Box::new(e)),
        })?;

        let status = response.status();
        debug!(%method, path = url.path(), status = %status, "backend response received");

        if !status.is_success() {
            return Err(SupportChatError::network(format!(
                "{method} {} returned {status}",
                url.path()
            )));
        }
        Ok(response)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, SupportChatError> {
    let body = response.text().await.map_err(|e| SupportChatError::Network {
        message: format!("failed to read response body: {e}"),
        source: Some(Box::new(e)),
    })?;
    serde_json::from_str(&body).map_err(|e| SupportChatError::Network {
        message: format!("failed to parse response body: {e}"),
        source: Some(Box::new(e)),
    })
}
