use super::observer::{self, ResponseObserver, TracingObserver};
use super::types::{GenerateContentRequest, JSON_MIME_TYPE};
use crate::ai::ContentGenerator;
use crate::error::TransportError;
use crate::models::{ApiKey, Config, DEFAULT_BASE_URL};
use crate::retry::RetryPolicy;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini REST transport: credential header, response observer and retry
/// policy applied to every request.
pub struct GeminiHttpClient {
    client: Client,
    api_key: ApiKey,
    model: String,
    base_url: String,
    timeout: Duration,
    deadline: Option<Duration>,
    retry: RetryPolicy,
    observer: Arc<dyn ResponseObserver>,
}

impl GeminiHttpClient {
    /// Construct a Gemini client.
    ///
    /// `model` should be the bare model ID (for example `gemini-2.5-pro`),
    /// a `models/`-prefixed value is accepted and stripped.
    pub fn new(api_key: ApiKey, model: String, timeout: Duration) -> Self {
        Self::new_with_client(api_key, model, timeout, Client::new())
    }

    pub fn new_with_client(
        api_key: ApiKey,
        model: String,
        timeout: Duration,
        client: Client,
    ) -> Self {
        let model = model.strip_prefix("models/").unwrap_or(&model).to_string();

        Self {
            client,
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout,
            deadline: None,
            retry: RetryPolicy::default(),
            observer: Arc::new(TracingObserver),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.api_key.clone(),
            config.model.clone(),
            config.request_timeout,
        )
        .with_base_url(config.base_url.clone())
        .with_deadline(config.call_deadline)
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn ResponseObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Bound each call, retries and backoff included. `None` disables it.
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Returns the configured model ID without the `models/` prefix.
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn post_once(
        &self,
        url: &str,
        body: &[u8],
    ) -> std::result::Result<String, TransportError> {
        let response = self
            .client
            .post(url)
            .timeout(self.timeout)
            .header(API_KEY_HEADER, self.api_key.expose())
            .header(CONTENT_TYPE, JSON_MIME_TYPE)
            .body(body.to_vec())
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to Gemini: {}", e);
                e
            })?;

        let status = response.status();
        let body = response.text().await?;
        observer::notify(&self.observer, status, &body);

        if !status.is_success() {
            tracing::error!("Gemini API error (status {}): {}", status, body);
            return Err(TransportError::Status { status, body });
        }

        Ok(body)
    }

    /// POST `request` to `url` under the retry policy and deadline, returning
    /// the raw response body. The request is encoded once, before the first
    /// attempt; an encoding failure is never retried.
    pub async fn post_json<Req: Serialize>(&self, url: &str, request: &Req) -> Result<String> {
        let body = serde_json::to_vec(request).map_err(|e| {
            tracing::error!("Failed to encode Gemini request: {}", e);
            Error::Serialization(e)
        })?;
        let attempts = self.retry.run(|| self.post_once(url, &body));

        match self.deadline {
            Some(deadline) => match tokio::time::timeout(deadline, attempts).await {
                Ok(result) => Ok(result?),
                Err(_) => {
                    tracing::error!("Gemini call exceeded deadline of {:?}", deadline);
                    Err(Error::DeadlineExceeded(deadline))
                }
            },
            None => Ok(attempts.await?),
        }
    }

    /// Calls Gemini's `generateContent` endpoint.
    pub async fn generate_content<Req: Serialize>(&self, request: &Req) -> Result<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        self.post_json(&url, request).await
    }
}

#[async_trait]
impl ContentGenerator for GeminiHttpClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn generate_content(&self, request: &GenerateContentRequest) -> Result<String> {
        GeminiHttpClient::generate_content(self, request).await
    }
}
