use super::{ContentGenerator, GenerateContentRequest};
use crate::error::TransportError;
use crate::Result;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::sync::{Arc, Mutex};

/// Replays queued response bodies in order, cycling when exhausted.
pub struct MockContentGenerator {
    model: String,
    responses: Arc<Mutex<Vec<String>>>,
    requests: Arc<Mutex<Vec<GenerateContentRequest>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockContentGenerator {
    pub fn new() -> Self {
        Self {
            model: "mock-model".to_string(),
            responses: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    pub fn with_response(self, body: String) -> Self {
        self.responses.lock().unwrap().push(body);
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn last_request(&self) -> Option<GenerateContentRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

impl Default for MockContentGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentGenerator for MockContentGenerator {
    fn model(&self) -> &str {
        &self.model
    }

    async fn generate_content(&self, request: &GenerateContentRequest) -> Result<String> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;

        self.requests.lock().unwrap().push(request.clone());

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(TransportError::Status {
                status: StatusCode::NOT_FOUND,
                body: "no mock response queued".to_string(),
            }
            .into());
        }

        let index = (*count - 1) % responses.len();
        Ok(responses[index].clone())
    }
}
