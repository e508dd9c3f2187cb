//! In-memory transport for tests

use crate::error::{HarnessError, Result};
use crate::http::{HttpRequest, RawResponse, Transport};
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

/// Records every request and answers from a queue.
///
/// Queued outcomes are consumed in order; once the queue is empty every call
/// gets an empty `200 OK`.
#[derive(Debug, Default)]
pub struct MockTransport {
    state: Mutex<MockState>,
}

#[derive(Debug, Default)]
struct MockState {
    requests: Vec<HttpRequest>,
    queued: VecDeque<Result<RawResponse>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond_with(&self, response: RawResponse) {
        self.lock().queued.push_back(Ok(response));
    }

    pub fn respond_json(&self, status: StatusCode, value: &Value) {
        self.respond_with(RawResponse::from_json(status, value));
    }

    pub fn fail_with(&self, err: HarnessError) {
        self.lock().queued.push_back(Err(err));
    }

    /// Number of requests that reached the transport
    pub fn calls(&self) -> usize {
        self.lock().requests.len()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.lock().requests.clone()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.lock().requests.last().cloned()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<RawResponse> {
        let mut state = self.lock();
        state.requests.push(request);
        state
            .queued
            .pop_front()
            .unwrap_or_else(|| Ok(RawResponse::new(StatusCode::OK, HeaderMap::new(), Vec::new())))
    }
}
