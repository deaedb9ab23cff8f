//! In-memory transport for tests and offline use

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::transport::{ApiRequest, Method, Transport};
use crate::error::{ForgeMcpError, Result};

/// Records requests and answers them from canned responses
///
/// Responses are keyed by `METHOD path` (see [`ApiRequest::route`]). Requests
/// without a canned response receive the default response, which is
/// `null` unless changed.
#[derive(Debug, Default)]
pub struct MockTransport {
    requests: Mutex<Vec<ApiRequest>>,
    responses: Mutex<HashMap<String, Value>>,
    default_response: Mutex<Value>,
    failure: Mutex<Option<(u16, String)>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockTransport {
    /// A transport answering every request with `null`
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Self::set_response`]
    pub fn with_response(self, method: Method, path: &str, response: Value) -> Self {
        self.set_response(method, path, response);
        self
    }

    /// Answer `method path` with `response`
    pub fn set_response(&self, method: Method, path: &str, response: Value) {
        lock(&self.responses).insert(format!("{method} {path}"), response);
    }

    /// Answer unmatched requests with `response`
    pub fn set_default_response(&self, response: Value) {
        *lock(&self.default_response) = response;
    }

    /// Fail every following request with an API error
    pub fn fail_with(&self, status: u16, message: &str) {
        *lock(&self.failure) = Some((status, message.to_string()));
    }

    /// Stop failing requests
    pub fn clear_failure(&self) {
        *lock(&self.failure) = None;
    }

    /// Every request received so far, oldest first
    pub fn requests(&self) -> Vec<ApiRequest> {
        lock(&self.requests).clone()
    }

    /// The most recent request
    pub fn last_request(&self) -> Option<ApiRequest> {
        lock(&self.requests).last().cloned()
    }

    /// Number of requests received
    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value> {
        let route = request.route();
        lock(&self.requests).push(request);

        if let Some((status, message)) = lock(&self.failure).clone() {
            return Err(ForgeMcpError::api(status, message));
        }

        let canned = lock(&self.responses).get(&route).cloned();
        Ok(canned.unwrap_or_else(|| lock(&self.default_response).clone()))
    }
}
