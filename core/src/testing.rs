//! In-memory `HttpClient` that records every call.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::client::HttpClient;
use crate::http::{HttpMethod, HttpResponse, RequestConfig};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordedCall {
    pub method: HttpMethod,
    pub url: String,
    pub payload: Option<serde_json::Value>,
    pub config: RequestConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FakeError(pub String);

/// Answers every request with `reply` and remembers what was asked.
#[derive(Debug, Clone)]
pub(crate) struct RecordingClient {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    reply: Result<HttpResponse, FakeError>,
}

impl RecordingClient {
    pub fn responding(status: u16, body: &str) -> Self {
        Self {
            calls: Arc::default(),
            reply: Ok(HttpResponse {
                status,
                headers: vec![("content-type".to_string(), b"application/json".to_vec())],
                body: body.as_bytes().to_vec(),
            }),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            calls: Arc::default(),
            reply: Err(FakeError(message.to_string())),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl HttpClient for RecordingClient {
    type Error = FakeError;

    async fn send<B>(
        &self,
        method: HttpMethod,
        url: &str,
        payload: Option<&B>,
        config: &RequestConfig,
    ) -> Result<HttpResponse, FakeError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let payload = payload.map(|p| serde_json::to_value(p).unwrap());
        self.calls.lock().unwrap().push(RecordedCall {
            method,
            url: url.to_string(),
            payload,
            config: config.clone(),
        });
        self.reply.clone()
    }
}
