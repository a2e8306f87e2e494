//! The underlying HTTP client seam and its default ureq implementation.
//!
//! # Design
//! Bound descriptors know nothing about the network. They hand method, URL,
//! payload and config to an `HttpClient` and return whatever it produces.
//! `UreqClient` is the client used when none is given: ureq is blocking, so
//! each exchange runs on tokio's blocking pool and the awaiting task is
//! suspended instead of stalling the executor.

use std::fmt;
use std::future::Future;
use std::sync::LazyLock;
use std::time::Duration;

use serde::Serialize;
use tracing::trace;
use ureq::http::Response as UreqResponse;
use ureq::typestate::WithBody;
use ureq::{Agent, Body, RequestBuilder};

use crate::error::ClientError;
use crate::http::{HttpMethod, HttpResponse, RequestConfig};

/// Something that can perform one HTTP request.
///
/// Implementations own payload serialization, status policy and timeouts.
/// Every call must issue exactly one request.
pub trait HttpClient {
    type Error;

    fn send<B>(
        &self,
        method: HttpMethod,
        url: &str,
        payload: Option<&B>,
        config: &RequestConfig,
    ) -> impl Future<Output = Result<HttpResponse, Self::Error>> + Send
    where
        B: Serialize + ?Sized + Sync;
}

static SHARED_AGENT: LazyLock<Agent> =
    LazyLock::new(|| Agent::config_builder().build().new_agent());

/// `HttpClient` backed by a `ureq::Agent`.
///
/// Clones share the agent and its connection pool.
///
/// `send` must be polled inside a Tokio runtime; the exchange is handed to
/// `spawn_blocking`, which panics without one. Dropping the future does not
/// cancel the request: the blocking exchange still runs to completion and
/// its result is discarded. Bound a call with `RequestConfig::timeout`.
///
/// The response body is read in full with no size limit.
#[derive(Clone)]
pub struct UreqClient {
    agent: Agent,
}

impl fmt::Debug for UreqClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqClient").finish_non_exhaustive()
    }
}

impl UreqClient {
    pub fn new(agent: Agent) -> Self {
        Self { agent }
    }

    /// Handle to the process-wide agent used by the free factory functions.
    pub fn shared() -> Self {
        Self::new(SHARED_AGENT.clone())
    }

    /// A fresh agent whose requests time out after `timeout` unless the
    /// request config says otherwise.
    pub fn with_timeout(timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self::new(agent)
    }
}

impl Default for UreqClient {
    fn default() -> Self {
        Self::shared()
    }
}

impl HttpClient for UreqClient {
    type Error = ClientError;

    async fn send<B>(
        &self,
        method: HttpMethod,
        url: &str,
        payload: Option<&B>,
        config: &RequestConfig,
    ) -> Result<HttpResponse, ClientError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let body = payload.map(serde_json::to_string).transpose()?;
        let agent = self.agent.clone();
        let url = config.resolve_url(url);
        let config = config.clone();

        tokio::task::spawn_blocking(move || exchange(&agent, method, &url, body, &config))
            .await
            .map_err(ClientError::Runtime)?
    }
}

/// Run one blocking request/response exchange.
fn exchange(
    agent: &Agent,
    method: HttpMethod,
    url: &str,
    body: Option<String>,
    config: &RequestConfig,
) -> Result<HttpResponse, ClientError> {
    let response = match method {
        HttpMethod::Get => configure(agent.get(url), config).call(),
        HttpMethod::Delete => configure(agent.delete(url), config).call(),
        HttpMethod::Post => send_body(configure(agent.post(url), config), body),
        HttpMethod::Put => send_body(configure(agent.put(url), config), body),
        HttpMethod::Patch => send_body(configure(agent.patch(url), config), body),
    }?;

    trace!(%method, url, status = response.status().as_u16(), "response received");
    Ok(into_http_response(response)?)
}

fn configure<S>(request: RequestBuilder<S>, config: &RequestConfig) -> RequestBuilder<S> {
    let mut request = config
        .effective_headers()
        .iter()
        .fold(request, |request, (name, value)| {
            request.header(name.as_str(), value.as_str())
        });
    for (name, value) in &config.params {
        request = request.query(name, value);
    }

    let mut scoped = request
        .config()
        .http_status_as_error(config.http_status_as_error);
    if let Some(timeout) = config.timeout {
        scoped = scoped.timeout_global(Some(timeout));
    }
    scoped.build()
}

fn send_body(
    request: RequestBuilder<WithBody>,
    body: Option<String>,
) -> Result<UreqResponse<Body>, ureq::Error> {
    match body {
        Some(body) => request
            .content_type("application/json")
            .send(body.as_bytes()),
        None => request.send_empty(),
    }
}

fn into_http_response(mut response: UreqResponse<Body>) -> Result<HttpResponse, ureq::Error> {
    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                value.as_bytes().to_vec(),
            )
        })
        .collect();
    let body = response
        .body_mut()
        .with_config()
        .limit(u64::MAX)
        .read_to_vec()?;

    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}
