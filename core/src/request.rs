//! Bound request descriptors.
//!
//! A descriptor captures method, URL and config when it is built and never
//! changes afterwards. Calling it performs one request through its client;
//! calling it again performs another. Nothing is cached between calls.

use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::client::{HttpClient, UreqClient};
use crate::http::{HttpMethod, HttpResponse, RequestConfig};

/// A request without a payload, produced by `get` and `delete`.
pub struct Bound<TResp = Value, C = UreqClient> {
    client: C,
    method: HttpMethod,
    url: String,
    config: RequestConfig,
    _response: PhantomData<fn() -> TResp>,
}

/// A request that takes its payload at call time, produced by `post`, `put`
/// and `patch`.
pub struct BoundWithPayload<TReq = Value, TResp = Value, C = UreqClient> {
    client: C,
    method: HttpMethod,
    url: String,
    config: RequestConfig,
    _types: PhantomData<fn(&TReq) -> TResp>,
}

impl<TResp, C> Bound<TResp, C> {
    pub(crate) fn new(client: C, method: HttpMethod, url: String, config: RequestConfig) -> Self {
        Self {
            client,
            method,
            url,
            config,
            _response: PhantomData,
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn config(&self) -> &RequestConfig {
        &self.config
    }
}

impl<TResp, C: HttpClient> Bound<TResp, C> {
    /// Perform the request. Client errors are returned untouched.
    pub async fn call(&self) -> Result<Response<TResp>, C::Error> {
        debug!(method = %self.method, url = %self.url, "sending request");
        self.client
            .send::<()>(self.method, &self.url, None, &self.config)
            .await
            .map(Response::new)
    }
}

impl<TReq, TResp, C> BoundWithPayload<TReq, TResp, C> {
    pub(crate) fn new(client: C, method: HttpMethod, url: String, config: RequestConfig) -> Self {
        Self {
            client,
            method,
            url,
            config,
            _types: PhantomData,
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn config(&self) -> &RequestConfig {
        &self.config
    }
}

impl<TReq, TResp, C> BoundWithPayload<TReq, TResp, C>
where
    TReq: Serialize + Sync,
    C: HttpClient,
{
    /// Perform the request with `payload` as its body. Client errors are
    /// returned untouched.
    pub async fn call(&self, payload: &TReq) -> Result<Response<TResp>, C::Error> {
        debug!(method = %self.method, url = %self.url, "sending request with payload");
        self.client
            .send(self.method, &self.url, Some(payload), &self.config)
            .await
            .map(Response::new)
    }
}

impl<TResp, C: Clone> Clone for Bound<TResp, C> {
    fn clone(&self) -> Self {
        Self::new(
            self.client.clone(),
            self.method,
            self.url.clone(),
            self.config.clone(),
        )
    }
}

impl<TReq, TResp, C: Clone> Clone for BoundWithPayload<TReq, TResp, C> {
    fn clone(&self) -> Self {
        Self::new(
            self.client.clone(),
            self.method,
            self.url.clone(),
            self.config.clone(),
        )
    }
}

impl<TResp, C> fmt::Debug for Bound<TResp, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bound")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<TReq, TResp, C> fmt::Debug for BoundWithPayload<TReq, TResp, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundWithPayload")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// The client's response, tagged with the type the caller expects in its body.
///
/// The tag is never checked on its own; `json` is the only place the body is
/// read as `T`.
pub struct Response<T = Value> {
    inner: HttpResponse,
    _data: PhantomData<fn() -> T>,
}

impl<T> Response<T> {
    pub fn new(inner: HttpResponse) -> Self {
        Self {
            inner,
            _data: PhantomData,
        }
    }

    pub fn status(&self) -> u16 {
        self.inner.status
    }

    pub fn headers(&self) -> &[(String, Vec<u8>)] {
        &self.inner.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.inner.body
    }

    pub fn into_inner(self) -> HttpResponse {
        self.inner
    }
}

impl<T: DeserializeOwned> Response<T> {
    pub fn json(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.inner.body)
    }
}

impl<T> Deref for Response<T> {
    type Target = HttpResponse;

    fn deref(&self) -> &HttpResponse {
        &self.inner
    }
}

impl<T> Clone for Response<T> {
    fn clone(&self) -> Self {
        Self::new(self.inner.clone())
    }
}

impl<T> PartialEq for Response<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T> fmt::Debug for Response<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}
