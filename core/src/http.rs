//! Plain-data HTTP types shared by the factories and the underlying client.
//!
//! # Design
//! `RequestConfig` is the option bag handed to the client untouched. It is an
//! owned value so a bound descriptor can keep its own copy for as long as it
//! lives. `HttpResponse` is whatever the client produced; nothing between the
//! client and the caller rewrites it. Header values and the body stay raw
//! bytes, decoding is left to whoever reads them.

use std::borrow::Cow;
use std::fmt;
use std::time::Duration;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether requests with this method carry a payload.
    pub fn has_payload(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-request options passed through to the underlying client.
///
/// `RequestConfig::default()` is what an omitted config means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestConfig {
    /// Prepended to relative URLs. Ignored when the URL starts with
    /// `scheme://` or `//`.
    pub base_url: Option<String>,
    pub headers: Vec<(String, String)>,
    /// Query parameters, appended in order.
    pub params: Vec<(String, String)>,
    /// `None` leaves the client's own timeout in effect.
    pub timeout: Option<Duration>,
    /// Sent as `Authorization: Bearer <token>`.
    pub bearer_token: Option<String>,
    /// When set, non-2xx statuses fail the request with the client's error.
    pub http_status_as_error: bool,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            headers: Vec::new(),
            params: Vec::new(),
            timeout: None,
            bearer_token: None,
            http_status_as_error: true,
        }
    }
}

impl RequestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    pub fn with_http_status_as_error(mut self, enabled: bool) -> Self {
        self.http_status_as_error = enabled;
        self
    }

    /// Resolve `url` against `base_url`.
    ///
    /// Absolute URLs (`scheme://...` or protocol-relative `//...`) are
    /// returned unchanged, as is everything when no base is configured. No
    /// validation happens here.
    pub fn resolve_url(&self, url: &str) -> String {
        match &self.base_url {
            Some(base) if !is_absolute_url(url) => {
                if url.is_empty() {
                    return base.clone();
                }
                format!(
                    "{}/{}",
                    base.trim_end_matches('/'),
                    url.trim_start_matches('/')
                )
            }
            _ => url.to_string(),
        }
    }

    /// Headers as they go on the wire, with the bearer token appended last.
    pub fn effective_headers(&self) -> Vec<(String, String)> {
        let mut headers = self.headers.clone();
        if let Some(token) = &self.bearer_token {
            headers.push(("authorization".to_string(), format!("Bearer {token}")));
        }
        headers
    }
}

/// `scheme://` per RFC 3986 (`ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`),
/// or a protocol-relative `//`.
fn is_absolute_url(url: &str) -> bool {
    if url.starts_with("//") {
        return true;
    }
    let Some((scheme, _)) = url.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// An HTTP response as produced by the underlying client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    /// Names are lowercase; values are the bytes received.
    pub headers: Vec<(String, Vec<u8>)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// First header named `name`, compared case-insensitively, if its value
    /// is valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.header_bytes(name)
            .and_then(|value| std::str::from_utf8(value).ok())
    }

    pub fn header_bytes(&self, name: &str) -> Option<&[u8]> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_slice())
    }

    /// The body decoded as UTF-8, with invalid sequences replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
