//! Pre-bound HTTP requests.
//!
//! # Overview
//! `get`, `post`, `put`, `patch` and `delete` capture a URL and a
//! `RequestConfig` and return a descriptor. Nothing touches the network
//! until the descriptor is called: with no arguments for `get`/`delete`,
//! with the payload for `post`/`put`/`patch`. Each call is one request.
//!
//! ```no_run
//! # async fn run() -> Result<(), simple_http::ClientError> {
//! use simple_http::{get, post, Bound, BoundWithPayload};
//! use serde_json::{json, Value};
//!
//! let fetch_user: Bound = get("http://localhost:3000/users/42", None);
//! let create_user: BoundWithPayload = post("http://localhost:3000/users", None);
//!
//! let user = fetch_user.call().await?;
//! let created = create_user.call(&json!({"name": "Ada"})).await?;
//! # let _: (Value, u16) = (user.json().unwrap(), created.status());
//! # Ok(())
//! # }
//! ```
//!
//! # Design
//! - Descriptors are immutable: method, URL and config are fixed at
//!   construction.
//! - The network lives behind `HttpClient`. The free functions and
//!   `Simple::default()` use `UreqClient::shared()`; `Simple::new` takes any
//!   other client.
//! - Errors belong to the client and reach the caller unchanged.
//! - `TReq`/`TResp` only tag types. No shape check happens unless the caller
//!   asks for `Response::json`.
//! - Response bodies and header values are kept as raw bytes; `text` and
//!   `header` decode on demand.
//! - `UreqClient` runs each exchange through `tokio::task::spawn_blocking`,
//!   so its descriptors must be awaited inside a Tokio runtime. Dropping a
//!   `call` future does not abort the exchange already handed to the
//!   blocking pool; use `RequestConfig::timeout` to bound it.

pub mod client;
pub mod error;
pub mod http;
pub mod request;
pub mod simple;

#[cfg(test)]
mod testing;

pub use client::{HttpClient, UreqClient};
pub use error::ClientError;
pub use http::{HttpMethod, HttpResponse, RequestConfig};
pub use request::{Bound, BoundWithPayload, Response};
pub use simple::{delete, get, patch, post, put, simple, Simple};
