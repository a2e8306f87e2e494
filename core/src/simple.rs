//! The five request factories and the `Simple` aggregate that groups them.
//!
//! Factories only build descriptors. They perform no I/O and no validation;
//! an empty or malformed URL is the client's to reject when the descriptor
//! is called.

use crate::client::{HttpClient, UreqClient};
use crate::http::{HttpMethod, RequestConfig};
use crate::request::{Bound, BoundWithPayload};

/// Bind a GET to `url` on the shared ureq client.
pub fn get<TResp>(url: impl Into<String>, config: Option<RequestConfig>) -> Bound<TResp> {
    simple().get(url, config)
}

/// Bind a POST to `url`; the payload is supplied on each call.
pub fn post<TReq, TResp>(
    url: impl Into<String>,
    config: Option<RequestConfig>,
) -> BoundWithPayload<TReq, TResp> {
    simple().post(url, config)
}

pub fn put<TReq, TResp>(
    url: impl Into<String>,
    config: Option<RequestConfig>,
) -> BoundWithPayload<TReq, TResp> {
    simple().put(url, config)
}

pub fn patch<TReq, TResp>(
    url: impl Into<String>,
    config: Option<RequestConfig>,
) -> BoundWithPayload<TReq, TResp> {
    simple().patch(url, config)
}

pub fn delete<TResp>(url: impl Into<String>, config: Option<RequestConfig>) -> Bound<TResp> {
    simple().delete(url, config)
}

/// The default aggregate, backed by the shared ureq client.
pub fn simple() -> Simple {
    Simple::default()
}

/// The five factories bound to one `HttpClient`.
///
/// Every descriptor built here carries a clone of the client.
#[derive(Debug, Clone)]
pub struct Simple<C = UreqClient> {
    client: C,
}

impl Default for Simple<UreqClient> {
    fn default() -> Self {
        Self::new(UreqClient::shared())
    }
}

impl<C> Simple<C>
where
    C: HttpClient + Clone,
{
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn get<TResp>(
        &self,
        url: impl Into<String>,
        config: Option<RequestConfig>,
    ) -> Bound<TResp, C> {
        self.bind(HttpMethod::Get, url, config)
    }

    pub fn post<TReq, TResp>(
        &self,
        url: impl Into<String>,
        config: Option<RequestConfig>,
    ) -> BoundWithPayload<TReq, TResp, C> {
        self.bind_with_payload(HttpMethod::Post, url, config)
    }

    pub fn put<TReq, TResp>(
        &self,
        url: impl Into<String>,
        config: Option<RequestConfig>,
    ) -> BoundWithPayload<TReq, TResp, C> {
        self.bind_with_payload(HttpMethod::Put, url, config)
    }

    pub fn patch<TReq, TResp>(
        &self,
        url: impl Into<String>,
        config: Option<RequestConfig>,
    ) -> BoundWithPayload<TReq, TResp, C> {
        self.bind_with_payload(HttpMethod::Patch, url, config)
    }

    pub fn delete<TResp>(
        &self,
        url: impl Into<String>,
        config: Option<RequestConfig>,
    ) -> Bound<TResp, C> {
        self.bind(HttpMethod::Delete, url, config)
    }

    fn bind<TResp>(
        &self,
        method: HttpMethod,
        url: impl Into<String>,
        config: Option<RequestConfig>,
    ) -> Bound<TResp, C> {
        Bound::new(
            self.client.clone(),
            method,
            url.into(),
            config.unwrap_or_default(),
        )
    }

    fn bind_with_payload<TReq, TResp>(
        &self,
        method: HttpMethod,
        url: impl Into<String>,
        config: Option<RequestConfig>,
    ) -> BoundWithPayload<TReq, TResp, C> {
        BoundWithPayload::new(
            self.client.clone(),
            method,
            url.into(),
            config.unwrap_or_default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::{json, Value};

    use super::*;
    use crate::testing::{FakeError, RecordingClient};

    fn recording() -> (Simple<RecordingClient>, RecordingClient) {
        let client = RecordingClient::responding(200, r#"{"ok":true}"#);
        (Simple::new(client.clone()), client)
    }

    #[tokio::test]
    async fn each_factory_issues_its_own_method() {
        let (api, client) = recording();
        let body = json!({"name": "Ada"});

        api.get::<Value>("/users/42", None).call().await.unwrap();
        api.post::<Value, Value>("/users", None).call(&body).await.unwrap();
        api.put::<Value, Value>("/users/42", None).call(&body).await.unwrap();
        api.patch::<Value, Value>("/users/42", None).call(&body).await.unwrap();
        api.delete::<Value>("/users/42", None).call().await.unwrap();

        let calls: Vec<_> = client
            .calls()
            .into_iter()
            .map(|c| (c.method, c.url, c.payload))
            .collect();
        assert_eq!(
            calls,
            vec![
                (HttpMethod::Get, "/users/42".to_string(), None),
                (HttpMethod::Post, "/users".to_string(), Some(body.clone())),
                (HttpMethod::Put, "/users/42".to_string(), Some(body.clone())),
                (HttpMethod::Patch, "/users/42".to_string(), Some(body.clone())),
                (HttpMethod::Delete, "/users/42".to_string(), None),
            ]
        );
    }

    #[tokio::test]
    async fn factories_perform_no_io() {
        let (api, client) = recording();

        let _fetch = api.get::<Value>("/items", None);
        let _create = api.post::<Value, Value>("/items", None);
        let _remove = api.delete::<Value>("", None);

        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn calling_twice_issues_two_requests() {
        let (api, client) = recording();
        let fetch_items = api.get::<Value>("/items", None);

        let first = fetch_items.call().await.unwrap();
        let second = fetch_items.call().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(client.calls().len(), 2);
    }

    #[tokio::test]
    async fn omitted_config_equals_default_config() {
        let (api, client) = recording();

        api.get::<Value>("/a", None).call().await.unwrap();
        api.get::<Value>("/a", Some(RequestConfig::default()))
            .call()
            .await
            .unwrap();

        let calls = client.calls();
        assert_eq!(calls[0], calls[1]);
    }

    #[tokio::test]
    async fn config_is_passed_through_unchanged() {
        let (api, client) = recording();
        let config = RequestConfig::new()
            .with_header("x-request-id", "7")
            .with_param("q", "rust")
            .with_timeout(Duration::from_secs(3))
            .with_http_status_as_error(false);

        api.patch::<Value, Value>("/users/1", Some(config.clone()))
            .call(&json!({"email": null}))
            .await
            .unwrap();

        assert_eq!(client.calls()[0].config, config);
    }

    #[tokio::test]
    async fn delete_key_matches_delete_factory() {
        let (api, client) = recording();

        let via_aggregate = api.delete::<Value>("/users/9", None);
        let via_factory: Bound<Value, _> = Bound::new(
            api.client().clone(),
            HttpMethod::Delete,
            "/users/9".to_string(),
            RequestConfig::default(),
        );
        via_aggregate.call().await.unwrap();
        via_factory.call().await.unwrap();

        let calls = client.calls();
        assert_eq!(calls[0], calls[1]);
    }

    #[tokio::test]
    async fn rejection_propagates_as_is() {
        let api = Simple::new(RecordingClient::failing("timed out"));

        let err = api
            .put::<Value, Value>("/users/1", None)
            .call(&json!({}))
            .await
            .unwrap_err();

        assert_eq!(err, FakeError("timed out".to_string()));
    }

    #[test]
    fn free_factories_bind_without_a_runtime() {
        let fetch_user: Bound = get("/users/42", None);
        let create_user: BoundWithPayload = post("/users", None);
        let remove_user: Bound = delete("/users/42", None);

        assert_eq!(fetch_user.method(), HttpMethod::Get);
        assert_eq!(fetch_user.url(), "/users/42");
        assert_eq!(create_user.method(), HttpMethod::Post);
        assert_eq!(remove_user.method(), HttpMethod::Delete);
        assert_eq!(put::<Value, Value>("/u", None).method(), HttpMethod::Put);
        assert_eq!(patch::<Value, Value>("/u", None).method(), HttpMethod::Patch);
    }
}
