use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
    time::Duration,
};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

/// Body served by `/bytes`: a PNG signature fragment followed by bytes that
/// are not valid UTF-8.
pub const BINARY_BODY: &[u8] = &[0x89, b'P', b'N', b'G', 0xff, 0xfe];

/// Value of the `x-raw` header on `/bytes`; not valid UTF-8.
pub const RAW_HEADER_VALUE: &[u8] = &[b'a', 0xff];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Deserialize)]
pub struct NewUser {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Deserialize)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// A request as the server saw it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub body: String,
}

/// What `/echo` sends back.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub query: BTreeMap<String, String>,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

#[derive(Default)]
pub struct Store {
    users: HashMap<u64, User>,
    next_id: u64,
    requests: Vec<RecordedRequest>,
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::default();
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user)
                .put(replace_user)
                .patch(update_user)
                .delete(delete_user),
        )
        .route("/echo", any(echo))
        .route("/status/{code}", any(status))
        .route("/slow/{millis}", get(slow))
        .route("/bytes", get(binary))
        .route("/requests", get(list_requests))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn record(db: &Db, method: &Method, uri: &Uri, body: &str) {
    db.write().await.requests.push(RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        body: body.to_string(),
    });
}

async fn list_users(State(db): State<Db>, method: Method, uri: Uri) -> Json<Vec<User>> {
    record(&db, &method, &uri, "").await;
    let store = db.read().await;
    let mut users: Vec<User> = store.users.values().cloned().collect();
    users.sort_by_key(|u| u.id);
    Json(users)
}

async fn create_user(
    State(db): State<Db>,
    method: Method,
    uri: Uri,
    body: String,
) -> Result<(StatusCode, Json<User>), StatusCode> {
    record(&db, &method, &uri, &body).await;
    let input: NewUser =
        serde_json::from_str(&body).map_err(|_| StatusCode::UNPROCESSABLE_ENTITY)?;

    let mut store = db.write().await;
    store.next_id += 1;
    let user = User {
        id: store.next_id,
        name: input.name,
        email: input.email,
    };
    store.users.insert(user.id, user.clone());
    Ok((StatusCode::CREATED, Json(user)))
}

async fn get_user(
    State(db): State<Db>,
    Path(id): Path<u64>,
    method: Method,
    uri: Uri,
) -> Result<Json<User>, StatusCode> {
    record(&db, &method, &uri, "").await;
    let store = db.read().await;
    store.users.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn replace_user(
    State(db): State<Db>,
    Path(id): Path<u64>,
    method: Method,
    uri: Uri,
    body: String,
) -> Result<Json<User>, StatusCode> {
    record(&db, &method, &uri, &body).await;
    let input: NewUser =
        serde_json::from_str(&body).map_err(|_| StatusCode::UNPROCESSABLE_ENTITY)?;

    let mut store = db.write().await;
    let user = store.users.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    user.name = input.name;
    user.email = input.email;
    Ok(Json(user.clone()))
}

async fn update_user(
    State(db): State<Db>,
    Path(id): Path<u64>,
    method: Method,
    uri: Uri,
    body: String,
) -> Result<Json<User>, StatusCode> {
    record(&db, &method, &uri, &body).await;
    let input: UserPatch =
        serde_json::from_str(&body).map_err(|_| StatusCode::UNPROCESSABLE_ENTITY)?;

    let mut store = db.write().await;
    let user = store.users.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(name) = input.name {
        user.name = name;
    }
    if let Some(email) = input.email {
        user.email = Some(email);
    }
    Ok(Json(user.clone()))
}

async fn delete_user(
    State(db): State<Db>,
    Path(id): Path<u64>,
    method: Method,
    uri: Uri,
) -> StatusCode {
    record(&db, &method, &uri, "").await;
    let mut store = db.write().await;
    match store.users.remove(&id) {
        Some(_) => StatusCode::NO_CONTENT,
        None => StatusCode::NOT_FOUND,
    }
}

async fn echo(
    State(db): State<Db>,
    Query(query): Query<BTreeMap<String, String>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Json<Echo> {
    record(&db, &method, &uri, &body).await;
    let headers = headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    Json(Echo {
        method: method.to_string(),
        query,
        headers,
        body,
    })
}

async fn status(
    State(db): State<Db>,
    Path(code): Path<u16>,
    method: Method,
    uri: Uri,
    body: String,
) -> Result<(StatusCode, String), StatusCode> {
    record(&db, &method, &uri, &body).await;
    let status = StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)?;
    Ok((status, format!("status {code}")))
}

async fn slow(
    State(db): State<Db>,
    Path(millis): Path<u64>,
    method: Method,
    uri: Uri,
) -> &'static str {
    record(&db, &method, &uri, "").await;
    tokio::time::sleep(Duration::from_millis(millis)).await;
    "done"
}

async fn binary(State(db): State<Db>, method: Method, uri: Uri) -> Response {
    record(&db, &method, &uri, "").await;
    let mut response = (
        [(header::CONTENT_TYPE, HeaderValue::from_static("image/png"))],
        BINARY_BODY,
    )
        .into_response();
    if let Ok(value) = HeaderValue::from_bytes(RAW_HEADER_VALUE) {
        response.headers_mut().insert("x-raw", value);
    }
    response
}

async fn list_requests(State(db): State<Db>) -> Json<Vec<RecordedRequest>> {
    Json(db.read().await.requests.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_serializes_to_json() {
        let user = User {
            id: 42,
            name: "Ada".to_string(),
            email: None,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["id"], 42);
        assert_eq!(json["name"], "Ada");
        assert!(json["email"].is_null());
    }

    #[test]
    fn new_user_email_is_optional() {
        let input: NewUser = serde_json::from_str(r#"{"name":"Grace"}"#).unwrap();
        assert_eq!(input.name, "Grace");
        assert!(input.email.is_none());
    }

    #[test]
    fn new_user_rejects_missing_name() {
        let result: Result<NewUser, _> = serde_json::from_str(r#"{"email":"a@b.c"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn patch_fields_are_optional() {
        let input: UserPatch = serde_json::from_str(r#"{}"#).unwrap();
        assert!(input.name.is_none());
        assert!(input.email.is_none());
    }
}
