//! Shared fixtures: a fake backend bound to a random port and helpers to
//! drive the BFF router in-process.

#![allow(dead_code, clippy::panic)]

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::header::{ACCEPT, ACCEPT_LANGUAGE, AUTHORIZATION, CONTENT_TYPE, SET_COOKIE};
use axum::http::{HeaderMap, Method, Request, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use tokio::sync::Mutex;
use tower::ServiceExt;

use admin_console_bff::app_state::AppState;
use admin_console_bff::build_app;
use admin_console_bff::config::ConsoleConfig;

/// One request as the fake backend saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    /// Path and query.
    pub target: String,
    pub authorization: Option<String>,
    pub accept: Option<String>,
    pub accept_language: Option<String>,
    pub content_type: Option<String>,
    /// Raw body, empty when none was sent.
    pub body: Bytes,
}

impl Recorded {
    /// Body decoded as JSON.
    pub fn json(&self) -> Value {
        let Ok(value) = serde_json::from_slice(&self.body) else {
            panic!("backend received a non-JSON body: {:?}", self.body);
        };
        value
    }
}

type Responder = Arc<dyn Fn(&Recorded) -> Response + Send + Sync>;

#[derive(Clone)]
struct BackendState {
    requests: Arc<Mutex<Vec<Recorded>>>,
    responder: Responder,
}

/// A fake backend answering every request through one closure.
pub struct FakeBackend {
    pub base_url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl FakeBackend {
    /// Every request received so far.
    pub async fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().await.clone()
    }

    /// The only request received so far.
    pub async fn single_request(&self) -> Recorded {
        let requests = self.requests().await;
        let [request] = requests.as_slice() else {
            panic!("expected exactly one backend request, got {requests:?}");
        };
        request.clone()
    }
}

fn header(headers: &HeaderMap, name: axum::http::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn record(
    State(state): State<BackendState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let recorded = Recorded {
        method,
        target: uri
            .path_and_query()
            .map_or_else(|| uri.path().to_string(), ToString::to_string),
        authorization: header(&headers, AUTHORIZATION),
        accept: header(&headers, ACCEPT),
        accept_language: header(&headers, ACCEPT_LANGUAGE),
        content_type: header(&headers, CONTENT_TYPE),
        body,
    };
    let response = (state.responder)(&recorded);
    state.requests.lock().await.push(recorded);
    response
}

/// Starts a fake backend on `127.0.0.1:0`.
pub async fn spawn_backend<F>(responder: F) -> FakeBackend
where
    F: Fn(&Recorded) -> Response + Send + Sync + 'static,
{
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = BackendState {
        requests: Arc::clone(&requests),
        responder: Arc::new(responder),
    };
    let app = Router::new().fallback(record).with_state(state);

    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("failed to bind fake backend");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("fake backend has no address");
    };
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    FakeBackend {
        base_url: format!("http://{addr}"),
        requests,
    }
}

/// JSON answer with `status`.
pub fn json_reply(status: StatusCode, value: Value) -> Response {
    (status, axum::Json(value)).into_response()
}

/// Configuration pointing at `base_url`, serving the test console bundle.
pub fn test_config(base_url: &str) -> ConsoleConfig {
    let mut config = ConsoleConfig::new(base_url);
    config.supported_locales = vec!["en".to_string(), "fr".to_string()];
    config.console_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/console").into();
    config
}

/// The full BFF router for `config`.
pub fn app_with(config: ConsoleConfig) -> Router {
    let Ok(state) = AppState::from_config(config) else {
        panic!("failed to build app state");
    };
    build_app(state)
}

/// The full BFF router talking to `base_url`.
pub fn app(base_url: &str) -> Router {
    app_with(test_config(base_url))
}

/// Collected response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    /// Body decoded as JSON.
    pub fn json(&self) -> Value {
        let Ok(value) = serde_json::from_slice(&self.body) else {
            panic!("response is not JSON: {:?}", self.body);
        };
        value
    }

    /// All `Set-Cookie` header values.
    pub fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_string)
            .collect()
    }

    /// The `Set-Cookie` value for `name`, if any.
    pub fn cookie(&self, name: &str) -> Option<String> {
        let prefix = format!("{name}=");
        self.set_cookies().into_iter().find(|c| c.starts_with(&prefix))
    }

    /// The `Location` header.
    pub fn location(&self) -> Option<String> {
        header(&self.headers, axum::http::header::LOCATION)
    }
}

/// Sends `request` through `app` in-process.
pub async fn send(app: Router, request: Request<Body>) -> TestResponse {
    let Ok(response) = app.oneshot(request).await else {
        panic!("router failed");
    };
    let status = response.status();
    let headers = response.headers().clone();
    let Ok(body) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
        panic!("failed to read response body");
    };
    TestResponse {
        status,
        headers,
        body,
    }
}

/// Request builder shortcut. `cookie` is sent as the `Cookie` header and
/// `json` as a JSON body.
pub fn request(method: Method, uri: &str, cookie: Option<&str>, json: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(axum::http::header::COOKIE, cookie);
    }
    let body = match json {
        Some(value) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let Ok(request) = builder.body(body) else {
        panic!("invalid test request");
    };
    request
}
