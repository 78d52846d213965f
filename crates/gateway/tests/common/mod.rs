use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::Router;

/// One request seen by the fake API.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub path: String,
    pub authorization: Option<String>,
    pub body: String,
}

#[derive(Clone)]
struct FakeState {
    hits: Arc<Mutex<Vec<Recorded>>>,
    status: StatusCode,
    body: String,
}

/// Handle to a running fake API.
pub struct FakeApi {
    pub base_url: String,
    hits: Arc<Mutex<Vec<Recorded>>>,
}

impl FakeApi {
    pub fn hits(&self) -> Vec<Recorded> {
        self.hits.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.hits().into_iter().map(|h| h.path).collect()
    }
}

/// Start a fake API on `127.0.0.1:0` answering every request with
/// `status` and `body`, recording what it receives.
pub async fn spawn_fake_api(status: StatusCode, body: &str) -> FakeApi {
    let hits = Arc::new(Mutex::new(Vec::new()));
    let state = FakeState {
        hits: Arc::clone(&hits),
        status,
        body: body.to_string(),
    };

    let app = Router::new().fallback(record).with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind should succeed");
    let addr = listener.local_addr().expect("listener has an address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake API should run");
    });

    FakeApi {
        base_url: format!("http://{addr}"),
        hits,
    }
}

/// An address nothing is listening on.
pub async fn closed_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind should succeed");
    let addr = listener.local_addr().expect("listener has an address");
    drop(listener);
    format!("http://{addr}")
}

async fn record(
    State(state): State<FakeState>,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, [(axum::http::HeaderName, &'static str); 1], String) {
    state.hits.lock().unwrap().push(Recorded {
        path: uri.path().to_string(),
        authorization: headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });

    (state.status, [(CONTENT_TYPE, "application/json")], state.body.clone())
}
