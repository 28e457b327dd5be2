use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    routing::{get, post},
    serve, Json, Router,
};
use backend::{LocalBackend, RemoteBackend};
use harness::Harness;
use model::{RunReport, RunRequest};
use runtime::PythonRuntime;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, info_span};
use uuid::Uuid;

pub mod backend;
pub mod driver;
pub mod error;
pub mod harness;
pub mod language;
pub mod log;
pub mod model;
pub mod response;
pub mod runtime;
mod timeout;
pub mod value;

/// The parent directory of all local driver runs.
const PARENT_DIR: &str = "/tmp";

/// Defines the routing of virtuoso.
///
/// Split out from the server start so integration tests can drive the
/// router directly without binding a listener.
pub fn app() -> Router {
    let harness = Arc::new(Harness::new(
        LocalBackend::new(PARENT_DIR, PythonRuntime::system()),
        RemoteBackend::from_env(),
    ));

    Router::new()
        .route("/run", post(run))
        .route("/status", get(status))
        .layer(
            TraceLayer::new_for_http().make_span_with(|_: &Request<Body>| {
                let request_id = Uuid::new_v4();
                info_span!("", %request_id)
            }),
        )
        .with_state(harness)
}

/// This function starts the virtuoso server and will not return for as long as the server is running.
#[tokio::main]
pub async fn virtuoso() {
    let virtuoso = app();
    let listener = TcpListener::bind("0.0.0.0:8080")
        .await
        .expect("failed to bind 0.0.0.0:8080");
    serve(listener, virtuoso)
        .await
        .expect("failed to start virtuoso");
}

/// An endpoint that exists to quickly assert whether virtuoso is still healthy.
async fn status() -> StatusCode {
    info!("status check answered");
    StatusCode::OK
}

/// The endpoint used to run a submission against its problem's test cases.
async fn run(State(harness): State<Arc<Harness>>, Json(request): Json<RunRequest>) -> RunReport {
    debug!(
        language = %request.language,
        cases = request.test_cases.len(),
        "received run request"
    );

    harness.run_tests(&request).await
}
