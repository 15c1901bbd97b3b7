//! Handler modules and HTTP routing
//!
//! Handler functions are organized by domain:
//! - auth: signup, login
//! - tasks: list, create, get, update, complete/incomplete, delete
//!
//! Task and user routes are mounted under the configured base path; the
//! banner, health and metrics routes stay at the root.

pub mod auth;
pub mod tasks;

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post, put};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;

use crate::server::TuskServer;

/// Build the full application router.
pub fn router(server: TuskServer, metrics_handle: PrometheusHandle) -> Router {
    let api = Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route(
            "/tasks",
            get(tasks::list_tasks).delete(tasks::delete_all_tasks),
        )
        .route("/tasks/new", post(tasks::create_task))
        .route(
            "/tasks/{task_id}",
            get(tasks::get_task)
                .put(tasks::update_task)
                .delete(tasks::delete_task),
        )
        .route("/tasks/{task_id}/complete", put(tasks::complete_task))
        .route("/tasks/{task_id}/incomplete", put(tasks::incomplete_task));

    Router::new()
        .route("/", get(root))
        .route("/healthz", get(healthz))
        .route(
            "/metrics",
            get(move || async move { metrics_handle.render() }),
        )
        .nest(&server.config.base_path, api)
        .layer(middleware::from_fn(track_metrics))
        .with_state(server)
}

async fn root() -> &'static str {
    "Task Manager API is running..."
}

async fn healthz() -> &'static str {
    "ok"
}

/// Count and time every request, labelled by method and response status.
async fn track_metrics(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let start = Instant::now();

    let response = next.run(req).await;

    crate::metrics::record_http_request(
        method.as_str(),
        response.status().as_u16(),
        start.elapsed(),
    );
    response
}
