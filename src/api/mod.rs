mod call;
mod health;

use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use tracing::info;

pub use call::call_handler;
pub use health::basic_health_check;

/// 函数入口路由：`POST /call` 处理事件，`GET /health` 供探活
pub fn routes(app_state: AppState) -> Router {
    info!(
        target: "server.http",
        event = "http.router.build",
        routes = "/call,/health"
    );

    Router::new()
        .route("/call", post(call_handler))
        .route("/health", get(basic_health_check))
        .with_state(app_state)
}
