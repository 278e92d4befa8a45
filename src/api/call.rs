//! 函数调用入口

use crate::model::FunctionMessage;
use crate::AppState;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::{error, warn};

/// 请求体原样交给处理器；空请求体也会进入处理器并得到 "No data provided"
pub async fn call_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> (StatusCode, Json<FunctionMessage>) {
    match state.handler.handle(&body).await {
        Ok(outcome) => (StatusCode::OK, Json(FunctionMessage::new(outcome.message()))),
        Err(err) => {
            if err.is_classified() {
                warn!(
                    target: "server.http",
                    event = "http.call.failed",
                    kind = err.kind(),
                    status = err.status_code().as_u16()
                );
            } else {
                error!(
                    target: "server.http",
                    event = "http.call.internal_error",
                    error = %err
                );
            }
            (
                err.status_code(),
                Json(FunctionMessage::new(err.response_message())),
            )
        }
    }
}
