use crate::build_info;
use crate::model::HealthStatus;
use crate::AppState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;

/// 基本健康检查
pub async fn basic_health_check(State(state): State<AppState>) -> impl IntoResponse {
    let status = HealthStatus {
        status: "healthy".to_string(),
        version: build_info::summary(),
        uptime: state.started_at.elapsed().as_secs(),
        timestamp: Utc::now().to_rfc3339(),
    };

    let mut resp = Json(status).into_response();
    resp.headers_mut().insert(
        axum::http::header::CACHE_CONTROL,
        axum::http::HeaderValue::from_static("no-store"),
    );
    resp
}
