//! # 헬스체크(Health Check) 핸들러
//!
//! ## 엔드포인트
//! - `GET /api/v1/health` → `{ "status": "ok", "database": "ok" }`
//!
//! 인증 없이 호출할 수 있으며, 컨테이너 헬스체크나 로드밸런서가 사용합니다.

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use super::my_day::AppState;

/// `GET /health` — 서버와 DB 연결 상태를 확인합니다.
///
/// DB에 `SELECT 1`을 보내 풀에서 연결을 얻을 수 있는지 확인하고,
/// 실패하면 503과 함께 `"database": "unavailable"`을 반환합니다.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "database": "ok" })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed to reach database: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "database": "unavailable" })),
            )
        }
    }
}
