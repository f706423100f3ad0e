//! # 하루 계획(My Day) 라우트 핸들러
//!
//! 사용자의 하루 계획 텍스트를 조회/수정하고 부하 상태를 확인하는 HTTP 핸들러입니다.
//! 모든 엔드포인트는 Bearer 토큰이 필요하며, 토큰의 사용자 기준으로 동작합니다.
//!
//! ## 엔드포인트
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | GET  | /api/v1/my-day | `list_my_days` | 기간별 계획 목록 (`?from=&to=`) |
//! | GET  | /api/v1/my-day/{date} | `get_my_day` | 계획 조회 (없으면 템플릿으로 생성) |
//! | PUT  | /api/v1/my-day/{date} | `update_my_day` | 텍스트 수정 → 재파싱 + 부하 재계산 |
//! | GET  | /api/v1/my-day/{date}/load-status | `get_my_day_load` | 부하 계산 결과 |
//! | POST | /api/v1/my-day/{date}/preview | `preview_my_day` | 저장 없이 파싱 결과 미리보기 |
//!
//! `{date}`는 `YYYY-MM-DD` 형식이며, 형식이 틀리면 400을 반환합니다.
//!
//! ## 사용 흐름
//! ```text
//! 1. 화면 진입 → GET /my-day/2024-01-15 (처음이면 기본 템플릿이 담긴 계획 생성)
//! 2. 편집 중   → POST /my-day/2024-01-15/preview (선택)
//! 3. 저장      → PUT /my-day/2024-01-15 { "text": "..." }
//! ```

use crate::{
    error::AppError,
    middleware::auth::AuthUser,
    models::*,
    services::my_day,
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{Duration, Local};
use serde_json::{json, Value};
use sqlx::SqlitePool;

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// SqlitePool은 내부적으로 Arc를 사용하므로 clone해도 같은 풀을 가리킵니다.
#[derive(Clone)]
pub struct AppState {
    /// SQLite 연결 풀
    pub pool: SqlitePool,
    /// JWT 서명 검증용 비밀키
    pub jwt_secret: String,
}

/// 목록 조회 기본 기간 (오늘 포함 최근 30일)
const DEFAULT_HISTORY_DAYS: i64 = 30;

/// `GET /my-day?from=YYYY-MM-DD&to=YYYY-MM-DD` — 기간 안의 계획 목록을 최신순으로 조회합니다.
///
/// 작업/지표는 포함하지 않고 계획 행(부하 캐시 포함)만 반환합니다.
/// 응답: `{ "plans": [...] }`
pub async fn list_my_days(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(query): Query<PlanRangeQuery>,
) -> Result<Json<Value>, AppError> {
    let to = match query.to.as_deref() {
        Some(raw) => my_day::parse_plan_date(raw)?,
        None => Local::now().date_naive(),
    };
    let from = match query.from.as_deref() {
        Some(raw) => my_day::parse_plan_date(raw)?,
        None => to - Duration::days(DEFAULT_HISTORY_DAYS - 1),
    };

    let plans = my_day::list_plans(&state.pool, &auth_user.user_id, from, to).await?;
    Ok(Json(json!({ "plans": plans })))
}

/// `GET /my-day/{date}` — 계획을 작업/지표와 함께 조회합니다.
///
/// 해당 날짜의 계획이 없으면 기본 템플릿으로 새로 만들어 반환합니다.
pub async fn get_my_day(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(date): Path<String>,
) -> Result<Json<DailyPlanDetail>, AppError> {
    let date = my_day::parse_plan_date(&date)?;
    let detail = my_day::get_or_create_plan(&state.pool, &auth_user.user_id, date).await?;
    Ok(Json(detail))
}

/// `PUT /my-day/{date}` + `{ "text": "..." }` — 계획 텍스트를 교체합니다.
///
/// 텍스트 전체를 다시 파싱하여 작업/지표를 통째로 교체하고 부하를 다시 계산합니다.
/// 아직 조회된 적 없는 날짜라면 404를 반환합니다.
pub async fn update_my_day(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(date): Path<String>,
    Json(req): Json<UpdatePlanRequest>,
) -> Result<Json<DailyPlanDetail>, AppError> {
    let date = my_day::parse_plan_date(&date)?;
    let detail =
        my_day::update_plan_text(&state.pool, &auth_user.user_id, date, &req.text).await?;
    Ok(Json(detail))
}

/// `GET /my-day/{date}/load-status` — 저장된 작업 기준의 부하 계산 결과만 반환합니다.
pub async fn get_my_day_load(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(date): Path<String>,
) -> Result<Json<LoadResult>, AppError> {
    let date = my_day::parse_plan_date(&date)?;
    let load = my_day::get_load_status(&state.pool, &auth_user.user_id, date).await?;
    Ok(Json(load))
}

/// `POST /my-day/{date}/preview` + `{ "text": "..." }` — 저장하지 않고 파싱/부하 결과를 반환합니다.
///
/// DB를 사용하지 않지만, 인증은 다른 엔드포인트와 동일하게 요구합니다.
pub async fn preview_my_day(
    _auth_user: AuthUser,
    Path(date): Path<String>,
    Json(req): Json<UpdatePlanRequest>,
) -> Result<Json<PlanPreview>, AppError> {
    let date = my_day::parse_plan_date(&date)?;
    Ok(Json(my_day::preview_plan(&req.text, date)?))
}
