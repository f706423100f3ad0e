//! # 하루 계획(My Day) 오케스트레이션
//!
//! 파서, 부하 계산기, DB 계층을 묶어 계획의 상태 변화를 처리합니다.
//!
//! ## 상태 변화
//! ```text
//! (없음) ──첫 조회──▶ Draft(기본 템플릿, 작업/지표 없음)
//! Draft ──텍스트 수정──▶ Draft(재파싱 + 전부 교체 + 부하 재계산)
//! ```
//! 작업/지표는 언제나 `raw_text`를 다시 파싱해서 얻을 수 있는 파생 데이터입니다.
//! 따라서 텍스트를 다시 제출하는 것 외에는 이들을 바꾸는 경로가 없습니다.

use chrono::NaiveDate;
use sqlx::SqlitePool;

use super::{calculate_load, parse_day_text, template::DEFAULT_PLAN_TEXT};
use crate::{db, error::AppError, models::*};

/// 계획 날짜의 문자열 형식 (DB 키이자 URL 경로 형식)
pub const PLAN_DATE_FORMAT: &str = "%Y-%m-%d";

/// 한 번에 제출할 수 있는 계획 텍스트의 최대 글자 수
pub const MAX_PLAN_TEXT_CHARS: usize = 20_000;

/// `YYYY-MM-DD` 문자열을 날짜로 변환합니다. 형식이 틀리면 400 에러.
pub fn parse_plan_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, PLAN_DATE_FORMAT)
        .map_err(|_| AppError::BadRequest(format!("Invalid date '{}', expected YYYY-MM-DD", raw)))
}

fn date_key(date: NaiveDate) -> String {
    date.format(PLAN_DATE_FORMAT).to_string()
}

fn validate_text(text: &str) -> Result<(), AppError> {
    if text.chars().count() > MAX_PLAN_TEXT_CHARS {
        return Err(AppError::BadRequest(format!(
            "Plan text must be at most {} characters",
            MAX_PLAN_TEXT_CHARS
        )));
    }
    Ok(())
}

/// 파싱된 작업 목록으로 부하를 계산합니다.
fn load_of(parsed: &ParsedPlan) -> LoadResult {
    let estimates: Vec<TaskEstimate> = parsed.tasks.iter().map(TaskEstimate::from).collect();
    calculate_load(&estimates)
}

/// 계획 행과 작업/지표를 한 스냅샷에서 읽습니다.
async fn plan_detail(
    pool: &SqlitePool,
    user_id: &str,
    key: &str,
) -> Result<DailyPlanDetail, AppError> {
    db::get_plan_detail(pool, user_id, key)
        .await?
        .ok_or(AppError::NotFound)
}

/// 계획을 조회하고, 없으면 기본 템플릿으로 만듭니다.
pub async fn get_or_create_plan(
    pool: &SqlitePool,
    user_id: &str,
    date: NaiveDate,
) -> Result<DailyPlanDetail, AppError> {
    let key = date_key(date);
    db::get_or_create_plan(pool, user_id, &key, DEFAULT_PLAN_TEXT).await?;
    plan_detail(pool, user_id, &key).await
}

/// 계획 텍스트를 교체하고 작업/지표/부하를 다시 계산합니다.
///
/// 계획 날짜를 기준 날짜로 파싱하고, 결과 전체를 한 트랜잭션으로 저장합니다.
/// 계획이 없으면 만들지 않고 `NotFound`를 반환합니다 (생성은 조회 경로의 몫).
pub async fn update_plan_text(
    pool: &SqlitePool,
    user_id: &str,
    date: NaiveDate,
    text: &str,
) -> Result<DailyPlanDetail, AppError> {
    validate_text(text)?;

    let parsed = parse_day_text(text, date);
    let load = load_of(&parsed);
    let key = date_key(date);

    db::replace_plan_contents(pool, user_id, &key, text, &parsed, &load)
        .await?
        .ok_or(AppError::NotFound)?;

    tracing::info!(
        user_id,
        plan_date = %key,
        tasks = parsed.tasks.len(),
        metrics = parsed.metrics.len(),
        status = load.status.as_str(),
        total_load = load.total_load_minutes,
        "Re-parsed daily plan"
    );

    plan_detail(pool, user_id, &key).await
}

/// 해당 날짜 계획에 저장된 작업들로 부하를 계산합니다.
/// 계획이 없으면 조회와 마찬가지로 기본 템플릿으로 만듭니다.
pub async fn get_load_status(
    pool: &SqlitePool,
    user_id: &str,
    date: NaiveDate,
) -> Result<LoadResult, AppError> {
    let plan = db::get_or_create_plan(pool, user_id, &date_key(date), DEFAULT_PLAN_TEXT).await?;
    let tasks = db::list_plan_tasks(pool, &plan.id).await?;
    let estimates = tasks
        .iter()
        .map(TaskEstimate::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(calculate_load(&estimates))
}

/// 날짜 범위(양 끝 포함) 안의 계획 목록을 최신순으로 반환합니다.
pub async fn list_plans(
    pool: &SqlitePool,
    user_id: &str,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<DailyPlan>, AppError> {
    if from > to {
        return Err(AppError::BadRequest(
            "'from' must not be after 'to'".to_string(),
        ));
    }
    db::list_plans(pool, user_id, &date_key(from), &date_key(to)).await
}

/// 저장하지 않고 파싱과 부하 계산 결과만 돌려줍니다 (편집 중 미리보기용).
pub fn preview_plan(text: &str, date: NaiveDate) -> Result<PlanPreview, AppError> {
    validate_text(text)?;
    let parsed = parse_day_text(text, date);
    let load = load_of(&parsed);
    Ok(PlanPreview {
        tasks: parsed.tasks,
        metrics: parsed.metrics,
        load,
    })
}
