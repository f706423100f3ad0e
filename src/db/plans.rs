//! # 하루 계획 데이터베이스 쿼리 모듈
//!
//! `daily_plans`, `daily_plan_tasks`, `daily_plan_metrics` 테이블에 대한 쿼리 함수들입니다.
//!
//! ## 테이블 관계
//! ```text
//! daily_plans (user_id, plan_date UNIQUE)
//!   ├── daily_plan_tasks   (plan_id, position 순서)
//!   └── daily_plan_metrics (plan_id, position 순서)
//! ```
//! 작업과 지표는 `raw_text`를 파싱한 결과의 캐시입니다.
//! 개별 수정 쿼리는 없고, `replace_plan_contents()`로만 통째로 교체됩니다.

use crate::error::AppError;
use crate::models::*;
use sqlx::{SqliteExecutor, SqlitePool};

/// 작업 시작/종료 시각의 저장 형식 (계획 날짜 기준의 로컬 시각)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// (사용자, 날짜)로 계획 하나를 조회합니다.
///
/// # 반환값
/// - `Ok(Some(DailyPlan))`: 계획이 있는 경우
/// - `Ok(None)`: 아직 만들어지지 않은 경우
///
/// `executor`는 풀(`&SqlitePool`)이나 트랜잭션 연결(`&mut *tx`) 모두 가능합니다.
pub async fn get_plan<'e>(
    executor: impl SqliteExecutor<'e>,
    user_id: &str,
    plan_date: &str,
) -> Result<Option<DailyPlan>, AppError> {
    let plan = sqlx::query_as::<_, DailyPlan>(
        r#"
        SELECT id, user_id, plan_date, raw_text, load_status, effective_capacity,
               total_load, created_at, updated_at
        FROM daily_plans
        WHERE user_id = ? AND plan_date = ?
        "#,
    )
    .bind(user_id)
    .bind(plan_date)
    .fetch_optional(executor)
    .await?;

    Ok(plan)
}

/// 계획 행과 작업/지표를 하나의 읽기 트랜잭션에서 조회합니다.
///
/// 세 SELECT가 같은 WAL 스냅샷을 보므로, 동시에 `replace_plan_contents()`가
/// 커밋되더라도 새 `raw_text`와 이전 작업 목록이 섞여 나오지 않습니다.
pub async fn get_plan_detail(
    pool: &SqlitePool,
    user_id: &str,
    plan_date: &str,
) -> Result<Option<DailyPlanDetail>, AppError> {
    let mut tx = pool.begin().await?;

    let Some(plan) = get_plan(&mut *tx, user_id, plan_date).await? else {
        return Ok(None);
    };
    let tasks = list_plan_tasks(&mut *tx, &plan.id).await?;
    let metrics = list_plan_metrics(&mut *tx, &plan.id).await?;

    tx.commit().await?;

    Ok(Some(DailyPlanDetail {
        plan,
        tasks,
        metrics,
    }))
}

/// 계획을 조회하고, 없으면 `default_text`로 새로 만듭니다.
///
/// 동시에 두 요청이 처음 조회하더라도 행은 하나만 생깁니다.
/// (user_id, plan_date) UNIQUE 제약과 `ON CONFLICT DO NOTHING` 덕분에
/// 늦게 들어온 INSERT는 아무것도 하지 않고, 두 요청 모두 같은 행을 다시 읽습니다.
pub async fn get_or_create_plan(
    pool: &SqlitePool,
    user_id: &str,
    plan_date: &str,
    default_text: &str,
) -> Result<DailyPlan, AppError> {
    if let Some(plan) = get_plan(pool, user_id, plan_date).await? {
        return Ok(plan);
    }

    let id = uuid::Uuid::now_v7().to_string();
    let result = sqlx::query(
        r#"
        INSERT INTO daily_plans (id, user_id, plan_date, raw_text)
        VALUES (?, ?, ?, ?)
        ON CONFLICT (user_id, plan_date) DO NOTHING
        "#,
    )
    .bind(&id)
    .bind(user_id)
    .bind(plan_date)
    .bind(default_text)
    .execute(pool)
    .await?;

    if result.rows_affected() > 0 {
        tracing::info!(user_id, plan_date, plan_id = %id, "Created daily plan from template");
    }

    get_plan(pool, user_id, plan_date)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created plan".to_string()))
}

/// 계획의 작업 목록을 텍스트 등장 순서대로 조회합니다.
pub async fn list_plan_tasks<'e>(
    executor: impl SqliteExecutor<'e>,
    plan_id: &str,
) -> Result<Vec<PlanTask>, AppError> {
    let tasks = sqlx::query_as::<_, PlanTask>(
        r#"
        SELECT id, plan_id, position, task_type, title, estimate_minutes,
               planned_start, planned_end, raw_line
        FROM daily_plan_tasks
        WHERE plan_id = ?
        ORDER BY position
        "#,
    )
    .bind(plan_id)
    .fetch_all(executor)
    .await?;

    Ok(tasks)
}

/// 계획의 지표 목록을 텍스트 등장 순서대로 조회합니다.
pub async fn list_plan_metrics<'e>(
    executor: impl SqliteExecutor<'e>,
    plan_id: &str,
) -> Result<Vec<PlanMetric>, AppError> {
    let metrics = sqlx::query_as::<_, PlanMetric>(
        r#"
        SELECT id, plan_id, position, scope, name, value, comment
        FROM daily_plan_metrics
        WHERE plan_id = ?
        ORDER BY position
        "#,
    )
    .bind(plan_id)
    .fetch_all(executor)
    .await?;

    Ok(metrics)
}

/// 계획의 텍스트, 작업, 지표, 부하 캐시를 하나의 트랜잭션으로 교체합니다.
///
/// ## 처리 흐름 (모두 같은 트랜잭션 안에서)
/// 1. `raw_text`와 부하 필드를 UPDATE (계획이 없으면 아무 변경 없이 `None`)
/// 2. 기존 작업/지표를 모두 DELETE
/// 3. 새로 파싱된 작업/지표를 position 순서대로 INSERT
/// 4. COMMIT
///
/// 첫 문장이 쓰기(UPDATE)이므로 트랜잭션 시작과 동시에 쓰기 잠금을 얻습니다.
/// 중간에 에러가 나면 `tx`가 drop되면서 자동으로 ROLLBACK되어
/// 이전 작업 목록이 그대로 남습니다. 반쯤 교체된 상태는 생기지 않습니다.
///
/// # 반환값
/// - `Ok(Some(plan_id))`: 교체 성공
/// - `Ok(None)`: 해당 (사용자, 날짜)의 계획이 없음
pub async fn replace_plan_contents(
    pool: &SqlitePool,
    user_id: &str,
    plan_date: &str,
    raw_text: &str,
    parsed: &ParsedPlan,
    load: &LoadResult,
) -> Result<Option<String>, AppError> {
    let mut tx = pool.begin().await?;

    let plan_id: Option<String> = sqlx::query_scalar(
        r#"
        UPDATE daily_plans
        SET raw_text = ?, load_status = ?, effective_capacity = ?, total_load = ?,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE user_id = ? AND plan_date = ?
        RETURNING id
        "#,
    )
    .bind(raw_text)
    .bind(load.status.as_str())
    .bind(load.effective_capacity_minutes)
    .bind(load.total_load_minutes)
    .bind(user_id)
    .bind(plan_date)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(plan_id) = plan_id else {
        return Ok(None);
    };

    sqlx::query("DELETE FROM daily_plan_tasks WHERE plan_id = ?")
        .bind(&plan_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM daily_plan_metrics WHERE plan_id = ?")
        .bind(&plan_id)
        .execute(&mut *tx)
        .await?;

    for (position, task) in parsed.tasks.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO daily_plan_tasks
                (id, plan_id, position, task_type, title, estimate_minutes,
                 planned_start, planned_end, raw_line)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(uuid::Uuid::now_v7().to_string())
        .bind(&plan_id)
        .bind(position as i64)
        .bind(task.task_type.as_str())
        .bind(&task.title)
        .bind(task.estimate_minutes)
        .bind(task.planned_start.map(|t| t.format(TIMESTAMP_FORMAT).to_string()))
        .bind(task.planned_end.map(|t| t.format(TIMESTAMP_FORMAT).to_string()))
        .bind(&task.raw_line)
        .execute(&mut *tx)
        .await?;
    }

    for (position, metric) in parsed.metrics.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO daily_plan_metrics (id, plan_id, position, scope, name, value, comment)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(uuid::Uuid::now_v7().to_string())
        .bind(&plan_id)
        .bind(position as i64)
        .bind(metric.scope.as_str())
        .bind(&metric.name)
        .bind(metric.value)
        .bind(&metric.comment)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok(Some(plan_id))
}

/// 사용자의 계획 목록을 날짜 범위(양 끝 포함)로 최신순 조회합니다.
/// 날짜는 `YYYY-MM-DD` 문자열이므로 문자열 비교가 곧 날짜 비교입니다.
pub async fn list_plans(
    pool: &SqlitePool,
    user_id: &str,
    from: &str,
    to: &str,
) -> Result<Vec<DailyPlan>, AppError> {
    let plans = sqlx::query_as::<_, DailyPlan>(
        r#"
        SELECT id, user_id, plan_date, raw_text, load_status, effective_capacity,
               total_load, created_at, updated_at
        FROM daily_plans
        WHERE user_id = ? AND plan_date BETWEEN ? AND ?
        ORDER BY plan_date DESC
        "#,
    )
    .bind(user_id)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;

    Ok(plans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::test_pool;
    use crate::services::{calculate_load, parse_day_text};
    use chrono::NaiveDate;

    fn parse(text: &str) -> (ParsedPlan, LoadResult) {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let parsed = parse_day_text(text, date);
        let estimates: Vec<TaskEstimate> = parsed.tasks.iter().map(TaskEstimate::from).collect();
        let load = calculate_load(&estimates);
        (parsed, load)
    }

    #[tokio::test]
    async fn get_or_create_returns_same_row() {
        let (_dir, pool) = test_pool().await;

        let first = get_or_create_plan(&pool, "u1", "2024-01-15", "template").await.unwrap();
        let second = get_or_create_plan(&pool, "u1", "2024-01-15", "other").await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.raw_text, "template");
        assert_eq!(second.load_status, None);

        let other_user = get_or_create_plan(&pool, "u2", "2024-01-15", "template").await.unwrap();
        assert_ne!(first.id, other_user.id);
    }

    #[tokio::test]
    async fn replace_on_missing_plan_changes_nothing() {
        let (_dir, pool) = test_pool().await;
        let (parsed, load) = parse("Одна Велика справа\nA (1 год)");

        let result = replace_plan_contents(&pool, "u1", "2024-01-15", "x", &parsed, &load)
            .await
            .unwrap();

        assert!(result.is_none());
        assert!(get_plan(&pool, "u1", "2024-01-15").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn replace_swaps_children_and_load_fields() {
        let (_dir, pool) = test_pool().await;
        let plan = get_or_create_plan(&pool, "u1", "2024-01-15", "template").await.unwrap();

        let first_text = "Одна Велика справа\nA (10:00-11:30)\nДрібні справи\nB (10 хв)\nМетрики за вчора\nX: 1";
        let (parsed, load) = parse(first_text);
        replace_plan_contents(&pool, "u1", "2024-01-15", first_text, &parsed, &load)
            .await
            .unwrap();

        let tasks = list_plan_tasks(&pool, &plan.id).await.unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].task_type, "BIG");
        assert_eq!(tasks[0].planned_start.as_deref(), Some("2024-01-15T10:00:00"));
        assert_eq!(tasks[0].planned_end.as_deref(), Some("2024-01-15T11:30:00"));
        assert_eq!(tasks[1].title, "B");
        assert_eq!(list_plan_metrics(&pool, &plan.id).await.unwrap().len(), 1);

        let second_text = "3–5 середніх справ\nC (2 год)";
        let (parsed, load) = parse(second_text);
        let id = replace_plan_contents(&pool, "u1", "2024-01-15", second_text, &parsed, &load)
            .await
            .unwrap();
        assert_eq!(id.as_deref(), Some(plan.id.as_str()));

        let tasks = list_plan_tasks(&pool, &plan.id).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "C");
        assert_eq!(tasks[0].position, 0);
        assert!(list_plan_metrics(&pool, &plan.id).await.unwrap().is_empty());

        let stored = get_plan(&pool, "u1", "2024-01-15").await.unwrap().unwrap();
        assert_eq!(stored.raw_text, second_text);
        assert_eq!(stored.load_status.as_deref(), Some("UNDERLOADED"));
        assert_eq!(stored.effective_capacity, Some(336));
        assert_eq!(stored.total_load, Some(120));
    }

    #[tokio::test]
    async fn plan_detail_reads_row_and_children_together() {
        let (_dir, pool) = test_pool().await;
        assert!(get_plan_detail(&pool, "u1", "2024-01-15").await.unwrap().is_none());

        get_or_create_plan(&pool, "u1", "2024-01-15", "template").await.unwrap();
        let text = "Одна Велика справа\nA (1 год)\nМетрики за вчора\nX: 2";
        let (parsed, load) = parse(text);
        replace_plan_contents(&pool, "u1", "2024-01-15", text, &parsed, &load)
            .await
            .unwrap();

        let detail = get_plan_detail(&pool, "u1", "2024-01-15").await.unwrap().unwrap();
        assert_eq!(detail.plan.raw_text, text);
        assert_eq!(detail.tasks.len(), 1);
        assert_eq!(detail.tasks[0].title, "A");
        assert_eq!(detail.metrics.len(), 1);
        assert_eq!(detail.metrics[0].value, 2.0);
    }

    #[tokio::test]
    async fn list_plans_filters_by_user_and_range() {
        let (_dir, pool) = test_pool().await;
        for date in ["2024-01-10", "2024-01-12", "2024-01-20"] {
            get_or_create_plan(&pool, "u1", date, "t").await.unwrap();
        }
        get_or_create_plan(&pool, "u2", "2024-01-12", "t").await.unwrap();

        let plans = list_plans(&pool, "u1", "2024-01-10", "2024-01-15").await.unwrap();
        let dates: Vec<_> = plans.iter().map(|p| p.plan_date.as_str()).collect();
        assert_eq!(dates, ["2024-01-12", "2024-01-10"]);
    }
}
