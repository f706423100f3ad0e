use serde::{Deserialize, Serialize};

use super::my_day::{LoadResult, ParsedMetric, ParsedTask, TaskEstimate, TaskType, UnknownVariant};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DailyPlan {
    pub id: String,
    pub user_id: String,
    pub plan_date: String,
    pub raw_text: String,
    pub load_status: Option<String>,
    pub effective_capacity: Option<i64>,
    pub total_load: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PlanTask {
    pub id: String,
    #[serde(skip_serializing)]
    pub plan_id: String,
    pub position: i64,
    #[serde(rename = "type")]
    pub task_type: String,
    pub title: String,
    pub estimate_minutes: i64,
    pub planned_start: Option<String>,
    pub planned_end: Option<String>,
    pub raw_line: String,
}

impl TryFrom<&PlanTask> for TaskEstimate {
    type Error = UnknownVariant;

    fn try_from(task: &PlanTask) -> Result<Self, Self::Error> {
        Ok(Self {
            task_type: task.task_type.parse::<TaskType>()?,
            estimate_minutes: task.estimate_minutes,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PlanMetric {
    pub id: String,
    #[serde(skip_serializing)]
    pub plan_id: String,
    pub position: i64,
    pub scope: String,
    pub name: String,
    pub value: f64,
    pub comment: Option<String>,
}

/// `GET/PUT /my-day/{date}` 응답: 계획 행 + 파생된 작업/지표
#[derive(Debug, Clone, Serialize)]
pub struct DailyPlanDetail {
    #[serde(flatten)]
    pub plan: DailyPlan,
    pub tasks: Vec<PlanTask>,
    pub metrics: Vec<PlanMetric>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePlanRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct PlanRangeQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// `POST /my-day/{date}/preview` 응답: 저장하지 않은 파싱 + 부하 결과
#[derive(Debug, Clone, Serialize)]
pub struct PlanPreview {
    pub tasks: Vec<ParsedTask>,
    pub metrics: Vec<ParsedMetric>,
    pub load: LoadResult,
}
