//! # 하루 계획(My Day) 도메인 타입
//!
//! 파서와 부하 계산기가 주고받는 순수한 값 타입들입니다.
//! DB 행 구조체(`plan.rs`)와 달리 enum과 chrono 타입을 그대로 사용합니다.
//!
//! 직렬화 시 enum 값은 `BIG`, `TODAY_PLAN`, `OVERLOADED`처럼
//! 대문자 스네이크 케이스 문자열이 되며, DB에도 같은 문자열로 저장됩니다.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// 작업 크기 분류. 계획 텍스트의 섹션 제목으로 결정됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskType {
    Big,
    Medium,
    Small,
}

impl TaskType {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskType::Big => "BIG",
            TaskType::Medium => "MEDIUM",
            TaskType::Small => "SMALL",
        }
    }
}

/// 지표의 범위: 어제 실제 결과인지, 오늘 기대하는 결과인지
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetricScope {
    Yesterday,
    TodayPlan,
}

impl MetricScope {
    pub fn as_str(self) -> &'static str {
        match self {
            MetricScope::Yesterday => "YESTERDAY",
            MetricScope::TodayPlan => "TODAY_PLAN",
        }
    }
}

/// 하루 부하 분류 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoadStatus {
    Balanced,
    Overloaded,
    Underloaded,
}

impl LoadStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            LoadStatus::Balanced => "BALANCED",
            LoadStatus::Overloaded => "OVERLOADED",
            LoadStatus::Underloaded => "UNDERLOADED",
        }
    }
}

/// DB에 저장된 문자열이 알려진 enum 값이 아닐 때의 에러
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown variant: {0}")]
pub struct UnknownVariant(pub String);

impl FromStr for TaskType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BIG" => Ok(TaskType::Big),
            "MEDIUM" => Ok(TaskType::Medium),
            "SMALL" => Ok(TaskType::Small),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

impl FromStr for MetricScope {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "YESTERDAY" => Ok(MetricScope::Yesterday),
            "TODAY_PLAN" => Ok(MetricScope::TodayPlan),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// 텍스트 한 줄에서 추출된 작업
///
/// `planned_start`/`planned_end`는 `HH:MM-HH:MM` 범위가 있을 때만 채워지며,
/// 그 경우 `estimate_minutes`는 항상 두 시각의 차이(분)와 같습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedTask {
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub title: String,
    pub estimate_minutes: i64,
    pub planned_start: Option<NaiveDateTime>,
    pub planned_end: Option<NaiveDateTime>,
    /// 원본 줄 (감사/디버깅용)
    pub raw_line: String,
}

/// `이름: 값 코멘트` 형식의 줄에서 추출된 지표
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedMetric {
    pub scope: MetricScope,
    pub name: String,
    pub value: f64,
    pub comment: Option<String>,
}

/// 전체 텍스트 파싱 결과 (등장 순서 유지)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedPlan {
    pub tasks: Vec<ParsedTask>,
    pub metrics: Vec<ParsedMetric>,
}

/// 부하 계산에 필요한 작업의 최소 정보
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskEstimate {
    pub task_type: TaskType,
    pub estimate_minutes: i64,
}

impl From<&ParsedTask> for TaskEstimate {
    fn from(task: &ParsedTask) -> Self {
        Self {
            task_type: task.task_type,
            estimate_minutes: task.estimate_minutes,
        }
    }
}

/// 부하 계산기의 출력
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadResult {
    pub effective_capacity_minutes: i64,
    pub focus_minutes: i64,
    pub context_switch_minutes: i64,
    pub meetings_minutes: i64,
    pub lunch_minutes: i64,
    pub buffer_minutes: i64,
    pub status: LoadStatus,
    pub explanation: String,
    pub recommendation: String,
    pub big_minutes: i64,
    pub medium_minutes: i64,
    pub small_minutes: i64,
    pub task_count: i64,
    pub total_load_minutes: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_strings_parse_back_and_unknown_ones_fail() {
        assert_eq!("MEDIUM".parse::<TaskType>(), Ok(TaskType::Medium));
        assert_eq!(
            MetricScope::TodayPlan.as_str().parse::<MetricScope>(),
            Ok(MetricScope::TodayPlan)
        );
        assert_eq!(
            "medium".parse::<TaskType>(),
            Err(UnknownVariant("medium".to_string()))
        );
        assert!("TODAY".parse::<MetricScope>().is_err());
    }

    #[test]
    fn task_serializes_type_field_in_screaming_case() {
        let task = ParsedTask {
            task_type: TaskType::Big,
            title: "Звіт".to_string(),
            estimate_minutes: 60,
            planned_start: None,
            planned_end: None,
            raw_line: "Звіт (1 год)".to_string(),
        };
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["type"], "BIG");
        assert_eq!(value["estimate_minutes"], 60);
        assert!(value["planned_start"].is_null());
    }
}
