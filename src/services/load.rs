//! # 하루 부하(load) 계산기
//!
//! 작업 목록의 예상 시간을 합산하여 하루의 가용 용량과 비교하고,
//! 균형(BALANCED) / 과부하(OVERLOADED) / 저부하(UNDERLOADED)로 분류합니다.
//!
//! ## 계산식
//! ```text
//! 가용 용량 = 근무 540분 - 점심 60분 - 회의 90분 - 버퍼(540의 10% = 54분) = 336분
//! 컨텍스트 전환 = max(0, 작업 수 - 1) × 5분
//! 총 부하 = 작업 예상 시간 합계 + 컨텍스트 전환
//! ```
//! 모든 상수는 고정값입니다. 회의 시간은 아직 캘린더와 연동되지 않은 자리표시 값입니다.
//!
//! I/O가 없는 순수 함수라 어느 스레드에서든 동시에 호출해도 안전합니다.

use crate::models::{LoadResult, LoadStatus, TaskEstimate, TaskType};

pub const WORK_DAY_MINUTES: i64 = 540;
pub const LUNCH_MINUTES: i64 = 60;
pub const MEETINGS_MINUTES: i64 = 90;
pub const BUFFER_RATIO: f64 = 0.10;
pub const CONTEXT_SWITCH_MINUTES: i64 = 5;

/// 총 부하가 용량의 이 비율보다 작으면 저부하
pub const UNDERLOAD_RATIO: f64 = 0.6;
/// 총 부하가 용량의 이 비율보다 크면 과부하
pub const OVERLOAD_RATIO: f64 = 1.1;

pub fn buffer_minutes() -> i64 {
    (WORK_DAY_MINUTES as f64 * BUFFER_RATIO).round() as i64
}

pub fn effective_capacity_minutes() -> i64 {
    WORK_DAY_MINUTES - LUNCH_MINUTES - MEETINGS_MINUTES - buffer_minutes()
}

/// 작업 목록으로 부하를 계산합니다. 작업이 없으면 부하 0, 저부하로 분류됩니다.
pub fn calculate_load(tasks: &[TaskEstimate]) -> LoadResult {
    let capacity = effective_capacity_minutes();

    let minutes_of = |task_type: TaskType| -> i64 {
        tasks
            .iter()
            .filter(|t| t.task_type == task_type)
            .map(|t| t.estimate_minutes)
            .fold(0, i64::saturating_add)
    };
    let big_minutes = minutes_of(TaskType::Big);
    let medium_minutes = minutes_of(TaskType::Medium);
    let small_minutes = minutes_of(TaskType::Small);
    // 추정치 하나가 i64::MAX에 가까울 수 있으므로 합산은 모두 포화 연산입니다.
    let focus_minutes = big_minutes
        .saturating_add(medium_minutes)
        .saturating_add(small_minutes);

    let task_count = tasks.len() as i64;
    let switches = (task_count - 1).max(0);
    let context_switch_minutes = switches.saturating_mul(CONTEXT_SWITCH_MINUTES);
    let total_load_minutes = focus_minutes.saturating_add(context_switch_minutes);

    let status = classify(total_load_minutes, capacity);

    let explanation = format!(
        "Фокус-час: {} (з них дрібні справи: {}). \
         Перемикання контексту: {} хв × {} = {}. \
         Загальне навантаження: {} із доступних {}. Статус: {}.",
        format_minutes(focus_minutes),
        format_minutes(small_minutes),
        CONTEXT_SWITCH_MINUTES,
        switches,
        format_minutes(context_switch_minutes),
        format_minutes(total_load_minutes),
        format_minutes(capacity),
        status_label(status),
    );

    LoadResult {
        effective_capacity_minutes: capacity,
        focus_minutes,
        context_switch_minutes,
        meetings_minutes: MEETINGS_MINUTES,
        lunch_minutes: LUNCH_MINUTES,
        buffer_minutes: buffer_minutes(),
        status,
        explanation,
        recommendation: recommendation(status).to_string(),
        big_minutes,
        medium_minutes,
        small_minutes,
        task_count,
        total_load_minutes,
    }
}

/// 저부하 → 과부하 → 균형 순으로 검사합니다 (경계값은 균형).
pub fn classify(total_load_minutes: i64, capacity_minutes: i64) -> LoadStatus {
    let total = total_load_minutes as f64;
    let capacity = capacity_minutes as f64;
    if total < UNDERLOAD_RATIO * capacity {
        LoadStatus::Underloaded
    } else if total > OVERLOAD_RATIO * capacity {
        LoadStatus::Overloaded
    } else {
        LoadStatus::Balanced
    }
}

pub fn recommendation(status: LoadStatus) -> &'static str {
    match status {
        LoadStatus::Overloaded => {
            "День перевантажений: скоротіть кількість середніх справ або перенесіть частину на інший день."
        }
        LoadStatus::Underloaded => "Є вільний час: додайте ще одну середню справу.",
        LoadStatus::Balanced => "Навантаження збалансоване. Гарний план!",
    }
}

fn status_label(status: LoadStatus) -> &'static str {
    match status {
        LoadStatus::Balanced => "збалансовано",
        LoadStatus::Overloaded => "перевантаження",
        LoadStatus::Underloaded => "недовантаження",
    }
}

/// 60분 이상은 `H год M хв`, 미만은 `M хв`
pub fn format_minutes(minutes: i64) -> String {
    if minutes >= 60 {
        format!("{} год {} хв", minutes / 60, minutes % 60)
    } else {
        format!("{} хв", minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(task_type: TaskType, estimate_minutes: i64) -> TaskEstimate {
        TaskEstimate {
            task_type,
            estimate_minutes,
        }
    }

    #[test]
    fn capacity_under_fixed_constants() {
        assert_eq!(buffer_minutes(), 54);
        assert_eq!(effective_capacity_minutes(), 336);
    }

    #[test]
    fn empty_plan_is_underloaded() {
        let load = calculate_load(&[]);
        assert_eq!(load.status, LoadStatus::Underloaded);
        assert_eq!(load.total_load_minutes, 0);
        assert_eq!(load.focus_minutes, 0);
        assert_eq!(load.context_switch_minutes, 0);
        assert_eq!(load.task_count, 0);
        assert_eq!(load.effective_capacity_minutes, 336);
    }

    #[test]
    fn underload_boundary_is_strict() {
        // 336 × 0.6 = 201.6
        assert_eq!(calculate_load(&[task(TaskType::Big, 201)]).status, LoadStatus::Underloaded);
        assert_eq!(calculate_load(&[task(TaskType::Big, 202)]).status, LoadStatus::Balanced);
    }

    #[test]
    fn overload_boundary_is_strict() {
        // 336 × 1.1 = 369.6
        assert_eq!(calculate_load(&[task(TaskType::Big, 369)]).status, LoadStatus::Balanced);
        assert_eq!(calculate_load(&[task(TaskType::Big, 370)]).status, LoadStatus::Overloaded);
    }

    #[test]
    fn partitions_and_context_switches() {
        let load = calculate_load(&[
            task(TaskType::Big, 120),
            task(TaskType::Medium, 60),
            task(TaskType::Medium, 45),
            task(TaskType::Small, 10),
            task(TaskType::Small, 0),
        ]);
        assert_eq!(load.big_minutes, 120);
        assert_eq!(load.medium_minutes, 105);
        assert_eq!(load.small_minutes, 10);
        assert_eq!(load.focus_minutes, 235);
        assert_eq!(load.task_count, 5);
        assert_eq!(load.context_switch_minutes, 20);
        assert_eq!(load.total_load_minutes, 255);
        assert_eq!(load.status, LoadStatus::Balanced);
        assert_eq!(load.recommendation, recommendation(LoadStatus::Balanced));
    }

    #[test]
    fn context_switches_push_plan_over_capacity() {
        let tasks: Vec<_> = (0..12).map(|_| task(TaskType::Small, 28)).collect();
        let load = calculate_load(&tasks);
        assert_eq!(load.focus_minutes, 336);
        assert_eq!(load.context_switch_minutes, 55);
        assert_eq!(load.total_load_minutes, 391);
        assert_eq!(load.status, LoadStatus::Overloaded);
    }

    #[test]
    fn explanation_formats_minutes() {
        let load = calculate_load(&[task(TaskType::Big, 90), task(TaskType::Small, 20)]);
        assert_eq!(
            load.explanation,
            "Фокус-час: 1 год 50 хв (з них дрібні справи: 20 хв). \
             Перемикання контексту: 5 хв × 1 = 5 хв. \
             Загальне навантаження: 1 год 55 хв із доступних 5 год 36 хв. Статус: недовантаження."
        );
    }

    #[test]
    fn huge_estimates_saturate_instead_of_overflowing() {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let parsed = crate::services::parse_day_text(
            "Одна Велика справа\nA (9000000000000000000 хв)\nB (9000000000000000000 хв)",
            date,
        );
        let estimates: Vec<_> = parsed.tasks.iter().map(TaskEstimate::from).collect();
        assert_eq!(estimates.len(), 2);

        let load = calculate_load(&estimates);
        assert_eq!(load.big_minutes, i64::MAX);
        assert_eq!(load.focus_minutes, i64::MAX);
        assert_eq!(load.total_load_minutes, i64::MAX);
        assert_eq!(load.status, LoadStatus::Overloaded);

        let mixed = calculate_load(&[
            task(TaskType::Big, i64::MAX),
            task(TaskType::Medium, i64::MAX),
            task(TaskType::Small, 30),
        ]);
        assert_eq!(mixed.total_load_minutes, i64::MAX);
        assert_eq!(mixed.context_switch_minutes, 10);
    }

    #[test]
    fn minute_formatting() {
        assert_eq!(format_minutes(0), "0 хв");
        assert_eq!(format_minutes(45), "45 хв");
        assert_eq!(format_minutes(60), "1 год 0 хв");
        assert_eq!(format_minutes(336), "5 год 36 хв");
    }
}
