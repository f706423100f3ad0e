//! # 하루 계획 텍스트 파서
//!
//! 사용자가 자유롭게 작성한 계획 텍스트를 작업(`ParsedTask`)과
//! 지표(`ParsedMetric`)로 변환합니다.
//!
//! ## 동작 방식
//! 텍스트를 한 줄씩 읽으면서 "현재 섹션" 상태를 유지합니다.
//! ```text
//! Одна Велика справа          ← 섹션 제목: 이후 줄은 BIG 작업
//! Запустити лендінг (3 год)   ← 작업
//! ---                         ← 구분선: 무시 (섹션 유지)
//! Метрики за вчора            ← 섹션 제목: 이후 줄은 어제 지표
//! Дзвінки: 18 клієнтам        ← 지표
//! ```
//! - 빈 줄과 구분선은 건너뜁니다.
//! - 섹션 표식(부분 문자열)을 포함한 줄은 섹션만 바꾸고 버립니다.
//! - 첫 섹션 제목 이전의 줄은 모두 무시합니다.
//! - 해석할 수 없는 줄은 조용히 버립니다. 에러는 발생하지 않습니다.
//!
//! 섹션 표식은 기본 템플릿(`template.rs`)의 제목과 반드시 일치해야 합니다.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

use super::timing::{extract_timing, Timing};
use crate::models::{MetricScope, ParsedMetric, ParsedPlan, ParsedTask, TaskType};

/// 파서가 현재 어느 섹션 안에 있는지
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Big,
    Medium,
    Small,
    MetricsYesterday,
    MetricsToday,
}

/// 섹션 표식 → 섹션. 위에서부터 검사하여 처음 일치한 항목이 적용됩니다.
pub const SECTION_MARKERS: &[(&str, Section)] = &[
    ("Одна Велика справа", Section::Big),
    ("середніх справ", Section::Medium),
    ("Дрібні справи", Section::Small),
    ("Метрики за вчора", Section::MetricsYesterday),
    ("Очікувані метрики", Section::MetricsToday),
    ("One Big thing", Section::Big),
    ("Medium tasks", Section::Medium),
    ("Small tasks", Section::Small),
    ("Yesterday metrics", Section::MetricsYesterday),
    ("Expected metrics", Section::MetricsToday),
];

/// 작업 섹션 안의 안내 문구 접두사
pub const TASK_INSTRUCTION_PREFIXES: &[&str] = &[
    "Опишіть",
    "Час вказуйте",
    "Порада",
    "Що зміниться",
    "Наприклад",
];

/// 지표 섹션 안의 안내 문구 접두사
pub const METRIC_INSTRUCTION_PREFIXES: &[&str] = &["Напишіть", "Формат", "Наприклад"];

/// 숫자를 포함한 괄호 묶음. 제목에서 시간 표기를 지우는 데 사용합니다.
const DIGIT_PARENS_PATTERN: &str = r"\([^)]*\d[^)]*\)";
const NUMBER_PATTERN: &str = r"\d+(?:[.,]\d+)?";

fn re_digit_parens() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(DIGIT_PARENS_PATTERN).expect("valid parens regex"))
}

fn re_number() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(NUMBER_PATTERN).expect("valid number regex"))
}

/// 줄이 섹션 제목이면 해당 섹션을 반환합니다.
pub fn detect_section(line: &str) -> Option<Section> {
    SECTION_MARKERS
        .iter()
        .find(|(marker, _)| line.contains(marker))
        .map(|(_, section)| *section)
}

fn is_separator(line: &str) -> bool {
    line.len() >= 3 && line.chars().all(|c| c == '-')
}

fn starts_with_any(line: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|prefix| line.starts_with(prefix))
}

/// 작업 한 줄을 파싱합니다.
///
/// 안내 문구이거나, 숫자가 든 괄호를 지운 뒤 제목이 비면 `None`을 반환합니다.
/// 숫자가 없는 괄호(예: `(чернетка)`)는 제목에 그대로 남습니다.
pub fn parse_task_line(line: &str, task_type: TaskType, date: NaiveDate) -> Option<ParsedTask> {
    if starts_with_any(line, TASK_INSTRUCTION_PREFIXES) {
        return None;
    }

    let timing = extract_timing(line, date);
    let title = re_digit_parens().replace_all(line, "").trim().to_string();
    if title.is_empty() {
        return None;
    }

    let (planned_start, planned_end) = match timing {
        Some(Timing::Range { start, end }) => (Some(start), Some(end)),
        _ => (None, None),
    };

    Some(ParsedTask {
        task_type,
        title,
        estimate_minutes: timing.map_or(0, |t| t.estimate_minutes()),
        planned_start,
        planned_end,
        raw_line: line.to_string(),
    })
}

/// `이름: 값 코멘트` 형식의 지표 한 줄을 파싱합니다.
///
/// 콜론이 없거나, 이름이 비었거나, 콜론 뒤에 숫자가 없으면 `None`.
/// 소수점은 `,`와 `.` 모두 허용합니다 (`4,5` → 4.5).
pub fn parse_metric_line(line: &str, scope: MetricScope) -> Option<ParsedMetric> {
    if starts_with_any(line, METRIC_INSTRUCTION_PREFIXES) {
        return None;
    }

    let (name, rest) = line.split_once(':')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    let number = re_number().find(rest)?;
    let value: f64 = number.as_str().replace(',', ".").parse().ok()?;

    let comment = format!("{}{}", &rest[..number.start()], &rest[number.end()..])
        .trim()
        .to_string();

    Some(ParsedMetric {
        scope,
        name: name.to_string(),
        value,
        comment: (!comment.is_empty()).then_some(comment),
    })
}

/// 전체 계획 텍스트를 한 번에 훑어 작업과 지표를 등장 순서대로 모읍니다.
///
/// `date`는 `HH:MM-HH:MM` 범위를 고정할 기준 날짜(보통 계획 날짜)입니다.
/// 같은 입력에는 항상 같은 결과를 돌려주는 순수 함수입니다.
pub fn parse_day_text(text: &str, date: NaiveDate) -> ParsedPlan {
    let mut parsed = ParsedPlan::default();
    let mut current: Option<Section> = None;

    for line in text.lines().map(str::trim) {
        if line.is_empty() || is_separator(line) {
            continue;
        }

        if let Some(section) = detect_section(line) {
            current = Some(section);
            continue;
        }

        match current {
            None => {}
            Some(Section::Big) => parsed.tasks.extend(parse_task_line(line, TaskType::Big, date)),
            Some(Section::Medium) => {
                parsed.tasks.extend(parse_task_line(line, TaskType::Medium, date))
            }
            Some(Section::Small) => {
                parsed.tasks.extend(parse_task_line(line, TaskType::Small, date))
            }
            Some(Section::MetricsYesterday) => parsed
                .metrics
                .extend(parse_metric_line(line, MetricScope::Yesterday)),
            Some(Section::MetricsToday) => parsed
                .metrics
                .extend(parse_metric_line(line, MetricScope::TodayPlan)),
        }
    }

    parsed
}
