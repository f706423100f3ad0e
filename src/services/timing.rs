//! # 시간 범위 / 소요 시간 추출
//!
//! 계획 텍스트 한 줄에서 두 가지 시간 표기를 찾아냅니다.
//!
//! - 명시적 범위: `10:00-11:30`, `9:15 – 10:00` (하이픈 또는 en-dash)
//! - 소요 시간: `1 год 30 хв`, `2h`, `45 min` (시간 + 분을 모두 합산)
//!
//! 범위를 먼저 검사하며, 범위가 있으면 소요 시간 표기는 무시합니다.
//! 모든 함수는 어떤 입력에도 실패하지 않습니다 (못 찾으면 `None`).

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use std::sync::OnceLock;

/// `H:MM` 구분자 `H:MM`. 구분자는 `-` 또는 `–`, 양옆 공백은 선택
const RANGE_PATTERN: &str = r"(\d{1,2}):(\d{2})\s*[-–]\s*(\d{1,2}):(\d{2})";
/// `h`는 단어 끝이나 숫자 앞(`2h30m`)에서만 단위로 봅니다. `2 HTML`, `3 hosts`는 제외
const HOURS_PATTERN: &str = r"(\d+)\s*(?:год|hours?\b|h(?:\b|\d))";
const MINUTES_PATTERN: &str = r"(\d+)\s*(?:хв|min|m\b)";

// 정규식은 한 번만 컴파일하여 모든 요청이 공유합니다.
fn re_range() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(RANGE_PATTERN).expect("valid range regex"))
}

fn re_hours() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(HOURS_PATTERN).expect("valid hours regex"))
}

fn re_minutes() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(MINUTES_PATTERN).expect("valid minutes regex"))
}

/// 한 줄에서 찾은 시간 정보
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timing {
    /// 기준 날짜에 고정된 시작/종료 시각. `end > start`가 항상 성립합니다.
    Range {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    /// 분 단위 소요 시간 (항상 0보다 큼)
    Duration { minutes: i64 },
}

impl Timing {
    pub fn estimate_minutes(&self) -> i64 {
        match self {
            Timing::Range { start, end } => (*end - *start).num_minutes(),
            Timing::Duration { minutes } => *minutes,
        }
    }
}

/// 줄에서 시간 정보를 추출합니다. 범위가 소요 시간보다 우선합니다.
pub fn extract_timing(line: &str, date: NaiveDate) -> Option<Timing> {
    if let Some((start, end)) = extract_range(line, date) {
        return Some(Timing::Range { start, end });
    }
    extract_duration(line).map(|minutes| Timing::Duration { minutes })
}

/// 유효한 첫 번째 `HH:MM-HH:MM` 범위를 기준 날짜의 시각으로 변환합니다.
fn extract_range(line: &str, date: NaiveDate) -> Option<(NaiveDateTime, NaiveDateTime)> {
    re_range()
        .captures_iter(line)
        .find_map(|caps| range_from_captures(&caps, date))
}

/// 종료가 시작보다 이르면 자정을 넘긴 작업으로 보고 종료에 하루를 더합니다.
/// 24시 이상/60분 이상처럼 존재하지 않는 시각이거나 길이가 0이면 범위로 보지 않습니다.
fn range_from_captures(
    caps: &regex::Captures<'_>,
    date: NaiveDate,
) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let clock = |h: usize, m: usize| -> Option<NaiveTime> {
        let hour = caps.get(h)?.as_str().parse().ok()?;
        let minute = caps.get(m)?.as_str().parse().ok()?;
        NaiveTime::from_hms_opt(hour, minute, 0)
    };

    let start = date.and_time(clock(1, 2)?);
    let mut end = date.and_time(clock(3, 4)?);
    if end < start {
        end += Duration::days(1);
    }
    if end == start {
        return None;
    }
    Some((start, end))
}

/// 시간/분 표기를 모두 찾아 분 단위로 합산합니다. 합이 0이면 `None`.
fn extract_duration(line: &str) -> Option<i64> {
    let sum = |re: &Regex, factor: i64| -> i64 {
        re.captures_iter(line)
            .filter_map(|caps| caps.get(1)?.as_str().parse::<i64>().ok())
            .fold(0i64, |acc, n| acc.saturating_add(n.saturating_mul(factor)))
    };

    let total = sum(re_hours(), 60).saturating_add(sum(re_minutes(), 1));
    (total > 0).then_some(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    fn at(d: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
        d.and_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn range_is_anchored_to_reference_date() {
        let timing = extract_timing("Client call (10:00-11:30)", date()).unwrap();
        assert_eq!(
            timing,
            Timing::Range {
                start: at(date(), 10, 0),
                end: at(date(), 11, 30),
            }
        );
        assert_eq!(timing.estimate_minutes(), 90);
    }

    #[test]
    fn range_accepts_en_dash_and_spaces() {
        let timing = extract_timing("Стендап 9:15 – 9:45", date()).unwrap();
        assert_eq!(timing.estimate_minutes(), 30);
    }

    #[test]
    fn overnight_range_moves_end_to_next_day() {
        let timing = extract_timing("Реліз (23:30-01:00)", date()).unwrap();
        let next = date().succ_opt().unwrap();
        assert_eq!(
            timing,
            Timing::Range {
                start: at(date(), 23, 30),
                end: at(next, 1, 0),
            }
        );
        assert_eq!(timing.estimate_minutes(), 90);
    }

    #[test]
    fn hours_and_minutes_are_summed() {
        let timing = extract_timing("Review PR (1 год 30 хв)", date()).unwrap();
        assert_eq!(timing, Timing::Duration { minutes: 90 });
    }

    #[test]
    fn english_duration_units() {
        assert_eq!(extract_duration("Write docs (2h)"), Some(120));
        assert_eq!(extract_duration("Sync (45 min)"), Some(45));
        assert_eq!(extract_duration("Break 15m"), Some(15));
        assert_eq!(extract_duration("Deep work 1 hour 20 min"), Some(80));
    }

    #[test]
    fn range_wins_over_duration() {
        let timing = extract_timing("Workshop (14:00-15:00, 2 год)", date()).unwrap();
        assert_eq!(timing.estimate_minutes(), 60);
        assert!(matches!(timing, Timing::Range { .. }));
    }

    #[test]
    fn impossible_clock_values_are_not_a_range() {
        assert!(extract_range("Щось (25:00-26:00)", date()).is_none());
        assert!(extract_range("Щось (10:75-11:00)", date()).is_none());
        // 범위가 아니면 소요 시간 검사로 넘어갑니다
        assert_eq!(
            extract_timing("Щось (25:00-26:00) 30 хв", date()),
            Some(Timing::Duration { minutes: 30 })
        );
    }

    #[test]
    fn first_valid_range_wins() {
        let timing = extract_timing("Щось 25:00-26:00, потім 10:00-11:00", date()).unwrap();
        assert_eq!(
            timing,
            Timing::Range {
                start: at(date(), 10, 0),
                end: at(date(), 11, 0),
            }
        );
    }

    #[test]
    fn words_starting_with_h_are_not_hours() {
        assert_eq!(extract_timing("Fix 2 HTML pages", date()), None);
        assert_eq!(extract_timing("Call 3 Hanna", date()), None);
        assert_eq!(extract_timing("Invite 3 hosts", date()), None);
        assert_eq!(extract_duration("Sprint 2h30m"), Some(150));
        assert_eq!(extract_duration("Workshop 2 hours"), Some(120));
    }

    #[test]
    fn zero_sum_and_plain_text_yield_nothing() {
        assert_eq!(extract_timing("Просто текст", date()), None);
        assert_eq!(extract_timing("Зустріч (0 хв)", date()), None);
        assert_eq!(extract_timing("Meeting summary", date()), None);
    }
}
