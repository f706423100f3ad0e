//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! - `my_day`: 파서/부하 계산기가 다루는 값 타입 (작업, 지표, 부하 결과)
//! - `plan`: DB 행과 API 요청/응답 구조체
//!
//! `pub use X::*;`로 재공개하여 `crate::models::DailyPlan`처럼 짧게 접근합니다.

pub mod my_day;
pub mod plan;

pub use my_day::*;
pub use plan::*;
