//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 모아둔 모듈입니다.
//!
//! 각 하위 모듈:
//! - `health`: 서버 상태 확인 (헬스체크)
//! - `my_day`: 하루 계획 조회/수정/부하 상태 핸들러

pub mod health;
pub mod my_day;

// main.rs에서 `routes::get_my_day`처럼 바로 접근 가능하게 재공개합니다.
pub use health::*;
pub use my_day::*;
