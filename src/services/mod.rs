//! # 서비스 계층
//!
//! 핸들러와 DB 계층 사이의 비즈니스 로직입니다.
//! - `timing`: 한 줄에서 시간 범위/소요 시간 추출
//! - `day_parser`: 섹션을 인식하는 계획 텍스트 파서
//! - `load`: 작업 부하와 가용 시간 계산
//! - `template`: 새 계획의 기본 텍스트
//! - `my_day`: 위 모듈과 DB를 묶는 오케스트레이션

pub mod day_parser;
pub mod load;
pub mod my_day;
pub mod template;
pub mod timing;

pub use day_parser::parse_day_text;
pub use load::calculate_load;
