//! 요청 전처리 모듈.
//!
//! - `auth`: Bearer 토큰 검증 및 `AuthUser` 추출기

pub mod auth;
