//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 데이터베이스와 직접 상호작용하는 함수들을 모아둔 모듈입니다.
//! 서비스 계층(`services::my_day`)이 이 모듈의 함수를 호출하여 DB 작업을 수행합니다.
//!
//! 하위 모듈:
//! - `plans`: 하루 계획과 파생된 작업/지표 쿼리
//!
//! 연결 풀 생성(`connect`)과 마이그레이션(`run_migrations`)도 여기서 담당합니다.

pub mod plans;

// `crate::db::get_plan`처럼 바로 접근할 수 있게 재공개합니다.
pub use plans::*;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;

/// SQLite 연결 풀을 생성합니다.
///
/// - 파일이 없으면 새로 만듭니다.
/// - WAL 모드: 쓰기 트랜잭션 중에도 다른 연결이 이전 스냅샷을 읽을 수 있습니다.
/// - busy_timeout: 다른 연결이 쓰기 잠금을 잡고 있으면 즉시 실패하지 않고 기다립니다.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
}

/// `./migrations` 폴더의 SQL 파일들을 아직 적용되지 않은 것만 순서대로 실행합니다.
/// sqlx::migrate!는 컴파일 타임에 SQL 파일을 바이너리에 포함시킵니다.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
