//! # Standup 웹 서버 진입점
//!
//! 하루 계획(My Day) 텍스트를 저장하고, 작업/지표로 파싱하여
//! 작업 부하를 계산해 주는 API 서버의 시작점입니다.
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. SQLite 데이터베이스 연결 풀 생성
//! 4. 데이터베이스 마이그레이션 실행
//! 5. API 라우터 설정
//! 6. HTTP 서버 시작

// ── 모듈 선언 ──
mod config;
mod db;
mod error;
mod middleware;
mod models;
mod routes;
mod services;

use anyhow::Result; // 어떤 에러 타입이든 담을 수 있는 범용 Result 타입
use axum::{
    routing::{get, post}, // HTTP 메서드별 라우팅 함수들
    Router,
};
use config::Config;
use routes::*;
use tower_http::{
    cors::{Any, CorsLayer}, // CORS(Cross-Origin Resource Sharing) 설정
    trace::TraceLayer,      // HTTP 요청/응답 로깅 미들웨어
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1단계: 환경변수 로딩 ──
    // .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    // ── 2단계: 로깅(tracing) 초기화 ──
    // RUST_LOG가 없으면 standup, tower_http, axum 모듈을 debug 레벨로 출력합니다.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "standup=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // ── 3단계: 설정 로딩 ──
    let config = Config::from_env()?;
    tracing::info!("Starting Standup server on {}:{}", config.host, config.port);

    // ── 4단계: SQLite 연결 풀 생성 ──
    // WAL + busy_timeout 설정은 db::connect 안에서 합니다.
    let pool = db::connect(&config.database_url, config.db_max_connections).await?;

    // ── 5단계: 데이터베이스 마이그레이션 실행 ──
    tracing::info!("Running database migrations...");
    db::run_migrations(&pool).await?;

    // ── 6단계: 애플리케이션 상태(State) 생성 ──
    let state = AppState {
        pool,
        jwt_secret: config.jwt_secret.clone(),
    };

    // ── 7단계: API 라우터 설정 ──
    // {date}는 URL 경로 파라미터 (핸들러에서 Path<String>으로 추출)
    let api_routes = Router::new()
        .route("/my-day", get(list_my_days))
        .route("/my-day/{date}", get(get_my_day).put(update_my_day))
        .route("/my-day/{date}/load-status", get(get_my_day_load))
        .route("/my-day/{date}/preview", post(preview_my_day))
        // 헬스체크 API (인증 불필요)
        .route("/health", get(health_check))
        .with_state(state);

    // ── 8단계: CORS 미들웨어 설정 ──
    // 개발 환경에서는 모두 허용합니다. 프로덕션에서는 특정 도메인만 허용해야 합니다.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .nest("/api/v1", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http()); // HTTP 요청/응답 자동 로깅

    // ── 9단계: 서버 시작 ──
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
