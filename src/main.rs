//! 계정/세션 서비스 메인 애플리케이션
//!
//! 설정을 읽고 MongoDB/Redis 연결과 `AppState`를 조립한 뒤 Actix-web 서버를 구동합니다.

use std::io;
use std::sync::Arc;

use account_service_backend::caching::redis::RedisClient;
use account_service_backend::config::{AppConfig, Environment};
use account_service_backend::core::AppState;
use account_service_backend::db::Database;
use account_service_backend::repositories::oauth::{
    MemoryOAuthStateStore, OAuthStateStore, RedisOAuthStateStore,
};
use account_service_backend::repositories::users::{MongoUserRepository, UserStore};
use account_service_backend::routes::configure_all_routes;
use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::http::header;
use actix_web::{middleware, web, App, HttpServer};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info, warn};

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 환경 설정 및 로깅 초기화
    load_env_file();
    init_logging(Environment::current());

    info!("🚀 계정 서비스 시작중...");

    let config = AppConfig::from_env().map_err(|e| {
        error!("설정 오류: {}", e);
        io::Error::other(e)
    })?;

    // 데이터 스토어 초기화
    let user_store = initialize_user_store(&config).await?;
    let state_store = initialize_state_store(&config).await?;

    let state = AppState::new(config, user_store, state_store).map_err(|e| {
        error!("애플리케이션 상태 초기화 실패: {}", e);
        io::Error::other(e.to_string())
    })?;

    info!("✅ 모든 서비스가 성공적으로 초기화되었습니다!");

    start_http_server(web::Data::new(state)).await
}

/// HTTP 서버를 구성하고 실행합니다
///
/// Rate Limiting, CORS, 로깅, 경로 정규화 미들웨어를 포함합니다.
async fn start_http_server(state: web::Data<AppState>) -> io::Result<()> {
    let config = state.config.clone();
    let bind_address = config.server.bind_address();

    info!("🌐 서버가 http://{} 에서 실행중입니다", bind_address);
    info!("📍 Health check: http://{}/api/health", bind_address);

    let governor_conf = GovernorConfigBuilder::default()
        .requests_per_second(config.rate_limit.per_second)
        .burst_size(config.rate_limit.burst_size)
        .use_headers()
        .finish()
        .ok_or_else(|| io::Error::other("잘못된 Rate Limiting 설정"))?;

    info!(
        "🛡️ Rate Limiting 활성화: 초당 {}요청, 버스트 {}개",
        config.rate_limit.per_second, config.rate_limit.burst_size
    );

    let cors_origins = config.cors_origins.clone();

    HttpServer::new(move || {
        App::new()
            // Rate Limiting 미들웨어 (가장 먼저 적용)
            .wrap(Governor::new(&governor_conf))
            .wrap(configure_cors(&cors_origins))
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .app_data(state.clone())
            .configure(configure_all_routes)
    })
    .bind(bind_address)?
    .workers(config.server.workers)
    .run()
    .await
}

/// 환경별 설정 파일을 로드합니다
///
/// * `PROFILE=dev` - .env.dev
/// * `PROFILE=prod` - .env.prod
/// * 기타 - .env
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_default();

    // 로거 초기화 전이므로 결과는 stderr로만 남깁니다.
    let result = match profile.as_str() {
        "prod" => dotenv::from_filename(".env.prod").map(|_| ()),
        "dev" => dotenv::from_filename(".env.dev").map(|_| ()),
        _ => dotenv().map(|_| ()),
    };

    if let Err(e) = result {
        eprintln!("환경 파일 로드 실패 (profile={:?}): {}", profile, e);
    }
}

/// 로깅 시스템을 초기화합니다
///
/// `RUST_LOG`가 없으면 개발 환경은 debug, 그 외는 info 레벨을 사용합니다.
///
/// ```bash
/// RUST_LOG=account_service_backend::services=debug cargo run
/// ```
fn init_logging(environment: Environment) {
    let default_filter = match environment {
        Environment::Development => "debug,actix_web=info",
        _ => "info,actix_web=info",
    };
    env_logger::init_from_env(Env::default().default_filter_or(default_filter));
}

/// MongoDB 연결과 인덱스를 준비합니다
async fn initialize_user_store(config: &AppConfig) -> io::Result<Arc<dyn UserStore>> {
    info!("📡 데이터베이스 연결 중...");

    let database = Database::new(&config.database).await.map_err(|e| {
        error!("데이터베이스 연결 실패: {}", e);
        io::Error::other(e)
    })?;

    let repository = MongoUserRepository::new(&database);
    repository.create_indexes().await.map_err(|e| {
        error!("인덱스 생성 실패: {}", e);
        io::Error::other(e)
    })?;

    Ok(Arc::new(repository))
}

/// OAuth state 저장소를 선택합니다
///
/// `REDIS_URL`이 있으면 Redis, 없으면 프로세스 메모리를 사용합니다.
async fn initialize_state_store(config: &AppConfig) -> io::Result<Arc<dyn OAuthStateStore>> {
    match &config.redis_url {
        Some(url) => {
            let redis = RedisClient::new(url).await.map_err(|e| {
                error!("Redis 연결 실패: {}", e);
                io::Error::other(e)
            })?;
            Ok(Arc::new(RedisOAuthStateStore::new(redis)))
        }
        None => {
            warn!("REDIS_URL이 없어 메모리 OAuth state 저장소를 사용합니다 (단일 인스턴스 전용)");
            Ok(Arc::new(MemoryOAuthStateStore::new()))
        }
    }
}

/// CORS 설정을 구성합니다
///
/// 세션 쿠키를 주고받기 위해 자격 증명을 허용하며, Origin은 설정값만 허용합니다.
fn configure_cors(origins: &[String]) -> Cors {
    origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
        .supports_credentials()
        .max_age(3600)
}
