//! API 라우트 설정 모듈
//!
//! ```text
//! /api/health                    GET   헬스체크
//! /api/auth/register             POST  회원가입
//! /api/auth/login                POST  로그인
//! /api/auth/{provider}/login     GET   OAuth 시작
//! /api/auth/{provider}/callback  GET   OAuth 콜백
//! /api/auth/me                   GET   현재 사용자 (AuthMiddleware::required)
//! /api/auth/logout               POST  로그아웃 (AuthMiddleware::optional)
//! ```
//!
//! 인증 미들웨어는 스코프가 아니라 핸들러 단위(`wrap = ...`)로 적용합니다.

use actix_web::{error, web};

use crate::core::AppError;
use crate::handlers;

pub fn configure_all_routes(cfg: &mut web::ServiceConfig) {
    // JSON 본문 해석 실패도 검증 실패(422)로 응답
    cfg.app_data(json_config());

    cfg.service(web::scope("/api").service(handlers::health::health_check).service(
        web::scope("/auth")
            .service(handlers::auth::register)
            .service(handlers::auth::login)
            .service(handlers::auth::get_current_user)
            .service(handlers::auth::logout)
            .service(handlers::auth::oauth_login)
            .service(handlers::auth::oauth_callback),
    ));
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: error::JsonPayloadError, _req| {
        log::debug!("JSON 본문 해석 실패: {}", err);
        AppError::ValidationError(err.to_string()).into()
    })
}
