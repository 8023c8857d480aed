//! 미들웨어 모듈
//!
//! ### 인증 미들웨어 (AuthMiddleware)
//! - `session` 쿠키의 세션 토큰 검증
//! - 인증된 사용자 ID를 request extension에 저장 ([`AuthenticatedUser`](crate::domain::auth::AuthenticatedUser))
//! - 강제(`required`)/선택(`optional`) 인증 모드 지원
//!
//! ```rust,ignore
//! use crate::middlewares::AuthMiddleware;
//!
//! cfg.service(
//!     web::resource("/me")
//!         .wrap(AuthMiddleware::required())
//!         .route(web::get().to(get_current_user)),
//! );
//! ```
//!
//! 세션 검증에 필요한 서비스는 `web::Data<AppState>`에서 가져오므로,
//! 미들웨어를 쓰는 앱에는 `AppState`가 등록되어 있어야 합니다.

pub mod auth_middleware;
mod auth_inner;

pub use auth_middleware::AuthMiddleware;
