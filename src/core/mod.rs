//! # Core Module
//!
//! 요청 처리 전반에서 공유되는 기반 요소를 제공합니다.
//!
//! - [`errors`] - `AppError` 실패 분류와 HTTP 응답 변환
//! - [`state`] - 시작 시 한 번 조립되어 `web::Data`로 공유되는 `AppState`
//!
//! 서비스 인스턴스는 전역 레지스트리 없이 `AppState`가 명시적으로 소유하며,
//! 핸들러와 미들웨어는 `web::Data<AppState>`를 통해 접근합니다.
//!
//! ```rust,ignore
//! let state = AppState::new(config, user_store, state_store)?;
//! let data = web::Data::new(state);
//!
//! HttpServer::new(move || App::new().app_data(data.clone()).configure(configure_all_routes))
//! ```

pub mod errors;
pub mod state;

pub use errors::{AppError, AppResult, ErrorContext};
pub use state::AppState;
