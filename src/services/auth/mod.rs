//! 인증 서비스 모듈
//!
//! ```text
//! 로그인/콜백 ─► (OAuthService) ─► UserService ─► TokenService ─► SessionService (쿠키)
//! 인증 요청   ─► SessionService ─► TokenService (검증) ─► UserService::find_by_id
//! ```

pub mod oauth;
pub mod oauth_service;
pub mod password_service;
pub mod session_service;
pub mod token_service;

pub use oauth::{OAuthProvider, OAuthProviderRegistry};
pub use oauth_service::OAuthService;
pub use password_service::PasswordService;
pub use session_service::SessionService;
pub use token_service::TokenService;
