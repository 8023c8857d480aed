//! 사용자 서비스 모듈
//!
//! 로컬 회원가입/로그인과 OAuth 프로필 upsert를 담당하는 [`UserService`]를 제공합니다.

pub mod user_service;

pub use user_service::UserService;
