//! # Domain Models Module
//!
//! 영속되지 않는 도메인 모델들입니다.
//!
//! - [`auth`] - 요청에 부착되는 인증 주체와 인증 모드(strict/lenient)
//! - [`token`] - 세션 JWT 클레임과 검증 실패 종류
//! - [`oauth`] - 프로바이더 응답과 정규화된 OAuth 프로필

pub mod auth;
pub mod token;
pub mod oauth;
