//! 비즈니스 로직 계층
//!
//! - [`auth`] - 비밀번호 해싱, 세션 토큰, 세션 쿠키, OAuth 프로바이더
//! - [`users`] - 계정 생성/로그인/OAuth upsert

pub mod auth;
pub mod users;
