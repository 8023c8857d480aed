//! # Domain Module
//!
//! 인증 서비스의 도메인 계층입니다.
//!
//! - [`entities`] - 영속 엔티티 (`User`)
//! - [`models`] - 인증 모드, 세션 클레임, 정규화된 OAuth 프로필
//! - [`dto`] - HTTP 요청/응답 DTO

pub mod entities;
pub mod dto;
pub mod models;

pub use entities::*;
pub use dto::*;
pub use models::*;
