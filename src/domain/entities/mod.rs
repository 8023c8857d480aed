//! # Domain Entities Module
//!
//! 저장소 문서와 1:1로 대응되는 핵심 엔티티를 정의합니다.
//!
//! ```text
//! Domain Layer
//! ├── entities/     ← 이 모듈 (영속 엔티티)
//! ├── models/       ← 인증 모델, 토큰 클레임, OAuth 프로필
//! └── dto/          ← HTTP 요청/응답 객체
//! ```
//!
//! 엔티티는 `serde`로 직렬화되어 MongoDB `users` 컬렉션에 저장됩니다.
//! `_id`는 UUID 문자열이며, 비밀번호 해시 같은 민감 정보는 응답 DTO로
//! 변환될 때 제외됩니다.

pub mod users;

pub use users::user::{ProfileUpdate, User};
