//! HTTP 핸들러
//!
//! 핸들러는 요청 DTO 검증, 서비스 호출, 쿠키/리다이렉트 응답 구성만 담당합니다.

pub mod auth;
pub mod health;
