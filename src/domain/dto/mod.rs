//! # Data Transfer Objects (DTO) Module
//!
//! API 경계에서 주고받는 데이터 구조를 정의합니다.
//!
//! | 방향 | 모듈 | 역할 |
//! |------|------|------|
//! | 요청 | `users::request` | JSON 본문/쿼리 매핑 + `validator` 검증 |
//! | 응답 | `users::response` | 민감 정보를 제외한 공개 표현 |
//!
//! 입력 형식 검증(이메일 형식, 비밀번호 길이)은 핸들러에서 DTO 단계에 끝나며,
//! 검증을 통과한 값만 인증 코어로 전달됩니다.

pub mod users;

pub use users::*;
