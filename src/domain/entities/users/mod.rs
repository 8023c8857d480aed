//! Users Entity Module
//!
//! 사용자 도메인의 핵심 엔티티를 정의합니다.
//!
//! ```rust,ignore
//! use crate::domain::entities::users::user::User;
//!
//! // 로컬 사용자
//! let user = User::new_local("user@example.com".into(), Some("User".into()), hashed_password);
//!
//! // OAuth 사용자
//! let oauth_user = User::new_oauth(
//!     "user@gmail.com".into(),
//!     Some("OAuth User".into()),
//!     None,
//!     AuthProvider::Google,
//!     "google_subject_123".into(),
//! );
//! ```

pub mod user;
