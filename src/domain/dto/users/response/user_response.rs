use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::AuthProvider;
use crate::domain::entities::users::user::User;

/// 사용자 공개 표현
///
/// 비밀번호 해시와 프로바이더 내부 ID는 포함하지 않습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub provider: AuthProvider,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let User {
            id,
            email,
            name,
            avatar_url,
            provider,
            is_verified,
            created_at,
            ..
        } = user;

        Self {
            id,
            email,
            name,
            avatar_url,
            provider,
            is_verified,
            created_at,
        }
    }
}

/// 단순 메시지 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub detail: String,
}

impl MessageResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_response_hides_credentials() {
        let user = User::new_local("a@x.com".into(), None, "$2b$04$secret-hash".into());
        let json = serde_json::to_value(UserResponse::from(user)).unwrap();

        assert_eq!(json["email"], "a@x.com");
        assert_eq!(json["provider"], "email");
        assert!(json.get("hashed_password").is_none());
        assert!(!json.to_string().contains("secret-hash"));
    }
}
