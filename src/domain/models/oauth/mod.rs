//! # OAuth Models
//!
//! 프로바이더가 돌려주는 응답 구조체와, 이를 프로바이더와 무관한 형태로
//! 정규화한 [`OAuthProfile`]을 정의합니다.
//!
//! ```text
//! GoogleIdClaims / GoogleUserInfo ─┐
//!                                  ├─► OAuthProfile ─► UserService::upsert_oauth_user
//! DiscordUser ─────────────────────┘
//! ```

pub mod google;
pub mod discord;

use serde::Deserialize;

use crate::config::AuthProvider;

/// 정규화된 OAuth 프로필
///
/// 이메일은 프로바이더에 따라 없을 수 있으며, 계정 조회 단계에서 필수로 검사됩니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthProfile {
    pub provider: AuthProvider,
    /// 프로바이더 내 사용자 식별자
    pub provider_user_id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
}

/// Authorization code 교환 응답 (RFC 6749 5.1)
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderTokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub scope: Option<String>,
    /// OIDC 프로바이더만 포함
    #[serde(default)]
    pub id_token: Option<String>,
}
