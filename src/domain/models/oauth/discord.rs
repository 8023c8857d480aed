//! Discord REST 응답 모델

use serde::Deserialize;

/// `GET /users/@me` 응답
///
/// `email`은 `email` scope가 있어도 계정 설정에 따라 비어 있을 수 있습니다.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscordUser {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub global_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// 아바타 해시
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub verified: Option<bool>,
}

impl DiscordUser {
    /// CDN 아바타 URL. 해시가 없으면 기본 이미지 대신 None을 반환합니다.
    pub fn avatar_url(&self, cdn_base_url: &str) -> Option<String> {
        self.avatar.as_deref().filter(|hash| !hash.is_empty()).map(|hash| {
            format!(
                "{}/avatars/{}/{}.png",
                cdn_base_url.trim_end_matches('/'),
                self.id,
                hash
            )
        })
    }
}
