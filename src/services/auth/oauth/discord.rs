//! Discord (OAuth2 REST)
//!
//! discovery를 제공하지 않으므로 설정된 authorize/token/API 주소를 그대로 사용합니다.

use async_trait::async_trait;
use reqwest::Client;

use super::{build_url, exchange_authorization_code, send_json, OAuthProvider};
use crate::config::{AuthProvider, DiscordOAuthConfig};
use crate::core::errors::AppResult;
use crate::domain::oauth::discord::DiscordUser;
use crate::domain::oauth::{OAuthProfile, ProviderTokenResponse};

const SCOPES: &str = "identify email";

pub struct DiscordProvider {
    config: DiscordOAuthConfig,
    http: Client,
}

impl DiscordProvider {
    pub fn new(config: DiscordOAuthConfig, http: Client) -> Self {
        Self { config, http }
    }

    fn profile_url(&self) -> String {
        format!("{}/users/@me", self.config.api_base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl OAuthProvider for DiscordProvider {
    fn provider(&self) -> AuthProvider {
        AuthProvider::Discord
    }

    async fn authorization_url(&self, redirect_uri: &str, state: &str) -> AppResult<String> {
        Ok(build_url(
            &self.config.authorize_url,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", redirect_uri),
                ("response_type", "code"),
                ("scope", SCOPES),
                ("state", state),
            ],
        ))
    }

    async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> AppResult<ProviderTokenResponse> {
        exchange_authorization_code(
            &self.http,
            &self.config.token_url,
            &self.config.client_id,
            &self.config.client_secret,
            code,
            redirect_uri,
        )
        .await
    }

    async fn fetch_profile(&self, token: &ProviderTokenResponse) -> AppResult<OAuthProfile> {
        let user: DiscordUser = send_json(
            self.http
                .get(self.profile_url())
                .bearer_auth(&token.access_token),
            "Discord 프로필 조회",
        )
        .await?;

        let avatar_url = user.avatar_url(&self.config.cdn_base_url);
        // 미인증 이메일은 계정 식별에 쓰지 않음
        let email = match user.verified {
            Some(false) => None,
            _ => user.email,
        };

        Ok(OAuthProfile {
            provider: AuthProvider::Discord,
            provider_user_id: user.id,
            email,
            name: user.global_name.or(Some(user.username)),
            avatar_url,
        })
    }
}
