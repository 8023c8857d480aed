//! # OAuth 프로바이더 어댑터
//!
//! 프로바이더마다 [`OAuthProvider`] 구현을 하나씩 두고, 태그(`google`, `discord`)로 조회합니다.
//!
//! | 단계 | 메서드 | 실패 |
//! |------|--------|------|
//! | 인가 URL 생성 | `authorization_url` | discovery 실패 시 `ProviderUnavailable` |
//! | code → token 교환 | `exchange_code` | 4xx: `AuthenticationError`, 네트워크/5xx: `ProviderUnavailable` |
//! | 프로필 조회 | `fetch_profile` | 위와 동일 |
//!
//! 외부 호출은 재시도하지 않습니다. 모든 호출은 레지스트리가 만든 하나의
//! `reqwest::Client`(타임아웃, 리다이렉트 비활성화)를 공유합니다.

pub mod discord;
pub mod google;

pub use discord::DiscordProvider;
pub use google::GoogleProvider;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::config::{AppConfig, AuthProvider};
use crate::core::errors::{AppError, AppResult, ErrorContext};
use crate::domain::oauth::{OAuthProfile, ProviderTokenResponse};

/// 프로바이더별 OAuth 기능
#[async_trait]
pub trait OAuthProvider: Send + Sync {
    fn provider(&self) -> AuthProvider;

    /// 사용자를 보낼 인가 URL
    async fn authorization_url(&self, redirect_uri: &str, state: &str) -> AppResult<String>;

    /// authorization code를 토큰으로 교환합니다.
    async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> AppResult<ProviderTokenResponse>;

    /// 토큰 응답으로 프로필을 조회해 정규화합니다.
    async fn fetch_profile(&self, token: &ProviderTokenResponse) -> AppResult<OAuthProfile>;
}

/// 설정된 프로바이더 목록
///
/// 클라이언트 ID가 없는 프로바이더는 등록되지 않으며 조회 시 `UnsupportedProvider`가 됩니다.
#[derive(Default, Clone)]
pub struct OAuthProviderRegistry {
    providers: HashMap<AuthProvider, Arc<dyn OAuthProvider>>,
}

impl OAuthProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let http = http_client(config.oauth.http_timeout_seconds)?;
        let mut registry = Self::new();

        if let Some(google) = &config.google {
            registry.register(Arc::new(GoogleProvider::new(google.clone(), http.clone())));
        }
        if let Some(discord) = &config.discord {
            registry.register(Arc::new(DiscordProvider::new(discord.clone(), http.clone())));
        }

        if registry.providers.is_empty() {
            log::warn!("설정된 OAuth 프로바이더가 없습니다. 이메일/비밀번호 로그인만 사용할 수 있습니다");
        } else {
            log::info!("OAuth 프로바이더 등록: {:?}", registry.configured());
        }

        Ok(registry)
    }

    pub fn register(&mut self, provider: Arc<dyn OAuthProvider>) {
        self.providers.insert(provider.provider(), provider);
    }

    /// 경로의 태그로 프로바이더를 찾습니다.
    pub fn get(&self, tag: &str) -> AppResult<Arc<dyn OAuthProvider>> {
        tag.parse::<AuthProvider>()
            .ok()
            .and_then(|provider| self.providers.get(&provider))
            .cloned()
            .ok_or_else(|| AppError::UnsupportedProvider(tag.to_string()))
    }

    pub fn configured(&self) -> Vec<AuthProvider> {
        let mut providers: Vec<_> = self.providers.keys().copied().collect();
        providers.sort_by_key(|p| p.as_str());
        providers
    }
}

/// 프로바이더 호출용 HTTP 클라이언트
pub fn http_client(timeout_seconds: u64) -> AppResult<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .context("OAuth HTTP 클라이언트 생성 실패")
}

/// 쿼리 문자열이 붙은 URL을 만듭니다.
pub(crate) fn build_url(base: &str, params: &[(&str, &str)]) -> String {
    let query = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{}{}{}", base, separator, query)
}

/// 요청을 보내고 JSON 응답을 해석합니다.
///
/// 4xx는 프로바이더가 요청(코드/토큰)을 거절한 것으로 보고 `AuthenticationError`,
/// 네트워크 오류/5xx/파싱 실패는 `ProviderUnavailable`로 분류합니다.
pub(crate) async fn send_json<T: DeserializeOwned>(
    request: RequestBuilder,
    what: &str,
) -> AppResult<T> {
    let response = request
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .await
        .map_err(|e| AppError::ProviderUnavailable(format!("{} 요청 실패: {}", what, e)))?;

    let status = response.status();
    if status.is_client_error() {
        let body = response.text().await.unwrap_or_default();
        log::warn!("{} 거절됨 ({}): {}", what, status, body);
        return Err(AppError::AuthenticationError(
            "provider rejected the request".to_string(),
        ));
    }
    if !status.is_success() {
        return Err(AppError::ProviderUnavailable(format!(
            "{} 실패: HTTP {}",
            what, status
        )));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| AppError::ProviderUnavailable(format!("{} 응답 파싱 실패: {}", what, e)))
}

/// authorization code 교환 요청 (`application/x-www-form-urlencoded`)
pub(crate) async fn exchange_authorization_code(
    http: &Client,
    token_url: &str,
    client_id: &str,
    client_secret: &str,
    code: &str,
    redirect_uri: &str,
) -> AppResult<ProviderTokenResponse> {
    let params = [
        ("grant_type", "authorization_code"),
        ("code", code),
        ("redirect_uri", redirect_uri),
        ("client_id", client_id),
        ("client_secret", client_secret),
    ];

    send_json(http.post(token_url).form(&params), "토큰 교환").await
}
