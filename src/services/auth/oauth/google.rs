//! Google (OpenID Connect)
//!
//! 엔드포인트는 discovery 문서에서 가져오며, 문서는 처음 필요할 때 한 번 조회해 캐시합니다.
//! 프로필은 토큰 응답의 ID 토큰 클레임을 우선 사용하고, ID 토큰이 없거나
//! 이메일이 없으면 userinfo 엔드포인트로 보완합니다.
//!
//! ID 토큰은 TLS로 토큰 엔드포인트에서 직접 받은 값이므로 서명 대신
//! 발급자(`iss`)와 대상(`aud` = client_id)만 확인합니다.

use async_trait::async_trait;
use jsonwebtoken::{decode, DecodingKey, Validation};
use once_cell::sync::OnceCell;
use reqwest::Client;

use super::{build_url, exchange_authorization_code, send_json, OAuthProvider};
use crate::config::{AuthProvider, GoogleOAuthConfig};
use crate::core::errors::{AppError, AppResult};
use crate::domain::oauth::google::{GoogleIdClaims, GoogleUserInfo, OidcDiscovery};
use crate::domain::oauth::{OAuthProfile, ProviderTokenResponse};

const SCOPES: &str = "openid email profile";
/// Google은 `iss`를 스킴 없이 발급하기도 합니다.
const BARE_ISSUER: &str = "accounts.google.com";

pub struct GoogleProvider {
    config: GoogleOAuthConfig,
    http: Client,
    discovery: OnceCell<OidcDiscovery>,
}

impl GoogleProvider {
    pub fn new(config: GoogleOAuthConfig, http: Client) -> Self {
        Self {
            config,
            http,
            discovery: OnceCell::new(),
        }
    }

    async fn discovery(&self) -> AppResult<&OidcDiscovery> {
        if let Some(document) = self.discovery.get() {
            return Ok(document);
        }

        let document: OidcDiscovery =
            send_json(self.http.get(&self.config.discovery_url), "OIDC discovery")
                .await
                .map_err(|e| match e {
                    // discovery 실패는 사용자 입력과 무관
                    AppError::AuthenticationError(detail) => AppError::ProviderUnavailable(detail),
                    other => other,
                })?;

        log::debug!("Google discovery 문서 캐시: issuer={}", document.issuer);
        Ok(self.discovery.get_or_init(|| document))
    }

    fn decode_id_token(&self, id_token: &str, issuer: &str) -> AppResult<GoogleIdClaims> {
        let mut validation = Validation::default();
        validation.insecure_disable_signature_validation();
        validation.set_audience(&[self.config.client_id.as_str()]);
        validation.set_issuer(&[issuer, BARE_ISSUER]);
        validation.set_required_spec_claims(&["sub", "aud", "iss"]);

        decode::<GoogleIdClaims>(id_token, &DecodingKey::from_secret(&[]), &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                log::warn!("Google ID 토큰 검증 실패: {}", e);
                AppError::AuthenticationError("invalid id_token".to_string())
            })
    }

    async fn fetch_userinfo(&self, access_token: &str) -> AppResult<GoogleUserInfo> {
        let discovery = self.discovery().await?;
        let endpoint = discovery.userinfo_endpoint.as_deref().ok_or_else(|| {
            AppError::ProviderUnavailable("discovery 문서에 userinfo_endpoint가 없습니다".to_string())
        })?;

        send_json(self.http.get(endpoint).bearer_auth(access_token), "Google userinfo").await
    }
}

#[async_trait]
impl OAuthProvider for GoogleProvider {
    fn provider(&self) -> AuthProvider {
        AuthProvider::Google
    }

    async fn authorization_url(&self, redirect_uri: &str, state: &str) -> AppResult<String> {
        let discovery = self.discovery().await?;

        Ok(build_url(
            &discovery.authorization_endpoint,
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
        let discovery = self.discovery().await?;

        exchange_authorization_code(
            &self.http,
            &discovery.token_endpoint,
            &self.config.client_id,
            &self.config.client_secret,
            code,
            redirect_uri,
        )
        .await
    }

    async fn fetch_profile(&self, token: &ProviderTokenResponse) -> AppResult<OAuthProfile> {
        if let Some(id_token) = token.id_token.as_deref() {
            let issuer = self.discovery().await?.issuer.clone();
            let claims = self.decode_id_token(id_token, &issuer)?;

            if let Some(email) = verified_email(claims.email, claims.email_verified) {
                return Ok(OAuthProfile {
                    provider: AuthProvider::Google,
                    provider_user_id: claims.sub,
                    email: Some(email),
                    name: claims.name,
                    avatar_url: claims.picture,
                });
            }
            log::debug!("ID 토큰에 이메일이 없어 userinfo로 보완합니다");
        }

        let info = self.fetch_userinfo(&token.access_token).await?;
        Ok(OAuthProfile {
            provider: AuthProvider::Google,
            provider_user_id: info.sub,
            email: info.email,
            name: info.name,
            avatar_url: info.picture,
        })
    }
}

/// 미인증(`email_verified == false`) 이메일은 계정 식별에 쓰지 않습니다.
fn verified_email(email: Option<String>, verified: Option<bool>) -> Option<String> {
    match verified {
        Some(false) => None,
        _ => email,
    }
}
