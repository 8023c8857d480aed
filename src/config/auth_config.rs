//! 인증 관련 설정
//!
//! 세션 JWT 서명, OAuth state, 그리고 프로바이더별(Google, Discord) 클라이언트 설정을 정의합니다.
//! 모든 값은 시작 시 한 번 읽혀 [`AppConfig`](super::AppConfig)를 통해 전달됩니다.

use std::fmt;
use std::str::FromStr;

use jsonwebtoken::Algorithm;
use serde::{Deserialize, Serialize};

use super::{env_nonempty, env_or, env_parse};

/// 개발용 기본 서명 키. 운영 환경에서는 사용할 수 없습니다.
pub const DEFAULT_JWT_SECRET: &str = "change-me-in-production";

/// 토큰 유효 시간 상한 (10년, 분 단위)
pub const MAX_EXPIRE_MINUTES: i64 = 60 * 24 * 365 * 10;

/// 세션 토큰 서명 설정
#[derive(Clone)]
pub struct JwtConfig {
    /// HMAC 서명용 대칭 키
    pub secret: String,
    /// 서명 알고리즘 (HS256/HS384/HS512 중 하나로 고정)
    pub algorithm: Algorithm,
    /// 토큰 유효 시간 (분)
    pub expire_minutes: i64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        let secret = env_nonempty("JWT_SECRET")
            .or_else(|| env_nonempty("SECRET_KEY"))
            .unwrap_or_else(|| {
                log::warn!("JWT_SECRET not set, using default (not secure for production!)");
                DEFAULT_JWT_SECRET.to_string()
            });

        let algorithm_tag = env_or("JWT_ALGORITHM", "HS256");
        let algorithm = parse_signing_algorithm(&algorithm_tag).unwrap_or_else(|| {
            log::error!("지원하지 않는 JWT_ALGORITHM: {}. HS256 사용", algorithm_tag);
            Algorithm::HS256
        });

        Self {
            secret,
            algorithm,
            expire_minutes: env_parse("ACCESS_TOKEN_EXPIRE_MINUTES", 60 * 24 * 7),
        }
    }

    /// 토큰 유효 시간 (초). 쿠키 Max-Age와 동일한 값입니다.
    pub fn ttl_seconds(&self) -> i64 {
        self.expire_minutes.clamp(0, MAX_EXPIRE_MINUTES) * 60
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret == DEFAULT_JWT_SECRET
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("expire_minutes", &self.expire_minutes)
            .finish()
    }
}

/// 대칭키 HMAC 알고리즘만 허용합니다.
pub fn parse_signing_algorithm(tag: &str) -> Option<Algorithm> {
    match tag.trim().to_uppercase().as_str() {
        "HS256" => Some(Algorithm::HS256),
        "HS384" => Some(Algorithm::HS384),
        "HS512" => Some(Algorithm::HS512),
        _ => None,
    }
}

/// OAuth 플로우 공통 설정
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    /// state 값 보관 시간 (분)
    pub state_ttl_minutes: i64,
    /// 프로바이더 호출 타임아웃 (초)
    pub http_timeout_seconds: u64,
}

impl OAuthConfig {
    pub fn from_env() -> Self {
        Self {
            state_ttl_minutes: env_parse("OAUTH_STATE_TTL_MINUTES", 10),
            http_timeout_seconds: env_parse("OAUTH_HTTP_TIMEOUT_SECONDS", 10),
        }
    }

    pub fn state_ttl_seconds(&self) -> u64 {
        (self.state_ttl_minutes.max(1) * 60) as u64
    }
}

/// Google OIDC 클라이언트 설정
///
/// 엔드포인트는 discovery 문서에서 가져옵니다.
#[derive(Clone)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub discovery_url: String,
}

impl GoogleOAuthConfig {
    /// `GOOGLE_CLIENT_ID`가 없으면 Google 로그인은 비활성화됩니다.
    pub fn from_env() -> Option<Self> {
        let client_id = env_nonempty("GOOGLE_CLIENT_ID")?;

        Some(Self {
            client_id,
            client_secret: env_or("GOOGLE_CLIENT_SECRET", ""),
            discovery_url: env_or(
                "GOOGLE_DISCOVERY_URL",
                "https://accounts.google.com/.well-known/openid-configuration",
            ),
        })
    }
}

impl fmt::Debug for GoogleOAuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleOAuthConfig")
            .field("client_id", &self.client_id)
            .field("discovery_url", &self.discovery_url)
            .finish_non_exhaustive()
    }
}

/// Discord OAuth2 클라이언트 설정
///
/// discovery를 제공하지 않으므로 엔드포인트를 명시적으로 지정합니다.
#[derive(Clone)]
pub struct DiscordOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub authorize_url: String,
    pub token_url: String,
    pub api_base_url: String,
    pub cdn_base_url: String,
}

impl DiscordOAuthConfig {
    /// `DISCORD_CLIENT_ID`가 없으면 Discord 로그인은 비활성화됩니다.
    pub fn from_env() -> Option<Self> {
        let client_id = env_nonempty("DISCORD_CLIENT_ID")?;

        Some(Self {
            client_id,
            client_secret: env_or("DISCORD_CLIENT_SECRET", ""),
            authorize_url: env_or("DISCORD_AUTHORIZE_URL", "https://discord.com/api/oauth2/authorize"),
            token_url: env_or("DISCORD_TOKEN_URL", "https://discord.com/api/oauth2/token"),
            api_base_url: env_or("DISCORD_API_BASE_URL", "https://discord.com/api/v10"),
            cdn_base_url: env_or("DISCORD_CDN_URL", "https://cdn.discordapp.com"),
        })
    }
}

impl fmt::Debug for DiscordOAuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscordOAuthConfig")
            .field("client_id", &self.client_id)
            .field("authorize_url", &self.authorize_url)
            .field("token_url", &self.token_url)
            .field("api_base_url", &self.api_base_url)
            .finish_non_exhaustive()
    }
}

/// 인증 프로바이더
///
/// 계정 생성 시 결정되며 이후 변경되지 않습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    /// 이메일/비밀번호 로컬 계정
    Email,

    Google,

    Discord,
}

impl AuthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthProvider::Email => "email",
            AuthProvider::Google => "google",
            AuthProvider::Discord => "discord",
        }
    }

    pub fn is_oauth(&self) -> bool {
        !matches!(self, AuthProvider::Email)
    }
}

impl FromStr for AuthProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "email" => Ok(AuthProvider::Email),
            "google" => Ok(AuthProvider::Google),
            "discord" => Ok(AuthProvider::Discord),
            _ => Err(format!("Unsupported auth provider: {}", s)),
        }
    }
}

impl fmt::Display for AuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_provider_from_string() {
        assert_eq!("email".parse::<AuthProvider>().unwrap(), AuthProvider::Email);
        assert_eq!("google".parse::<AuthProvider>().unwrap(), AuthProvider::Google);
        assert_eq!("discord".parse::<AuthProvider>().unwrap(), AuthProvider::Discord);

        // 대소문자 무관
        assert_eq!("GOOGLE".parse::<AuthProvider>().unwrap(), AuthProvider::Google);

        assert!("github".parse::<AuthProvider>().is_err());
        assert!("".parse::<AuthProvider>().is_err());
    }

    #[test]
    fn test_auth_provider_serialization() {
        let json = serde_json::to_string(&AuthProvider::Discord).unwrap();
        assert_eq!(json, "\"discord\"");

        let provider: AuthProvider = serde_json::from_str("\"email\"").unwrap();
        assert_eq!(provider, AuthProvider::Email);
        assert!(!provider.is_oauth());
        assert!(AuthProvider::Google.is_oauth());
    }

    #[test]
    fn test_only_hmac_algorithms_are_accepted() {
        assert_eq!(parse_signing_algorithm("HS256"), Some(Algorithm::HS256));
        assert_eq!(parse_signing_algorithm("hs512"), Some(Algorithm::HS512));
        assert_eq!(parse_signing_algorithm("RS256"), None);
        assert_eq!(parse_signing_algorithm("none"), None);
    }

    #[test]
    fn test_jwt_debug_redacts_secret() {
        let config = JwtConfig {
            secret: "super-secret".to_string(),
            algorithm: Algorithm::HS256,
            expire_minutes: 60,
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert_eq!(config.ttl_seconds(), 3600);
    }
}
