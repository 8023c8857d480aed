//! # Configuration Module
//!
//! 서비스 설정 관리를 담당하는 모듈입니다.
//! 환경 변수(및 `.env` 파일)에서 값을 읽어 [`AppConfig`] 하나로 모으고,
//! 시작 시점에 한 번 생성된 설정을 `web::Data`를 통해 각 서비스에 전달합니다.
//! 코어 로직은 실행 중에 환경 변수를 다시 읽지 않습니다.
//!
//! ## 모듈 구성
//!
//! - [`data_config`] - 실행 환경, 서버, 데이터베이스, Rate Limit 설정
//! - [`auth_config`] - JWT, OAuth state, 프로바이더별 클라이언트 설정
//!
//! ## 환경 변수 설정 가이드
//!
//! ```bash
//! # 필수 (운영)
//! export ENVIRONMENT="production"
//! export JWT_SECRET="your-super-secret-key"
//! export PUBLIC_BASE_URL="https://auth.example.com"
//! export FRONTEND_URL="https://app.example.com"
//!
//! # 선택
//! export JWT_ALGORITHM="HS256"                 # HS256 | HS384 | HS512
//! export ACCESS_TOKEN_EXPIRE_MINUTES="10080"   # 7일
//! export GOOGLE_CLIENT_ID="..."  GOOGLE_CLIENT_SECRET="..."
//! export DISCORD_CLIENT_ID="..." DISCORD_CLIENT_SECRET="..."
//! export REDIS_URL="redis://localhost:6379"    # 없으면 메모리 state 저장소 사용
//! ```

pub mod data_config;
pub mod auth_config;

pub use data_config::*;
pub use auth_config::*;

use std::env;
use std::str::FromStr;

use thiserror::Error;

/// 설정 검증 실패
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set in production")]
    DefaultSecretInProduction,

    #[error("invalid configuration value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// 애플리케이션 전체 설정
///
/// 시작 시 [`AppConfig::from_env`]로 한 번 생성되고 이후 읽기 전용으로 공유됩니다.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    /// 디버그 모드. 꺼져 있으면 세션 쿠키에 Secure 플래그가 붙습니다.
    pub debug: bool,
    pub server: ServerConfig,
    /// OAuth 콜백 주소를 만들 때 쓰는 이 서비스의 외부 주소
    pub public_base_url: String,
    /// OAuth 로그인 완료 후 리다이렉트할 프론트엔드 주소
    pub frontend_url: String,
    pub cors_origins: Vec<String>,
    pub jwt: JwtConfig,
    pub password: PasswordConfig,
    pub oauth: OAuthConfig,
    pub google: Option<GoogleOAuthConfig>,
    pub discord: Option<DiscordOAuthConfig>,
    pub database: DatabaseConfig,
    pub redis_url: Option<String>,
    pub rate_limit: RateLimitConfig,
}

impl AppConfig {
    /// 환경 변수에서 전체 설정을 읽고 검증합니다.
    ///
    /// # Errors
    ///
    /// * `ConfigError::DefaultSecretInProduction` - 운영 환경에서 기본 서명 키 사용
    /// * `ConfigError::Invalid` - URL 형식 등 해석할 수 없는 값
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = Environment::current();
        let server = ServerConfig::from_env();

        let debug = env_nonempty("DEBUG")
            .map(|raw| matches!(raw.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or_else(|| environment.default_debug());

        let public_base_url = env_or(
            "PUBLIC_BASE_URL",
            &format!("http://localhost:{}", server.port),
        );
        let frontend_url = env_or("FRONTEND_URL", "http://localhost:3000");

        let cors_origins = env_or("CORS_ORIGINS", "http://localhost:3000")
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let config = Self {
            environment,
            debug,
            server,
            public_base_url,
            frontend_url,
            cors_origins,
            jwt: JwtConfig::from_env(),
            password: PasswordConfig::from_env(environment),
            oauth: OAuthConfig::from_env(),
            google: GoogleOAuthConfig::from_env(),
            discord: DiscordOAuthConfig::from_env(),
            database: DatabaseConfig::from_env(),
            redis_url: env_nonempty("REDIS_URL"),
            rate_limit: RateLimitConfig::from_env(),
        };

        config.validate()?;
        Ok(config)
    }

    /// 교차 항목 검증
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.environment.is_production() && self.jwt.uses_default_secret() {
            return Err(ConfigError::DefaultSecretInProduction);
        }

        for (key, value) in [
            ("PUBLIC_BASE_URL", &self.public_base_url),
            ("FRONTEND_URL", &self.frontend_url),
        ] {
            if !(value.starts_with("http://") || value.starts_with("https://")) {
                return Err(ConfigError::Invalid {
                    key,
                    reason: format!("'{}' is not an absolute http(s) URL", value),
                });
            }
        }

        if self.jwt.expire_minutes <= 0 || self.jwt.expire_minutes > MAX_EXPIRE_MINUTES {
            return Err(ConfigError::Invalid {
                key: "ACCESS_TOKEN_EXPIRE_MINUTES",
                reason: format!("must be between 1 and {}", MAX_EXPIRE_MINUTES),
            });
        }

        Ok(())
    }

    /// 세션 쿠키에 Secure 플래그를 붙일지 여부
    pub fn secure_cookies(&self) -> bool {
        !self.debug
    }
}

/// 환경 변수를 읽고, 없으면 기본값을 사용합니다.
pub(crate) fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// 비어 있지 않은 환경 변수만 반환합니다.
pub(crate) fn env_nonempty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// 환경 변수를 파싱합니다. 파싱에 실패하면 에러를 기록하고 기본값을 사용합니다.
pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().unwrap_or_else(|e| {
            log::error!("{} 파싱 실패: {}. 기본값 {} 사용", key, e, default);
            default
        }),
        Err(_) => default,
    }
}

/// 테스트용 설정 (디버그 모드, bcrypt cost 4, 프로바이더 미설정)
#[cfg(test)]
pub fn test_config() -> AppConfig {
    AppConfig {
        environment: Environment::Test,
        debug: true,
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            workers: 1,
        },
        public_base_url: "http://localhost:8080".to_string(),
        frontend_url: "http://localhost:3000".to_string(),
        cors_origins: vec!["http://localhost:3000".to_string()],
        jwt: JwtConfig {
            secret: "test-secret-key".to_string(),
            algorithm: jsonwebtoken::Algorithm::HS256,
            expire_minutes: 60,
        },
        password: PasswordConfig { bcrypt_cost: 4 },
        oauth: OAuthConfig {
            state_ttl_minutes: 10,
            http_timeout_seconds: 5,
        },
        google: None,
        discord: None,
        database: DatabaseConfig {
            uri: "mongodb://localhost:27017".to_string(),
            name: "account_service_test".to_string(),
        },
        redis_url: None,
        rate_limit: RateLimitConfig {
            per_second: 100,
            burst_size: 200,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_rejects_default_secret() {
        let mut config = test_config();
        config.environment = Environment::Production;
        config.jwt.secret = DEFAULT_JWT_SECRET.to_string();

        assert!(matches!(
            config.validate(),
            Err(ConfigError::DefaultSecretInProduction)
        ));

        config.jwt.secret = "a-real-secret".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_relative_frontend_url_is_rejected() {
        let mut config = test_config();
        config.frontend_url = "/app".to_string();

        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { key: "FRONTEND_URL", .. })
        ));
    }

    #[test]
    fn test_token_lifetime_bounds() {
        let mut config = test_config();

        config.jwt.expire_minutes = 0;
        assert!(config.validate().is_err());

        config.jwt.expire_minutes = 1_000_000_000_000;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { key: "ACCESS_TOKEN_EXPIRE_MINUTES", .. })
        ));

        config.jwt.expire_minutes = MAX_EXPIRE_MINUTES;
        assert!(config.validate().is_ok());
        assert_eq!(config.jwt.ttl_seconds(), MAX_EXPIRE_MINUTES * 60);
    }

    #[test]
    fn test_secure_cookie_follows_debug_flag() {
        let mut config = test_config();
        assert!(!config.secure_cookies());

        config.debug = false;
        assert!(config.secure_cookies());
    }
}
