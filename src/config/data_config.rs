//! 실행 환경, 서버, 저장소 관련 설정
//!
//! 환경 변수에서 한 번 읽어 [`AppConfig`](super::AppConfig)에 담기는 값들입니다.

use super::{env_or, env_parse};

/// 애플리케이션 실행 환경
///
/// `ENVIRONMENT` 환경변수로 결정되며, 쿠키 Secure 플래그와 bcrypt cost 기본값에 영향을 줍니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Staging,
    Production,
}

impl Environment {
    /// 현재 환경 변수 기준의 실행 환경
    pub fn current() -> Self {
        Self::parse(&env_or("ENVIRONMENT", "production"))
    }

    /// 문자열에서 실행 환경을 해석합니다. 알 수 없는 값은 운영 환경으로 취급합니다.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" | "local" => Environment::Development,
            "test" | "testing" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Production,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    /// 디버그 모드 기본값 (로컬 개발/테스트에서만 켜짐)
    pub fn default_debug(&self) -> bool {
        matches!(self, Environment::Development | Environment::Test)
    }
}

/// 비밀번호 해싱 설정
#[derive(Debug, Clone, Copy)]
pub struct PasswordConfig {
    /// bcrypt work factor (4-31)
    pub bcrypt_cost: u32,
}

impl PasswordConfig {
    /// `BCRYPT_COST`가 유효 범위(4-31)면 그 값을, 아니면 환경별 기본값을 사용합니다.
    pub fn from_env(environment: Environment) -> Self {
        let bcrypt_cost = std::env::var("BCRYPT_COST")
            .ok()
            .and_then(|raw| raw.parse::<u32>().ok())
            .filter(|cost| (4..=31).contains(cost))
            .unwrap_or_else(|| Self::bcrypt_cost_for_env(environment));

        Self { bcrypt_cost }
    }

    pub fn bcrypt_cost_for_env(environment: Environment) -> u32 {
        match environment {
            Environment::Development => 4,
            Environment::Test => 4,
            Environment::Staging => 10,
            Environment::Production => 12,
        }
    }
}

/// HTTP 서버 바인딩 설정
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            host: env_or("HOST", "127.0.0.1"),
            port: env_parse("PORT", 8080),
            workers: env_parse("WORKERS", 4),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// MongoDB 연결 설정
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub uri: String,
    pub name: String,
}

impl DatabaseConfig {
    pub fn from_env() -> Self {
        Self {
            uri: env_or("MONGODB_URI", "mongodb://localhost:27017"),
            name: env_or("DATABASE_NAME", "account_service_dev"),
        }
    }
}

/// Rate Limiting 설정
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    pub per_second: u64,
    pub burst_size: u32,
}

impl RateLimitConfig {
    pub fn from_env() -> Self {
        Self {
            per_second: env_parse("RATE_LIMIT_PER_SECOND", 100),
            burst_size: env_parse("RATE_LIMIT_BURST_SIZE", 200),
        }
    }
}
