//! 세션 토큰 발급/검증
//!
//! 대칭키 HMAC(HS256/HS384/HS512) JWT를 사용합니다. 검증 알고리즘은 설정에서만 결정되며
//! 토큰 헤더의 `alg`는 신뢰하지 않습니다.
//!
//! 만료는 exclusive입니다. `now < exp`인 동안만 유효하며 clock skew 허용치는 0입니다.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::config::JwtConfig;
use crate::core::errors::{AppError, AppResult, ErrorContext};
use crate::domain::token::{SessionClaims, TokenFailure};

#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    ttl: Duration,
}

impl TokenService {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            algorithm: config.algorithm,
            ttl: Duration::seconds(config.ttl_seconds()),
        }
    }

    /// 토큰 유효 시간 (초)
    pub fn ttl_seconds(&self) -> i64 {
        self.ttl.num_seconds()
    }

    pub fn issue(&self, subject: &str) -> AppResult<String> {
        self.issue_at(subject, Utc::now())
    }

    /// 지정한 시각 기준으로 토큰을 발급합니다. `exp = now + ttl`
    pub fn issue_at(&self, subject: &str, now: DateTime<Utc>) -> AppResult<String> {
        let exp = now.checked_add_signed(self.ttl).ok_or_else(|| {
            AppError::InternalError(format!("토큰 만료 시각 계산 범위 초과: {}", now))
        })?;

        let claims = SessionClaims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .context("세션 토큰 생성 실패")
    }

    pub fn validate(&self, token: &str) -> Result<String, TokenFailure> {
        self.validate_at(token, Utc::now())
    }

    /// 서명과 만료를 검증하고 subject를 반환합니다.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<String, TokenFailure> {
        let mut validation = Validation::new(self.algorithm);
        // 만료는 주입된 시각으로 직접 판정
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| classify_failure(e.kind()))?;

        if now.timestamp() >= data.claims.exp {
            return Err(TokenFailure::Expired);
        }

        Ok(data.claims.sub)
    }
}

fn classify_failure(kind: &ErrorKind) -> TokenFailure {
    match kind {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenFailure::BadSignature,
        ErrorKind::ExpiredSignature => TokenFailure::Expired,
        _ => TokenFailure::Malformed,
    }
}
