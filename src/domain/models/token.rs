//! 세션 JWT 클레임과 검증 실패 종류

use std::fmt;

use serde::{Deserialize, Serialize};

/// 세션 토큰의 클레임(Payload)
///
/// 개인정보 보호를 위해 subject와 시간 정보만 담습니다.
///
/// - `sub`: 토큰의 주체 (사용자 ID)
/// - `iat`: 발급 시각 (Unix timestamp)
/// - `exp`: 만료 시각 (Unix timestamp, 이 시각부터 무효)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// 토큰 검증 실패 종류
///
/// 호출자는 세 경우를 똑같이 거부하지만, 운영 로그에서는 구분해서 기록합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenFailure {
    /// 파싱 불가 (형식 오류, 필수 클레임 누락)
    Malformed,
    /// 서명 불일치 또는 허용되지 않은 알고리즘
    BadSignature,
    /// 만료됨
    Expired,
}

impl TokenFailure {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenFailure::Malformed => "malformed",
            TokenFailure::BadSignature => "bad_signature",
            TokenFailure::Expired => "expired",
        }
    }
}

impl fmt::Display for TokenFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
