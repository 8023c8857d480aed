//! # 통합 에러 처리
//!
//! 인증 코어가 호출자에게 돌려주는 실패 종류와, 이를 HTTP 응답으로 바꾸는 규칙을 정의합니다.
//!
//! ## 에러 분류
//!
//! | 종류 | 상태 코드 | 비고 |
//! |------|-----------|------|
//! | `InvalidCredentials` | 401 | 이메일 없음/OAuth 전용 계정/비밀번호 불일치를 구분하지 않음 |
//! | `DuplicateEmail` | 409 | 회원가입 시 이메일 중복 |
//! | `AccountConflict` | 409 | 다른 인증 방식으로 가입된 이메일 |
//! | `MissingEmail` | 400 | 프로바이더가 이메일을 주지 않음 |
//! | `UnsupportedProvider` | 404 | 알 수 없거나 설정되지 않은 프로바이더 |
//! | `TokenInvalid` | 401 | 손상/서명 불일치/만료 (로그에서만 구분) |
//! | `NotAuthenticated` | 401 | 세션 쿠키 없음 또는 사용자 없음 |
//! | `ProviderUnavailable` | 502 | 프로바이더 통신 실패. 재시도는 사용자 몫 |
//!
//! 저장소/캐시/내부 오류는 클라이언트에게 `"Internal server error"`만 노출하고
//! 상세 내용은 서버 로그에 남깁니다.

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde_json::json;
use thiserror::Error;

use crate::domain::token::TokenFailure;
use crate::repositories::users::StoreError;

/// 애플리케이션 전역 에러 타입
///
/// 모든 서비스 메서드는 `AppResult<T>`를 반환하며, 핸들러에서 `?`로 전파하면
/// `actix_web::ResponseError` 구현에 의해 `{"detail": ..., "code": ...}` JSON으로 변환됩니다.
#[derive(Error, Debug)]
pub enum AppError {
    /// 로그인 실패 (401)
    ///
    /// 계정 존재 여부가 드러나지 않도록 실패 원인과 관계없이 같은 메시지를 사용합니다.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// 이미 등록된 이메일 (409)
    #[error("Email already registered")]
    DuplicateEmail,

    /// 다른 인증 방식으로 가입된 이메일로 OAuth 계정 생성 시도 (409)
    #[error("An account with this email already exists. Please log in with your original method.")]
    AccountConflict,

    /// 프로바이더가 이메일을 제공하지 않음 (400)
    #[error("Could not retrieve email from provider")]
    MissingEmail,

    /// 지원하지 않거나 설정되지 않은 프로바이더 (404)
    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    /// 세션 토큰 검증 실패 (401)
    #[error("Invalid or expired token")]
    TokenInvalid(TokenFailure),

    /// 인증 정보 없음 (401)
    #[error("Not authenticated")]
    NotAuthenticated,

    /// OAuth 프로바이더 통신 실패 (502)
    #[error("Authentication provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// OAuth state 불일치/만료/재사용 (400)
    #[error("Invalid OAuth state")]
    InvalidOAuthState,

    /// 프로바이더가 인가를 거부함 (401)
    ///
    /// 사용자가 동의 화면에서 취소했거나 authorization code가 거절된 경우입니다.
    #[error("OAuth authorization failed: {0}")]
    AuthenticationError(String),

    /// 입력값 검증 실패 (422)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 데이터베이스 오류 (500)
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Redis 오류 (500)
    #[error("Cache error: {0}")]
    CacheError(String),

    /// 예상하지 못한 내부 오류 (500)
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// 클라이언트가 분기할 수 있는 고정 에러 코드
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::DuplicateEmail => "duplicate_email",
            AppError::AccountConflict => "account_conflict",
            AppError::MissingEmail => "missing_email",
            AppError::UnsupportedProvider(_) => "unsupported_provider",
            AppError::TokenInvalid(_) => "token_invalid",
            AppError::NotAuthenticated => "not_authenticated",
            AppError::ProviderUnavailable(_) => "provider_unavailable",
            AppError::InvalidOAuthState => "invalid_oauth_state",
            AppError::AuthenticationError(_) => "oauth_denied",
            AppError::ValidationError(_) => "validation_error",
            AppError::DatabaseError(_) | AppError::CacheError(_) | AppError::InternalError(_) => {
                "internal_error"
            }
        }
    }

    /// 클라이언트에게 노출해도 되는 메시지
    ///
    /// 내부 오류와 프로바이더 통신 오류의 상세 내용은 숨깁니다.
    pub fn client_message(&self) -> String {
        match self {
            AppError::DatabaseError(_) | AppError::CacheError(_) | AppError::InternalError(_) => {
                "Internal server error".to_string()
            }
            AppError::ProviderUnavailable(_) => "Authentication provider unavailable".to_string(),
            AppError::ValidationError(_) => "Validation error".to_string(),
            other => other.to_string(),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidCredentials
            | AppError::TokenInvalid(_)
            | AppError::NotAuthenticated
            | AppError::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            AppError::DuplicateEmail | AppError::AccountConflict => StatusCode::CONFLICT,
            AppError::MissingEmail | AppError::InvalidOAuthState => StatusCode::BAD_REQUEST,
            AppError::UnsupportedProvider(_) => StatusCode::NOT_FOUND,
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::ProviderUnavailable(_) => StatusCode::BAD_GATEWAY,
            AppError::DatabaseError(_) | AppError::CacheError(_) | AppError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// HTTP 에러 응답을 생성합니다.
    ///
    /// 5xx 에러는 상세 내용을 서버 로그에만 기록합니다.
    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        if status.is_server_error() {
            log::error!("요청 처리 실패 [{}]: {}", self.code(), self);
        }

        let body = match self {
            AppError::ValidationError(errors) => json!({
                "detail": self.client_message(),
                "code": self.code(),
                "errors": errors,
            }),
            _ => json!({
                "detail": self.client_message(),
                "code": self.code(),
            }),
        };

        HttpResponse::build(status).json(body)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type AppResult<T> = Result<T, AppError>;

/// 외부 라이브러리 에러를 `AppError::InternalError`로 변환하는 확장 trait
///
/// ```rust,ignore
/// let digest = bcrypt::hash(password, cost).context("비밀번호 해싱 실패")?;
/// ```
pub trait ErrorContext<T> {
    /// 컨텍스트 정보와 함께 에러를 변환합니다.
    fn context(self, msg: &str) -> AppResult<T>;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, msg: &str) -> AppResult<T> {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", msg, e)))
    }
}
