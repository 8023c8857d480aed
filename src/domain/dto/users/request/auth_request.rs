//! 인증 요청관련 DTO
//!
//! 회원가입, 로그인, OAuth 콜백 요청 정보를 매핑합니다.
use serde::Deserialize;
use validator::Validate;

use crate::utils::string_utils::deserialize_optional_string;

/// 이메일/비밀번호 회원가입 요청
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "비밀번호는 8-128자 사이여야 합니다"))]
    pub password: String,

    /// 표시 이름 (공백만 있으면 없는 것으로 취급)
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(max = 255, message = "이름은 255자 이하여야 합니다"))]
    pub name: Option<String>,
}

/// 이메일/비밀번호 로그인 요청
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,

    #[validate(length(min = 1, message = "비밀번호를 입력해주세요"))]
    pub password: String,
}

/// OAuth 콜백 쿼리
///
/// 사용자가 동의를 거부하면 `code`/`state` 대신 `error`가 전달되므로 모두 선택 필드입니다.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OAuthCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}
