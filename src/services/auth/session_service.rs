//! 세션 경계
//!
//! 요청의 `session` 쿠키를 인증 주체로 해석하고, 응답에 세션 쿠키를 붙이거나 제거합니다.
//!
//! | 속성 | 값 |
//! |------|-----|
//! | 이름 | `session` |
//! | HttpOnly | 항상 |
//! | SameSite | Lax |
//! | Path | `/` |
//! | Max-Age | 토큰 유효 시간 |
//! | Secure | 디버그 모드가 아닐 때 |

use std::sync::Arc;

use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::{HttpRequest, HttpResponse};

use crate::core::errors::{AppError, AppResult, ErrorContext};
use crate::domain::auth::{AuthMode, SessionResolution};
use crate::services::auth::token_service::TokenService;

pub const SESSION_COOKIE: &str = "session";
pub const OAUTH_STATE_COOKIE: &str = "oauth_state";
const OAUTH_STATE_COOKIE_PATH: &str = "/api/auth";

#[derive(Clone)]
pub struct SessionService {
    tokens: Arc<TokenService>,
    secure: bool,
}

impl SessionService {
    pub fn new(tokens: Arc<TokenService>, secure: bool) -> Self {
        Self { tokens, secure }
    }

    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build(SESSION_COOKIE, token)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .max_age(CookieDuration::seconds(self.tokens.ttl_seconds()))
            .finish()
    }

    /// 세션 쿠키와 같은 이름/경로/SameSite를 가진 만료 쿠키
    pub fn removal_cookie(&self) -> Cookie<'static> {
        let mut cookie = Cookie::build(SESSION_COOKIE, "")
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .finish();
        cookie.make_removal();
        cookie
    }

    /// 토큰을 발급해 응답에 세션 쿠키로 붙입니다.
    pub fn attach(&self, response: &mut HttpResponse, subject: &str) -> AppResult<()> {
        let token = self.tokens.issue(subject)?;
        response
            .add_cookie(&self.session_cookie(token))
            .context("세션 쿠키 설정 실패")
    }

    pub fn detach(&self, response: &mut HttpResponse) -> AppResult<()> {
        response
            .add_cookie(&self.removal_cookie())
            .context("세션 쿠키 제거 실패")
    }

    /// 요청 쿠키를 해석합니다. 실패 종류는 로그에만 남깁니다.
    pub fn resolve(&self, request: &HttpRequest) -> SessionResolution {
        let Some(cookie) = request.cookie(SESSION_COOKIE) else {
            return SessionResolution::Anonymous;
        };

        if cookie.value().is_empty() {
            return SessionResolution::Anonymous;
        }

        match self.tokens.validate(cookie.value()) {
            Ok(subject) => SessionResolution::Authenticated(subject),
            Err(kind) => {
                log::warn!("세션 토큰 검증 실패: {}", kind);
                SessionResolution::Invalid(kind)
            }
        }
    }

    /// 인증 모드에 따라 해석 결과를 판정합니다.
    ///
    /// * `Required` - 쿠키 없음은 `NotAuthenticated`, 검증 실패는 `TokenInvalid`
    /// * `Optional` - 실패를 모두 익명으로 처리
    pub fn authenticate(&self, request: &HttpRequest, mode: AuthMode) -> AppResult<Option<String>> {
        match (self.resolve(request), mode) {
            (SessionResolution::Authenticated(subject), _) => Ok(Some(subject)),
            (_, AuthMode::Optional) => Ok(None),
            (SessionResolution::Anonymous, AuthMode::Required) => Err(AppError::NotAuthenticated),
            (SessionResolution::Invalid(kind), AuthMode::Required) => {
                Err(AppError::TokenInvalid(kind))
            }
        }
    }

    /// OAuth state를 브라우저에 묶는 단기 쿠키
    pub fn state_cookie(&self, state: &str, max_age_seconds: u64) -> Cookie<'static> {
        Cookie::build(OAUTH_STATE_COOKIE, state.to_string())
            .path(OAUTH_STATE_COOKIE_PATH)
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .max_age(CookieDuration::seconds(max_age_seconds as i64))
            .finish()
    }

    pub fn state_removal_cookie(&self) -> Cookie<'static> {
        let mut cookie = Cookie::build(OAUTH_STATE_COOKIE, "")
            .path(OAUTH_STATE_COOKIE_PATH)
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .finish();
        cookie.make_removal();
        cookie
    }
}
