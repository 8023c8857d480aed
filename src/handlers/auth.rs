//! 인증 API 핸들러 (`/api/auth`)
//!
//! | 메서드 | 경로 | 인증 | 응답 |
//! |--------|------|------|------|
//! | POST | `/register` | - | `UserResponse` |
//! | POST | `/login` | - | `UserResponse` + 세션 쿠키 |
//! | GET | `/{provider}/login` | - | 302 인가 URL + `oauth_state` 쿠키 |
//! | GET | `/{provider}/callback` | - | 302 `FRONTEND_URL` + 세션 쿠키 |
//! | GET | `/me` | 필수 | `UserResponse` |
//! | POST | `/logout` | 선택 | `{"detail": "Logged out"}` + 쿠키 제거 |

use actix_web::http::header;
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use validator::Validate;

use crate::core::errors::{AppError, AppResult, ErrorContext};
use crate::core::AppState;
use crate::domain::auth::{AuthenticatedUser, OptionalUser};
use crate::domain::dto::users::request::{LoginRequest, OAuthCallbackQuery, RegisterRequest};
use crate::domain::dto::users::response::{MessageResponse, UserResponse};
use crate::middlewares::AuthMiddleware;
use crate::services::auth::session_service::OAUTH_STATE_COOKIE;

#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    payload: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let RegisterRequest {
        email,
        password,
        name,
    } = payload.into_inner();

    let user = state.users.register(&email, &password, name).await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    payload: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let user = state.users.login(&payload.email, &payload.password).await?;

    let mut response = HttpResponse::Ok().json(UserResponse::from(user.clone()));
    state.sessions.attach(&mut response, &user.id)?;

    Ok(response)
}

/// 프로바이더 인가 페이지로 리다이렉트합니다.
#[get("/{provider}/login")]
pub async fn oauth_login(
    state: web::Data<AppState>,
    provider: web::Path<String>,
) -> AppResult<HttpResponse> {
    let redirect = state.oauth.begin_login(&provider).await?;

    let state_cookie = state
        .sessions
        .state_cookie(&redirect.state, state.oauth.state_ttl_seconds());

    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, redirect.url))
        .cookie(state_cookie)
        .finish())
}

/// 프로바이더 콜백. 성공하면 세션 쿠키와 함께 프론트엔드로 리다이렉트합니다.
#[get("/{provider}/callback")]
pub async fn oauth_callback(
    req: HttpRequest,
    state: web::Data<AppState>,
    provider: web::Path<String>,
    query: web::Query<OAuthCallbackQuery>,
) -> AppResult<HttpResponse> {
    let cookie_state = req.cookie(OAUTH_STATE_COOKIE);
    let user = state
        .oauth
        .complete_login(&provider, &query, cookie_state.as_ref().map(|c| c.value()))
        .await?;

    let mut response = HttpResponse::Found()
        .insert_header((header::LOCATION, state.config.frontend_url.as_str()))
        .finish();
    response
        .add_cookie(&state.sessions.state_removal_cookie())
        .context("state 쿠키 제거 실패")?;
    state.sessions.attach(&mut response, &user.id)?;

    Ok(response)
}

#[get("/me", wrap = "AuthMiddleware::required()")]
pub async fn get_current_user(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> AppResult<HttpResponse> {
    let current = state
        .users
        .find_by_id(&user.user_id)
        .await?
        .ok_or_else(|| {
            log::warn!("세션 주체에 해당하는 사용자가 없습니다: {}", user.user_id);
            AppError::NotAuthenticated
        })?;

    Ok(HttpResponse::Ok().json(UserResponse::from(current)))
}

/// 익명 호출도 허용하며 항상 세션 쿠키를 제거합니다.
#[post("/logout", wrap = "AuthMiddleware::optional()")]
pub async fn logout(state: web::Data<AppState>, user: OptionalUser) -> AppResult<HttpResponse> {
    if let Some(user) = user.0 {
        log::info!("로그아웃: {}", user.user_id);
    }

    let mut response = HttpResponse::Ok().json(MessageResponse::new("Logged out"));
    state.sessions.detach(&mut response)?;

    Ok(response)
}
