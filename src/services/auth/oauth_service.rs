//! # OAuth 로그인 플로우
//!
//! ```text
//! GET /api/auth/{provider}/login
//!   └─ state 발급 → 저장소(TTL) + oauth_state 쿠키 → 302 인가 URL
//!
//! GET /api/auth/{provider}/callback?code&state
//!   ├─ error 쿼리 → AuthenticationError
//!   ├─ state == 쿠키 값 && 저장소에서 1회 소비(같은 provider) → 아니면 InvalidOAuthState
//!   ├─ code → token 교환 → 프로필 조회
//!   └─ UserService::upsert_oauth_user
//! ```

use std::sync::Arc;

use uuid::Uuid;

use crate::config::{AppConfig, AuthProvider};
use crate::core::errors::{AppError, AppResult};
use crate::domain::dto::users::request::OAuthCallbackQuery;
use crate::domain::entities::users::user::User;
use crate::repositories::oauth::OAuthStateStore;
use crate::services::auth::oauth::OAuthProviderRegistry;
use crate::services::users::UserService;

/// 로그인 시작 결과
#[derive(Debug, Clone)]
pub struct OAuthRedirect {
    /// 사용자를 보낼 프로바이더 인가 URL
    pub url: String,
    /// 브라우저 쿠키에 묶을 state
    pub state: String,
}

pub struct OAuthService {
    registry: OAuthProviderRegistry,
    states: Arc<dyn OAuthStateStore>,
    users: Arc<UserService>,
    public_base_url: String,
    state_ttl_seconds: u64,
}

impl OAuthService {
    pub fn new(
        config: &AppConfig,
        registry: OAuthProviderRegistry,
        states: Arc<dyn OAuthStateStore>,
        users: Arc<UserService>,
    ) -> Self {
        Self {
            registry,
            states,
            users,
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
            state_ttl_seconds: config.oauth.state_ttl_seconds(),
        }
    }

    pub fn state_ttl_seconds(&self) -> u64 {
        self.state_ttl_seconds
    }

    /// 프로바이더에 등록하는 콜백 주소
    pub fn callback_url(&self, provider: AuthProvider) -> String {
        format!("{}/api/auth/{}/callback", self.public_base_url, provider)
    }

    pub async fn begin_login(&self, tag: &str) -> AppResult<OAuthRedirect> {
        let provider = self.registry.get(tag)?;
        let state = Uuid::new_v4().simple().to_string();

        let url = provider
            .authorization_url(&self.callback_url(provider.provider()), &state)
            .await?;

        self.states
            .save(&state, provider.provider(), self.state_ttl_seconds)
            .await?;

        log::debug!("{} 로그인 시작", provider.provider());
        Ok(OAuthRedirect { url, state })
    }

    /// 콜백을 검증하고 사용자를 반환합니다.
    ///
    /// `cookie_state`는 로그인 시작 시 브라우저에 심은 `oauth_state` 쿠키 값입니다.
    pub async fn complete_login(
        &self,
        tag: &str,
        query: &OAuthCallbackQuery,
        cookie_state: Option<&str>,
    ) -> AppResult<User> {
        let provider = self.registry.get(tag)?;
        let provider_tag = provider.provider();

        if let Some(error) = query.error.as_deref() {
            log::warn!(
                "{} 인가 거부: {} ({})",
                provider_tag,
                error,
                query.error_description.as_deref().unwrap_or("-")
            );
            return Err(AppError::AuthenticationError(error.to_string()));
        }

        let state = query
            .state
            .as_deref()
            .filter(|state| !state.is_empty())
            .ok_or(AppError::InvalidOAuthState)?;

        if cookie_state != Some(state) {
            log::warn!("{} 콜백 state가 브라우저 쿠키와 다릅니다", provider_tag);
            return Err(AppError::InvalidOAuthState);
        }

        match self.states.take(state).await? {
            Some(issued_for) if issued_for == provider_tag => {}
            Some(issued_for) => {
                log::warn!("{}용 state가 {} 콜백에 사용됨", issued_for, provider_tag);
                return Err(AppError::InvalidOAuthState);
            }
            None => {
                log::warn!("{} 콜백 state가 만료되었거나 이미 사용됨", provider_tag);
                return Err(AppError::InvalidOAuthState);
            }
        }

        let code = query
            .code
            .as_deref()
            .filter(|code| !code.is_empty())
            .ok_or_else(|| AppError::AuthenticationError("missing authorization code".to_string()))?;

        let redirect_uri = self.callback_url(provider_tag);
        let token = provider.exchange_code(code, &redirect_uri).await?;
        let profile = provider.fetch_profile(&token).await?;

        self.users.upsert_oauth_user(profile).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{test_config, DiscordOAuthConfig, PasswordConfig};
    use crate::repositories::oauth::MemoryOAuthStateStore;
    use crate::repositories::users::memory_user_repo::MemoryUserRepository;
    use crate::repositories::users::UserStore;
    use crate::services::auth::oauth::{http_client, DiscordProvider};
    use crate::services::auth::password_service::PasswordService;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct Fixture {
        service: OAuthService,
        users: Arc<UserService>,
        store: Arc<MemoryUserRepository>,
        states: Arc<MemoryOAuthStateStore>,
    }

    fn fixture(server: &MockServer) -> Fixture {
        let config = test_config();
        let store = Arc::new(MemoryUserRepository::new());
        let states = Arc::new(MemoryOAuthStateStore::new());
        let passwords = PasswordService::new(&PasswordConfig { bcrypt_cost: 4 }).unwrap();
        let users = Arc::new(UserService::new(store.clone(), passwords));

        let mut registry = OAuthProviderRegistry::new();
        registry.register(Arc::new(DiscordProvider::new(
            DiscordOAuthConfig {
                client_id: "discord-client".to_string(),
                client_secret: "discord-secret".to_string(),
                authorize_url: format!("{}/oauth2/authorize", server.uri()),
                token_url: format!("{}/oauth2/token", server.uri()),
                api_base_url: format!("{}/api/v10", server.uri()),
                cdn_base_url: "https://cdn.discordapp.com".to_string(),
            },
            http_client(5).unwrap(),
        )));

        Fixture {
            service: OAuthService::new(&config, registry, states.clone(), users.clone()),
            users,
            store,
            states,
        }
    }

    async fn mount_discord(server: &MockServer, email: Option<&str>) {
        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "discord-access",
                "token_type": "Bearer",
                "expires_in": 604800,
                "scope": "identify email"
            })))
            .mount(server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/v10/users/@me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "80351110224678912",
                "username": "nelly",
                "email": email,
                "verified": true,
                "avatar": "abc"
            })))
            .mount(server)
            .await;
    }

    fn callback(code: &str, state: &str) -> OAuthCallbackQuery {
        OAuthCallbackQuery {
            code: Some(code.to_string()),
            state: Some(state.to_string()),
            ..Default::default()
        }
    }

    #[actix_web::test]
    async fn test_callback_url() {
        let server = MockServer::start().await;
        let f = fixture(&server);

        assert_eq!(
            f.service.callback_url(AuthProvider::Discord),
            "http://localhost:8080/api/auth/discord/callback"
        );
    }

    #[actix_web::test]
    async fn test_full_round_trip_creates_user() {
        let server = MockServer::start().await;
        mount_discord(&server, Some("d@x.com")).await;
        let f = fixture(&server);

        let redirect = f.service.begin_login("discord").await.unwrap();
        assert!(redirect.url.contains(&format!("state={}", redirect.state)));

        let user = f
            .service
            .complete_login("discord", &callback("code", &redirect.state), Some(&redirect.state))
            .await
            .unwrap();

        assert_eq!(user.email, "d@x.com");
        assert_eq!(user.provider, AuthProvider::Discord);
        assert!(user.is_verified);
        assert_eq!(f.store.len(), 1);

        // state는 한 번만 사용 가능
        let replay = f
            .service
            .complete_login("discord", &callback("code", &redirect.state), Some(&redirect.state))
            .await;
        assert!(matches!(replay, Err(AppError::InvalidOAuthState)));
    }

    #[actix_web::test]
    async fn test_state_must_match_cookie() {
        let server = MockServer::start().await;
        mount_discord(&server, Some("d@x.com")).await;
        let f = fixture(&server);

        let redirect = f.service.begin_login("discord").await.unwrap();

        for cookie in [None, Some("other-state")] {
            let result = f
                .service
                .complete_login("discord", &callback("code", &redirect.state), cookie)
                .await;
            assert!(matches!(result, Err(AppError::InvalidOAuthState)));
        }
        assert_eq!(f.store.len(), 0);
    }

    #[actix_web::test]
    async fn test_state_bound_to_provider() {
        let server = MockServer::start().await;
        let f = fixture(&server);

        f.states.save("google-state", AuthProvider::Google, 600).await.unwrap();

        let result = f
            .service
            .complete_login("discord", &callback("code", "google-state"), Some("google-state"))
            .await;
        assert!(matches!(result, Err(AppError::InvalidOAuthState)));
    }

    #[actix_web::test]
    async fn test_provider_error_query() {
        let server = MockServer::start().await;
        let f = fixture(&server);

        let query = OAuthCallbackQuery {
            error: Some("access_denied".to_string()),
            ..Default::default()
        };
        let result = f.service.complete_login("discord", &query, None).await;
        assert!(matches!(result, Err(AppError::AuthenticationError(_))));
    }

    #[actix_web::test]
    async fn test_unknown_provider() {
        let server = MockServer::start().await;
        let f = fixture(&server);

        assert!(matches!(
            f.service.begin_login("github").await,
            Err(AppError::UnsupportedProvider(_))
        ));
        assert!(matches!(
            f.service.begin_login("google").await,
            Err(AppError::UnsupportedProvider(_))
        ));
    }

    #[actix_web::test]
    async fn test_missing_email_creates_nothing() {
        let server = MockServer::start().await;
        mount_discord(&server, None).await;
        let f = fixture(&server);

        let redirect = f.service.begin_login("discord").await.unwrap();
        let result = f
            .service
            .complete_login("discord", &callback("code", &redirect.state), Some(&redirect.state))
            .await;

        assert!(matches!(result, Err(AppError::MissingEmail)));
        assert_eq!(f.store.len(), 0);
    }

    #[actix_web::test]
    async fn test_conflict_with_local_account() {
        let server = MockServer::start().await;
        mount_discord(&server, Some("a@x.com")).await;
        let f = fixture(&server);

        let local = f.users.register("a@x.com", "password123", None).await.unwrap();

        let redirect = f.service.begin_login("discord").await.unwrap();
        let result = f
            .service
            .complete_login("discord", &callback("code", &redirect.state), Some(&redirect.state))
            .await;

        assert!(matches!(result, Err(AppError::AccountConflict)));
        assert_eq!(f.store.len(), 1);
        assert_eq!(f.store.find_by_id(&local.id).await.unwrap().unwrap(), local);
    }
}
