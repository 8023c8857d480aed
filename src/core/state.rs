//! 애플리케이션 상태
//!
//! 시작 시 한 번 조립되어 `web::Data<AppState>`로 핸들러와 미들웨어에 공유됩니다.
//! 모든 필드는 읽기 전용이며, 내부에서 변경되는 것은 저장소 연결 풀과
//! 한 번만 기록되는 OIDC discovery 캐시뿐입니다.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::core::errors::AppResult;
use crate::repositories::oauth::OAuthStateStore;
use crate::repositories::users::UserStore;
use crate::services::auth::{
    OAuthProviderRegistry, OAuthService, PasswordService, SessionService, TokenService,
};
use crate::services::users::UserService;

pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<UserService>,
    pub tokens: Arc<TokenService>,
    pub sessions: SessionService,
    pub oauth: OAuthService,
}

impl AppState {
    /// 설정에 있는 프로바이더로 레지스트리를 만들어 상태를 조립합니다.
    pub fn new(
        config: AppConfig,
        user_store: Arc<dyn UserStore>,
        state_store: Arc<dyn OAuthStateStore>,
    ) -> AppResult<Self> {
        let registry = OAuthProviderRegistry::from_config(&config)?;
        Self::with_registry(config, user_store, state_store, registry)
    }

    pub fn with_registry(
        config: AppConfig,
        user_store: Arc<dyn UserStore>,
        state_store: Arc<dyn OAuthStateStore>,
        registry: OAuthProviderRegistry,
    ) -> AppResult<Self> {
        let passwords = PasswordService::new(&config.password)?;
        let tokens = Arc::new(TokenService::new(&config.jwt));
        let sessions = SessionService::new(tokens.clone(), config.secure_cookies());
        let users = Arc::new(UserService::new(user_store, passwords));
        let oauth = OAuthService::new(&config, registry, state_store, users.clone());

        Ok(Self {
            config: Arc::new(config),
            users,
            tokens,
            sessions,
            oauth,
        })
    }
}

/// 테스트용 상태 (메모리 state 저장소, 디버그 설정)
#[cfg(test)]
pub(crate) fn test_state(
    user_store: Arc<dyn UserStore>,
    registry: OAuthProviderRegistry,
) -> AppState {
    use crate::repositories::oauth::MemoryOAuthStateStore;

    AppState::with_registry(
        crate::config::test_config(),
        user_store,
        Arc::new(MemoryOAuthStateStore::new()),
        registry,
    )
    .expect("test state")
}
