//! # 사용자 서비스
//!
//! 로컬 자격 증명 또는 OAuth 프로필을 영속 사용자로 해석합니다.
//!
//! ## 계정 정책
//!
//! - 계정 하나에는 인증 방식이 하나뿐입니다. 다른 방식으로 가입된 이메일로
//!   OAuth 계정을 만들려 하면 `AccountConflict`가 되며 자동 연동은 하지 않습니다.
//! - 로그인 실패는 원인(계정 없음, OAuth 전용 계정, 비밀번호 불일치)과 관계없이
//!   같은 `InvalidCredentials`이며, 계정이 없을 때도 더미 해시로 검증 비용을 맞춥니다.
//! - 유일성은 저장소 유니크 인덱스가 최종 보장합니다. 사전 조회와 삽입 사이의
//!   경쟁에서 발생한 위반은 도메인 에러로 변환됩니다.
//!
//! bcrypt 연산은 `web::block`으로 워커 스레드 밖에서 실행합니다.

use std::sync::Arc;

use actix_web::web;
use chrono::Utc;

use crate::config::AuthProvider;
use crate::core::errors::{AppError, AppResult, ErrorContext};
use crate::domain::entities::users::user::{ProfileUpdate, User};
use crate::domain::oauth::OAuthProfile;
use crate::repositories::users::{StoreError, UserStore};
use crate::services::auth::password_service::PasswordService;
use crate::utils::string_utils::{mask_email, normalize_email};

pub struct UserService {
    store: Arc<dyn UserStore>,
    passwords: PasswordService,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>, passwords: PasswordService) -> Self {
        Self { store, passwords }
    }

    /// 이메일/비밀번호 회원가입
    ///
    /// # Errors
    ///
    /// * `DuplicateEmail` - 인증 방식과 관계없이 이미 사용 중인 이메일
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: Option<String>,
    ) -> AppResult<User> {
        let email = normalize_email(email);

        if self.store.find_by_email(&email).await?.is_some() {
            log::warn!("중복 이메일 가입 시도: {}", mask_email(&email));
            return Err(AppError::DuplicateEmail);
        }

        let hashed_password = self.hash_password(password).await?;
        let user = User::new_local(email, name, hashed_password);

        match self.store.insert(&user).await {
            Ok(()) => {
                log::info!("새 사용자 등록: {} ({})", user.id, mask_email(&user.email));
                Ok(user)
            }
            Err(StoreError::UniqueViolation(_)) => {
                log::warn!("동시 가입 경합으로 중복 이메일: {}", mask_email(&user.email));
                Err(AppError::DuplicateEmail)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// 이메일/비밀번호 로그인
    ///
    /// # Errors
    ///
    /// * `InvalidCredentials` - 실패 원인을 구분하지 않음
    pub async fn login(&self, email: &str, password: &str) -> AppResult<User> {
        let email = normalize_email(email);
        let user = self
            .store
            .find_by_email_and_provider(&email, AuthProvider::Email)
            .await?;

        let digest = user
            .as_ref()
            .filter(|u| u.can_authenticate_with_password())
            .and_then(|u| u.hashed_password.clone());
        let passwords = self.passwords.clone();
        let password = password.to_string();

        let verified = web::block(move || match digest {
            Some(digest) => passwords.verify(&password, &digest),
            None => {
                passwords.verify_dummy(&password);
                false
            }
        })
        .await
        .context("비밀번호 검증 작업 실패")?;

        match user {
            Some(user) if verified => {
                log::info!("로그인 성공: {}", user.id);
                Ok(user)
            }
            _ => {
                log::warn!("로그인 실패: {}", mask_email(&email));
                Err(AppError::InvalidCredentials)
            }
        }
    }

    /// OAuth 프로필을 사용자로 해석합니다.
    ///
    /// 1. (provider, provider_id)로 기존 계정을 찾으면 이메일/이름/아바타를 갱신
    /// 2. 없으면 같은 이메일의 다른 계정이 있는지 확인 (`AccountConflict`)
    /// 3. 새 계정 생성 (`is_verified = true`)
    ///
    /// # Errors
    ///
    /// * `MissingEmail` - 프로바이더가 이메일을 주지 않음
    /// * `AccountConflict` - 이메일이 다른 계정에 속함
    pub async fn upsert_oauth_user(&self, profile: OAuthProfile) -> AppResult<User> {
        let email = profile
            .email
            .as_deref()
            .map(normalize_email)
            .filter(|email| !email.is_empty())
            .ok_or(AppError::MissingEmail)?;

        if let Some(existing) = self
            .store
            .find_by_provider_identity(profile.provider, &profile.provider_user_id)
            .await?
        {
            return self.refresh_profile(existing, email, profile).await;
        }

        if let Some(owner) = self.store.find_by_email(&email).await? {
            log::warn!(
                "계정 충돌: {} 이메일이 이미 {} 계정에 등록됨 (시도: {})",
                mask_email(&email),
                owner.provider,
                profile.provider
            );
            return Err(AppError::AccountConflict);
        }

        let provider = profile.provider;
        let provider_user_id = profile.provider_user_id.clone();
        let user = User::new_oauth(
            email,
            profile.name,
            profile.avatar_url,
            provider,
            profile.provider_user_id,
        );

        match self.store.insert(&user).await {
            Ok(()) => {
                log::info!("새 {} 사용자 등록: {}", provider, user.id);
                Ok(user)
            }
            Err(StoreError::UniqueViolation(index)) => {
                // 같은 계정의 동시 콜백이면 먼저 생성된 계정을 사용
                if let Some(winner) = self
                    .store
                    .find_by_provider_identity(provider, &provider_user_id)
                    .await?
                {
                    return Ok(winner);
                }
                log::warn!("OAuth 계정 생성 중 유일성 위반: {}", index);
                Err(AppError::AccountConflict)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        Ok(self.store.find_by_id(id).await?)
    }

    async fn refresh_profile(
        &self,
        existing: User,
        email: String,
        profile: OAuthProfile,
    ) -> AppResult<User> {
        let update = ProfileUpdate {
            email,
            name: profile.name,
            avatar_url: profile.avatar_url,
            updated_at: Utc::now(),
        };

        match self.store.update_profile(&existing.id, &update).await {
            Ok(Some(user)) => {
                log::info!("{} 사용자 로그인: {}", user.provider, user.id);
                Ok(user)
            }
            Ok(None) => Err(AppError::InternalError(format!(
                "갱신 대상 사용자가 없습니다: {}",
                existing.id
            ))),
            Err(StoreError::UniqueViolation(_)) => {
                log::warn!(
                    "계정 충돌: {} 사용자의 새 이메일 {}이(가) 다른 계정에 등록됨",
                    existing.id,
                    mask_email(&update.email)
                );
                Err(AppError::AccountConflict)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn hash_password(&self, password: &str) -> AppResult<String> {
        let passwords = self.passwords.clone();
        let password = password.to_string();

        web::block(move || passwords.hash(&password))
            .await
            .context("비밀번호 해싱 작업 실패")?
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use futures_util::future::join;

    use super::*;
    use crate::config::PasswordConfig;
    use crate::repositories::users::memory_user_repo::MemoryUserRepository;

    /// 사전 조회와 삽입 사이에 다른 요청이 끼어든 상황을 재현하는 저장소
    ///
    /// 이메일 조회는 항상 비어 있고, 처음 `stale_identity_lookups`번의
    /// (provider, provider_id) 조회도 비어 있습니다. 쓰기는 유니크 규칙을 그대로 적용합니다.
    struct RacingStore {
        inner: MemoryUserRepository,
        stale_identity_lookups: AtomicUsize,
    }

    impl RacingStore {
        fn new(stale_identity_lookups: usize) -> Self {
            Self {
                inner: MemoryUserRepository::new(),
                stale_identity_lookups: AtomicUsize::new(stale_identity_lookups),
            }
        }
    }

    #[async_trait]
    impl UserStore for RacingStore {
        async fn find_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
            self.inner.find_by_id(id).await
        }

        async fn find_by_email(&self, _email: &str) -> Result<Option<User>, StoreError> {
            Ok(None)
        }

        async fn find_by_email_and_provider(
            &self,
            email: &str,
            provider: AuthProvider,
        ) -> Result<Option<User>, StoreError> {
            self.inner.find_by_email_and_provider(email, provider).await
        }

        async fn find_by_provider_identity(
            &self,
            provider: AuthProvider,
            provider_id: &str,
        ) -> Result<Option<User>, StoreError> {
            let stale = self
                .stale_identity_lookups
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if stale {
                return Ok(None);
            }
            self.inner.find_by_provider_identity(provider, provider_id).await
        }

        async fn insert(&self, user: &User) -> Result<(), StoreError> {
            self.inner.insert(user).await
        }

        async fn update_profile(
            &self,
            id: &str,
            update: &ProfileUpdate,
        ) -> Result<Option<User>, StoreError> {
            self.inner.update_profile(id, update).await
        }
    }

    fn racing_service(stale_identity_lookups: usize) -> (UserService, Arc<RacingStore>) {
        let store = Arc::new(RacingStore::new(stale_identity_lookups));
        let passwords = PasswordService::new(&PasswordConfig { bcrypt_cost: 4 }).unwrap();
        (UserService::new(store.clone(), passwords), store)
    }

    fn service() -> (UserService, Arc<MemoryUserRepository>) {
        let store = Arc::new(MemoryUserRepository::new());
        let passwords = PasswordService::new(&PasswordConfig { bcrypt_cost: 4 }).unwrap();
        (UserService::new(store.clone(), passwords), store)
    }

    fn profile(provider: AuthProvider, id: &str, email: Option<&str>) -> OAuthProfile {
        OAuthProfile {
            provider,
            provider_user_id: id.to_string(),
            email: email.map(str::to_string),
            name: Some("Name".to_string()),
            avatar_url: None,
        }
    }

    #[actix_web::test]
    async fn test_register_then_login() {
        let (service, _) = service();
        let registered = service
            .register("a@x.com", "password123", Some("A".to_string()))
            .await
            .unwrap();

        assert_eq!(registered.provider, AuthProvider::Email);
        assert!(!registered.is_verified);
        assert_ne!(registered.hashed_password.as_deref(), Some("password123"));

        let logged_in = service.login("a@x.com", "password123").await.unwrap();
        assert_eq!(logged_in.id, registered.id);
    }

    #[actix_web::test]
    async fn test_duplicate_email_any_case() {
        let (service, store) = service();
        service.register("a@x.com", "password123", None).await.unwrap();

        for email in ["a@x.com", "A@X.COM", "  a@X.com "] {
            assert!(matches!(
                service.register(email, "password123", None).await,
                Err(AppError::DuplicateEmail)
            ));
        }
        assert_eq!(store.len(), 1);
    }

    #[actix_web::test]
    async fn test_login_failures_are_indistinguishable() {
        let (service, _) = service();
        service.register("a@x.com", "password123", None).await.unwrap();
        service
            .upsert_oauth_user(profile(AuthProvider::Google, "g-1", Some("g@x.com")))
            .await
            .unwrap();

        let wrong_password = service.login("a@x.com", "wrong-password").await.unwrap_err();
        let unknown_email = service.login("nobody@x.com", "password123").await.unwrap_err();
        let oauth_only = service.login("g@x.com", "password123").await.unwrap_err();

        for error in [&wrong_password, &unknown_email, &oauth_only] {
            assert!(matches!(error, AppError::InvalidCredentials));
            assert_eq!(error.to_string(), wrong_password.to_string());
        }
    }

    #[actix_web::test]
    async fn test_login_is_case_insensitive() {
        let (service, _) = service();
        service.register("Mixed@X.com", "password123", None).await.unwrap();

        assert!(service.login("mixed@x.COM", "password123").await.is_ok());
    }

    #[actix_web::test]
    async fn test_oauth_new_identity() {
        let (service, store) = service();
        let user = service
            .upsert_oauth_user(profile(AuthProvider::Discord, "42", Some("D@x.com")))
            .await
            .unwrap();

        assert_eq!(user.email, "d@x.com");
        assert!(user.is_verified);
        assert!(user.hashed_password.is_none());
        assert_eq!(user.provider_id.as_deref(), Some("42"));
        assert_eq!(store.len(), 1);
    }

    #[actix_web::test]
    async fn test_oauth_existing_identity_is_refreshed() {
        let (service, store) = service();
        let created = service
            .upsert_oauth_user(profile(AuthProvider::Google, "g-1", Some("old@x.com")))
            .await
            .unwrap();

        let mut changed = profile(AuthProvider::Google, "g-1", Some("new@x.com"));
        changed.name = Some("New Name".to_string());
        changed.avatar_url = Some("https://img/new.png".to_string());

        let refreshed = service.upsert_oauth_user(changed).await.unwrap();

        assert_eq!(refreshed.id, created.id);
        assert_eq!(refreshed.email, "new@x.com");
        assert_eq!(refreshed.name.as_deref(), Some("New Name"));
        assert_eq!(refreshed.avatar_url.as_deref(), Some("https://img/new.png"));
        assert_eq!(refreshed.created_at, created.created_at);
        assert_eq!(store.len(), 1);
    }

    #[actix_web::test]
    async fn test_oauth_email_owned_by_other_method_conflicts() {
        let (service, store) = service();
        let local = service.register("a@x.com", "password123", None).await.unwrap();

        let result = service
            .upsert_oauth_user(profile(AuthProvider::Google, "g-1", Some("A@x.com")))
            .await;

        assert!(matches!(result, Err(AppError::AccountConflict)));
        assert_eq!(store.len(), 1);
        let untouched = store.find_by_id(&local.id).await.unwrap().unwrap();
        assert_eq!(untouched, local);
    }

    #[actix_web::test]
    async fn test_oauth_email_owned_by_other_provider_conflicts() {
        let (service, store) = service();
        service
            .upsert_oauth_user(profile(AuthProvider::Discord, "42", Some("a@x.com")))
            .await
            .unwrap();

        let result = service
            .upsert_oauth_user(profile(AuthProvider::Google, "g-1", Some("a@x.com")))
            .await;

        assert!(matches!(result, Err(AppError::AccountConflict)));
        assert_eq!(store.len(), 1);
    }

    #[actix_web::test]
    async fn test_oauth_missing_email() {
        let (service, store) = service();

        for email in [None, Some("   ")] {
            let result = service
                .upsert_oauth_user(profile(AuthProvider::Discord, "42", email))
                .await;
            assert!(matches!(result, Err(AppError::MissingEmail)));
        }
        assert_eq!(store.len(), 0);
    }

    #[actix_web::test]
    async fn test_register_unique_violation_is_duplicate_email() {
        let (service, store) = racing_service(0);
        let existing = User::new_local("a@x.com".into(), None, "hash".into());
        store.inner.insert(&existing).await.unwrap();

        let result = service.register("A@x.com", "password123", None).await;

        assert!(matches!(result, Err(AppError::DuplicateEmail)));
        assert_eq!(store.inner.len(), 1);
    }

    #[actix_web::test]
    async fn test_oauth_insert_race_returns_winner() {
        let (service, store) = racing_service(1);
        let winner = User::new_oauth(
            "g@x.com".into(),
            None,
            None,
            AuthProvider::Google,
            "g-1".into(),
        );
        store.inner.insert(&winner).await.unwrap();

        let resolved = service
            .upsert_oauth_user(profile(AuthProvider::Google, "g-1", Some("g@x.com")))
            .await
            .unwrap();

        assert_eq!(resolved.id, winner.id);
        assert_eq!(store.inner.len(), 1);
    }

    #[actix_web::test]
    async fn test_oauth_insert_email_violation_conflicts() {
        let (service, store) = racing_service(0);
        let local = User::new_local("a@x.com".into(), None, "hash".into());
        store.inner.insert(&local).await.unwrap();

        let result = service
            .upsert_oauth_user(profile(AuthProvider::Google, "g-1", Some("a@x.com")))
            .await;

        assert!(matches!(result, Err(AppError::AccountConflict)));
        assert_eq!(store.inner.len(), 1);
        assert_eq!(store.inner.find_by_id(&local.id).await.unwrap(), Some(local));
    }

    #[actix_web::test]
    async fn test_oauth_refresh_email_collision_conflicts() {
        let (service, store) = racing_service(0);
        let oauth = User::new_oauth(
            "old@x.com".into(),
            None,
            None,
            AuthProvider::Discord,
            "42".into(),
        );
        let local = User::new_local("taken@x.com".into(), None, "hash".into());
        store.inner.insert(&oauth).await.unwrap();
        store.inner.insert(&local).await.unwrap();

        let result = service
            .upsert_oauth_user(profile(AuthProvider::Discord, "42", Some("taken@x.com")))
            .await;

        assert!(matches!(result, Err(AppError::AccountConflict)));
        assert_eq!(store.inner.len(), 2);
        assert_eq!(store.inner.find_by_id(&oauth.id).await.unwrap(), Some(oauth));
    }

    #[actix_web::test]
    async fn test_concurrent_callbacks_for_same_identity() {
        let (service, store) = service();

        let (first, second) = join(
            service.upsert_oauth_user(profile(AuthProvider::Google, "g-1", Some("g@x.com"))),
            service.upsert_oauth_user(profile(AuthProvider::Google, "g-1", Some("g@x.com"))),
        )
        .await;

        assert_eq!(first.unwrap().id, second.unwrap().id);
        assert_eq!(store.len(), 1);
    }
}
