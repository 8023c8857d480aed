//! 테스트용 메모리 사용자 저장소
//!
//! MongoDB 유니크 인덱스와 같은 규칙(이메일, (provider, provider_id))을 적용합니다.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use super::{StoreError, UserStore};
use crate::config::AuthProvider;
use crate::domain::entities::users::user::{ProfileUpdate, User};

#[derive(Default)]
pub struct MemoryUserRepository {
    users: Mutex<HashMap<String, User>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, User>> {
        self.users.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }
}

fn violates_unique(existing: &User, candidate: &User) -> Option<&'static str> {
    if existing.id == candidate.id {
        return Some("_id");
    }
    if existing.email == candidate.email {
        return Some("email_unique");
    }
    if candidate.provider_id.is_some()
        && existing.provider == candidate.provider
        && existing.provider_id == candidate.provider_id
    {
        return Some("provider_identity_unique");
    }
    None
}

#[async_trait]
impl UserStore for MemoryUserRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.lock().get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.lock().values().find(|u| u.email == email).cloned())
    }

    async fn find_by_email_and_provider(
        &self,
        email: &str,
        provider: AuthProvider,
    ) -> Result<Option<User>, StoreError> {
        Ok(self
            .lock()
            .values()
            .find(|u| u.email == email && u.provider == provider)
            .cloned())
    }

    async fn find_by_provider_identity(
        &self,
        provider: AuthProvider,
        provider_id: &str,
    ) -> Result<Option<User>, StoreError> {
        Ok(self
            .lock()
            .values()
            .find(|u| u.provider == provider && u.provider_id.as_deref() == Some(provider_id))
            .cloned())
    }

    async fn insert(&self, user: &User) -> Result<(), StoreError> {
        let mut users = self.lock();
        if let Some(index) = users.values().find_map(|existing| violates_unique(existing, user)) {
            return Err(StoreError::UniqueViolation(index.to_string()));
        }
        users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn update_profile(
        &self,
        id: &str,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, StoreError> {
        let mut users = self.lock();
        if users.values().any(|u| u.id != id && u.email == update.email) {
            return Err(StoreError::UniqueViolation("email_unique".to_string()));
        }

        Ok(users.get_mut(id).map(|user| {
            user.apply(update);
            user.clone()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn test_email_uniqueness_across_providers() {
        let store = MemoryUserRepository::new();
        let local = User::new_local("a@x.com".into(), None, "hash".into());
        store.insert(&local).await.unwrap();

        let oauth = User::new_oauth("a@x.com".into(), None, None, AuthProvider::Google, "sub".into());
        assert!(matches!(
            store.insert(&oauth).await,
            Err(StoreError::UniqueViolation(_))
        ));
        assert_eq!(store.len(), 1);
    }

    #[actix_web::test]
    async fn test_provider_identity_uniqueness() {
        let store = MemoryUserRepository::new();
        let first = User::new_oauth("a@x.com".into(), None, None, AuthProvider::Discord, "42".into());
        store.insert(&first).await.unwrap();

        let same_identity =
            User::new_oauth("b@x.com".into(), None, None, AuthProvider::Discord, "42".into());
        assert!(store.insert(&same_identity).await.is_err());

        let other_provider =
            User::new_oauth("c@x.com".into(), None, None, AuthProvider::Google, "42".into());
        assert!(store.insert(&other_provider).await.is_ok());
    }
}
