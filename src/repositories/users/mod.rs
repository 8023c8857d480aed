//! 사용자 저장소
//!
//! 유일성 불변 조건(이메일, (provider, provider_id))은 저장소가 최종적으로 보장하며,
//! 위반 시 [`StoreError::UniqueViolation`]을 반환합니다. 호출자는 이를 상황에 맞는
//! 도메인 에러(`DuplicateEmail`, `AccountConflict`)로 변환합니다.
//!
//! ```rust,ignore
//! let store: Arc<dyn UserStore> = Arc::new(MongoUserRepository::new(&database));
//! let user = store.find_by_email("a@x.com").await?;
//! ```

pub mod user_repo;
#[cfg(test)]
pub mod memory_user_repo;

pub use user_repo::MongoUserRepository;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::AuthProvider;
use crate::domain::entities::users::user::{ProfileUpdate, User};

/// 저장소 에러
#[derive(Debug, Error)]
pub enum StoreError {
    /// 유니크 인덱스 위반 (인덱스 이름 또는 원본 메시지)
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("store backend error: {0}")]
    Backend(String),
}

/// 사용자 영속화 추상화
///
/// 모든 쓰기는 단일 문서 원자 연산입니다.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, StoreError>;

    /// 인증 방식과 관계없이 이메일로 조회 (이메일은 정규화된 값이어야 함)
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_email_and_provider(
        &self,
        email: &str,
        provider: AuthProvider,
    ) -> Result<Option<User>, StoreError>;

    async fn find_by_provider_identity(
        &self,
        provider: AuthProvider,
        provider_id: &str,
    ) -> Result<Option<User>, StoreError>;

    /// 새 사용자 저장. 유일성 위반 시 `UniqueViolation`
    async fn insert(&self, user: &User) -> Result<(), StoreError>;

    /// 표시 정보와 이메일을 갱신하고 갱신된 문서를 반환합니다.
    ///
    /// 대상이 없으면 `Ok(None)`, 이메일 변경이 다른 계정과 충돌하면 `UniqueViolation`
    async fn update_profile(
        &self,
        id: &str,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, StoreError>;
}
