//! # MongoDB 사용자 리포지토리
//!
//! - **컬렉션명**: `users`
//! - **문서 ID**: UUID v4 문자열 (`_id`)
//! - **인덱스**:
//!   - `email_unique` - email (unique)
//!   - `provider_identity_unique` - (provider, provider_id) unique, `provider_id`가 있는 문서만
//!   - `created_at_desc` - created_at 내림차순
//!
//! 유일성 검사는 조회 후 삽입이 아닌 유니크 인덱스에 맡기며,
//! 중복 키 에러(코드 11000)는 [`StoreError::UniqueViolation`]으로 변환됩니다.

use async_trait::async_trait;
use mongodb::bson::{doc, to_bson};
use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use mongodb::options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument};
use mongodb::{Collection, IndexModel};

use super::{StoreError, UserStore};
use crate::config::AuthProvider;
use crate::db::Database;
use crate::domain::entities::users::user::{ProfileUpdate, User};

const COLLECTION_NAME: &str = "users";
const DUPLICATE_KEY_CODE: i32 = 11000;

/// 사용자 데이터 액세스 리포지토리
#[derive(Clone)]
pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.get_database().collection::<User>(COLLECTION_NAME),
        }
    }

    /// 인덱스 생성
    ///
    /// 애플리케이션 시작 시 한 번 호출합니다. 이미 존재하는 인덱스는 무시됩니다.
    pub async fn create_indexes(&self) -> Result<(), StoreError> {
        // 이메일 유니크 인덱스
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("email_unique".to_string())
                    .build(),
            )
            .build();

        // 로컬 계정은 provider_id가 없으므로 부분 인덱스로 제한
        let provider_identity_index = IndexModel::builder()
            .keys(doc! { "provider": 1, "provider_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("provider_identity_unique".to_string())
                    .partial_filter_expression(doc! { "provider_id": { "$exists": true } })
                    .build(),
            )
            .build();

        // 생성일 인덱스
        let created_at_index = IndexModel::builder()
            .keys(doc! { "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("created_at_desc".to_string())
                    .build(),
            )
            .build();

        self.collection
            .create_indexes([email_index, provider_identity_index, created_at_index])
            .await
            .map_err(map_mongo_error)?;

        log::info!("users 컬렉션 인덱스 확인 완료");
        Ok(())
    }
}

#[async_trait]
impl UserStore for MongoUserRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        self.collection
            .find_one(doc! { "_id": id })
            .await
            .map_err(map_mongo_error)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.collection
            .find_one(doc! { "email": email })
            .await
            .map_err(map_mongo_error)
    }

    async fn find_by_email_and_provider(
        &self,
        email: &str,
        provider: AuthProvider,
    ) -> Result<Option<User>, StoreError> {
        self.collection
            .find_one(doc! { "email": email, "provider": provider.as_str() })
            .await
            .map_err(map_mongo_error)
    }

    async fn find_by_provider_identity(
        &self,
        provider: AuthProvider,
        provider_id: &str,
    ) -> Result<Option<User>, StoreError> {
        self.collection
            .find_one(doc! { "provider": provider.as_str(), "provider_id": provider_id })
            .await
            .map_err(map_mongo_error)
    }

    async fn insert(&self, user: &User) -> Result<(), StoreError> {
        self.collection
            .insert_one(user)
            .await
            .map_err(map_mongo_error)?;
        Ok(())
    }

    async fn update_profile(
        &self,
        id: &str,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, StoreError> {
        // created_at과 같은 직렬화 형식을 쓰도록 serde를 거칩니다.
        let updated_at =
            to_bson(&update.updated_at).map_err(|e| StoreError::Backend(e.to_string()))?;

        let mut set = doc! {
            "email": update.email.as_str(),
            "updated_at": updated_at,
        };
        let mut unset = doc! {};

        match &update.name {
            Some(name) => {
                set.insert("name", name.as_str());
            }
            None => {
                unset.insert("name", "");
            }
        }
        match &update.avatar_url {
            Some(avatar_url) => {
                set.insert("avatar_url", avatar_url.as_str());
            }
            None => {
                unset.insert("avatar_url", "");
            }
        }

        let mut change = doc! { "$set": set };
        if !unset.is_empty() {
            change.insert("$unset", unset);
        }

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        self.collection
            .find_one_and_update(doc! { "_id": id }, change)
            .with_options(options)
            .await
            .map_err(map_mongo_error)
    }
}

/// MongoDB 에러를 저장소 에러로 변환합니다.
fn map_mongo_error(err: MongoError) -> StoreError {
    if is_duplicate_key(&err) {
        StoreError::UniqueViolation(err.to_string())
    } else {
        StoreError::Backend(err.to_string())
    }
}

/// insert는 WriteError, findAndModify는 CommandError로 중복 키를 보고합니다.
fn is_duplicate_key(err: &MongoError) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
            write_error.code == DUPLICATE_KEY_CODE
        }
        ErrorKind::Command(command_error) => command_error.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}
