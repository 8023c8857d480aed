//! User Entity Implementation
//!
//! 사용자 엔티티의 핵심 구현체입니다.
//! 하나의 계정은 정확히 하나의 인증 방식(이메일/비밀번호 또는 OAuth 프로바이더 하나)을 가집니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AuthProvider;

/// 사용자 엔티티
///
/// ## 불변 조건
///
/// - `email`은 인증 방식과 관계없이 전역 유일 (저장소 유니크 인덱스)
/// - (`provider`, `provider_id`)는 OAuth 계정에서 전역 유일
/// - `provider == Email` ⇔ `hashed_password` 존재, `provider_id` 없음
/// - `id`, `provider`는 생성 후 변경되지 않음
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// 불투명 식별자 (UUID v4 문자열)
    #[serde(rename = "_id")]
    pub id: String,
    /// 정규화된(소문자) 이메일
    pub email: String,
    /// 표시 이름
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// 프로필 이미지 URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// 가입 시 결정된 인증 프로바이더
    pub provider: AuthProvider,
    /// OAuth 프로바이더에서의 사용자 ID (로컬 계정은 None)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
    /// bcrypt 해시 (OAuth 계정은 None)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hashed_password: Option<String>,
    /// 이메일 인증 여부 (OAuth 계정은 생성 시 true)
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// 새 로컬 사용자 생성 (이메일/패스워드)
    ///
    /// 이메일 인증 전 상태로 시작합니다.
    pub fn new_local(email: String, name: Option<String>, hashed_password: String) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4().to_string(),
            email,
            name,
            avatar_url: None,
            provider: AuthProvider::Email,
            provider_id: None,
            hashed_password: Some(hashed_password),
            is_verified: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// 새 OAuth 사용자 생성
    ///
    /// 프로바이더가 이미 이메일을 확인했으므로 인증 완료 상태로 시작합니다.
    pub fn new_oauth(
        email: String,
        name: Option<String>,
        avatar_url: Option<String>,
        provider: AuthProvider,
        provider_id: String,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4().to_string(),
            email,
            name,
            avatar_url,
            provider,
            provider_id: Some(provider_id),
            hashed_password: None,
            is_verified: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// 비밀번호 인증이 가능한 사용자인지 확인
    pub fn can_authenticate_with_password(&self) -> bool {
        self.provider == AuthProvider::Email && self.hashed_password.is_some()
    }

    /// 프로필 갱신 내용을 적용합니다.
    pub fn apply(&mut self, update: &ProfileUpdate) {
        self.email = update.email.clone();
        self.name = update.name.clone();
        self.avatar_url = update.avatar_url.clone();
        self.updated_at = update.updated_at;
    }
}

/// OAuth 재로그인 시 프로바이더 정보로 덮어쓰는 변경 가능한 필드
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileUpdate {
    pub email: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}
