//! # OAuth state 저장소 구현
//!
//! state 원문은 저장하지 않고 SHA-256 다이제스트를 키로 사용합니다.
//! 키 형식: `oauth_state:{hex(sha256(state))}`

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::caching::redis::RedisClient;
use crate::config::AuthProvider;
use crate::core::errors::{AppError, AppResult};

/// 발급된 state에 묶인 정보
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PendingState {
    provider: AuthProvider,
    issued_at: DateTime<Utc>,
}

impl PendingState {
    fn consume(self) -> AuthProvider {
        log::debug!(
            "OAuth state 소비: provider={}, 발급 후 {}초",
            self.provider,
            (Utc::now() - self.issued_at).num_seconds()
        );
        self.provider
    }
}

/// state 저장소 추상화
#[async_trait]
pub trait OAuthStateStore: Send + Sync {
    /// state를 TTL과 함께 저장합니다.
    async fn save(&self, state: &str, provider: AuthProvider, ttl_seconds: u64) -> AppResult<()>;

    /// state를 원자적으로 꺼내고 삭제합니다. 없거나 만료되었으면 `None`
    async fn take(&self, state: &str) -> AppResult<Option<AuthProvider>>;
}

pub fn state_key(state: &str) -> String {
    format!("oauth_state:{:x}", Sha256::digest(state.as_bytes()))
}

/// Redis 기반 구현 (다중 인스턴스 배포용)
pub struct RedisOAuthStateStore {
    redis: RedisClient,
}

impl RedisOAuthStateStore {
    pub fn new(redis: RedisClient) -> Self {
        Self { redis }
    }
}

#[async_trait]
impl OAuthStateStore for RedisOAuthStateStore {
    async fn save(&self, state: &str, provider: AuthProvider, ttl_seconds: u64) -> AppResult<()> {
        let entry = PendingState {
            provider,
            issued_at: Utc::now(),
        };

        self.redis
            .set_with_expiry(&state_key(state), &entry, ttl_seconds)
            .await
            .map_err(|e| AppError::CacheError(e.to_string()))
    }

    async fn take(&self, state: &str) -> AppResult<Option<AuthProvider>> {
        let entry: Option<PendingState> = self
            .redis
            .get_del(&state_key(state))
            .await
            .map_err(|e| AppError::CacheError(e.to_string()))?;

        Ok(entry.map(PendingState::consume))
    }
}

/// 프로세스 메모리 기반 구현
///
/// 인스턴스 간에 공유되지 않으므로 단일 노드 개발 환경에서만 사용합니다.
#[derive(Default)]
pub struct MemoryOAuthStateStore {
    entries: Mutex<HashMap<String, (PendingState, Instant)>>,
}

impl MemoryOAuthStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, (PendingState, Instant)>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl OAuthStateStore for MemoryOAuthStateStore {
    async fn save(&self, state: &str, provider: AuthProvider, ttl_seconds: u64) -> AppResult<()> {
        let now = Instant::now();
        let mut entries = self.lock();

        // 만료된 항목 정리
        entries.retain(|_, (_, expires_at)| *expires_at > now);

        let entry = PendingState {
            provider,
            issued_at: Utc::now(),
        };
        entries.insert(
            state_key(state),
            (entry, now + Duration::from_secs(ttl_seconds)),
        );
        Ok(())
    }

    async fn take(&self, state: &str) -> AppResult<Option<AuthProvider>> {
        let removed = self.lock().remove(&state_key(state));

        Ok(removed
            .filter(|(_, expires_at)| *expires_at > Instant::now())
            .map(|(entry, _)| entry.consume()))
    }
}
