//! # Redis 클라이언트
//!
//! `ConnectionManager`로 단일 멀티플렉싱 연결을 공유하며 끊기면 자동으로 재연결합니다.
//! 값은 JSON 문자열로 저장합니다.

use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, ErrorKind, RedisError};
use serde::{Serialize, de::DeserializeOwned};

#[derive(Clone)]
pub struct RedisClient {
    connection: ConnectionManager,
}

impl RedisClient {
    /// 연결을 열고 PING으로 서버 가용성을 확인합니다.
    pub async fn new(redis_url: &str) -> Result<Self, RedisError> {
        let client = Client::open(redis_url)?;
        let mut connection = ConnectionManager::new(client).await?;

        redis::cmd("PING").query_async::<()>(&mut connection).await?;

        log::info!("✅ Redis 연결 성공");

        Ok(Self { connection })
    }

    /// TTL(초)과 함께 값을 저장합니다. (`SET key value EX seconds`)
    pub async fn set_with_expiry<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        seconds: u64,
    ) -> Result<(), RedisError> {
        let json = serde_json::to_string(value).map_err(|e| {
            RedisError::from((ErrorKind::TypeError, "Serialization failed", e.to_string()))
        })?;

        let mut conn = self.connection.clone();
        conn.set_ex(key, json, seconds).await
    }

    /// 값을 읽는 동시에 삭제합니다. (`GETDEL`, Redis 6.2+)
    ///
    /// 같은 키에 대한 동시 호출 중 하나만 값을 받습니다.
    pub async fn get_del<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, RedisError> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn.get_del(key).await?;

        value
            .map(|json| {
                serde_json::from_str(&json).map_err(|e| {
                    RedisError::from((ErrorKind::TypeError, "Deserialization failed", e.to_string()))
                })
            })
            .transpose()
    }
}
