//! 캐싱 계층 모듈
//!
//! Redis를 백엔드로 하는 단기 데이터 저장(OAuth state 등)과 JSON 직렬화를 제공합니다.
//!
//! ```rust,ignore
//! use crate::caching::redis::RedisClient;
//!
//! let cache = RedisClient::new("redis://localhost:6379").await?;
//! cache.set_with_expiry("oauth_state:ab12", &entry, 600).await?;
//! let entry: Option<Entry> = cache.get_del("oauth_state:ab12").await?;
//! ```

pub mod redis;
