//! OAuth state 저장소
//!
//! 로그인 시작 시 발급한 state를 콜백에서 한 번만 소비할 수 있도록 보관합니다.

pub mod state_repo;

pub use state_repo::{MemoryOAuthStateStore, OAuthStateStore, RedisOAuthStateStore};
