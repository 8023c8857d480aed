//! 데이터 액세스 계층
//!
//! 서비스는 구체 구현이 아닌 trait([`UserStore`](users::UserStore),
//! [`OAuthStateStore`](oauth::OAuthStateStore))에 의존하며,
//! 구현체는 시작 시 `AppState`에 주입됩니다.
//!
//! | trait | 운영 구현 | 대안 구현 |
//! |-------|-----------|-----------|
//! | `UserStore` | `MongoUserRepository` | 테스트용 `MemoryUserRepository` |
//! | `OAuthStateStore` | `RedisOAuthStateStore` | 단일 노드용 `MemoryOAuthStateStore` |

pub mod oauth;
pub mod users;
