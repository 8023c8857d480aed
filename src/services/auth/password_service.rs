//! 비밀번호 해싱/검증
//!
//! bcrypt는 호출마다 새 salt를 만들고, 검증은 해시에 포함된 salt와 cost로 다시 계산합니다.
//! 두 연산 모두 CPU 집약적이므로 async 코드에서는 `web::block` 안에서 호출해야 합니다.

use crate::config::PasswordConfig;
use crate::core::errors::{AppResult, ErrorContext};

/// 계정이 없을 때 검증 시간을 맞추기 위해 사용하는 평문
const TIMING_PLACEHOLDER: &str = "timing-equalization-placeholder";

#[derive(Clone)]
pub struct PasswordService {
    cost: u32,
    /// 설정된 cost로 만든 더미 해시
    dummy_hash: String,
}

impl PasswordService {
    pub fn new(config: &PasswordConfig) -> AppResult<Self> {
        let dummy_hash = bcrypt::hash(TIMING_PLACEHOLDER, config.bcrypt_cost)
            .context("더미 해시 생성 실패")?;

        Ok(Self {
            cost: config.bcrypt_cost,
            dummy_hash,
        })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn hash(&self, password: &str) -> AppResult<String> {
        bcrypt::hash(password, self.cost).context("비밀번호 해싱 실패")
    }

    /// 비밀번호 검증
    ///
    /// 해시 형식이 잘못된 경우에도 에러 대신 `false`를 반환합니다.
    pub fn verify(&self, password: &str, digest: &str) -> bool {
        match bcrypt::verify(password, digest) {
            Ok(valid) => valid,
            Err(e) => {
                log::warn!("저장된 비밀번호 해시를 해석할 수 없습니다: {}", e);
                false
            }
        }
    }

    /// 존재하지 않는 계정에 대해 실제 검증과 같은 비용의 연산을 수행합니다.
    pub fn verify_dummy(&self, password: &str) {
        let _ = bcrypt::verify(password, &self.dummy_hash);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> PasswordService {
        PasswordService::new(&PasswordConfig { bcrypt_cost: 4 }).unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let service = service();
        let digest = service.hash("password123").unwrap();

        assert_ne!(digest, "password123");
        assert!(service.verify("password123", &digest));
        assert!(!service.verify("password124", &digest));
    }

    #[test]
    fn test_fresh_salt_per_hash() {
        let service = service();
        let first = service.hash("password123").unwrap();
        let second = service.hash("password123").unwrap();

        assert_ne!(first, second);
        assert!(service.verify("password123", &first));
        assert!(service.verify("password123", &second));
    }

    #[test]
    fn test_malformed_digest_is_false() {
        let service = service();
        assert!(!service.verify("password123", "not-a-bcrypt-hash"));
        assert!(!service.verify("password123", ""));
    }

    #[test]
    fn test_dummy_hash_uses_configured_cost() {
        let service = service();
        assert!(service.dummy_hash.starts_with("$2b$04$"));
        assert_eq!(service.cost(), 4);
        service.verify_dummy("anything");
    }
}
