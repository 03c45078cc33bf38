//! Password hashing and verification using bcrypt

use crate::error::AppError;

/// Cost factor used for stored credentials
pub const DEFAULT_COST: u32 = 10;

/// Password hasher with a configurable cost factor
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Create hasher with an explicit cost factor (4..=31)
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a password with a fresh random salt
    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        bcrypt::hash(password, self.cost).map_err(|e| {
            tracing::error!("Failed to hash password: {:?}", e);
            AppError::Internal(format!("Failed to hash password: {}", e))
        })
    }

    /// Verify a password against a stored hash.
    ///
    /// A mismatch is `false`, and so is a hash that cannot be parsed.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        match bcrypt::verify(password, hash) {
            Ok(matched) => matched,
            Err(e) => {
                tracing::debug!("Failed to parse password hash: {:?}", e);
                false
            }
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 单元测试使用最低成本，避免拖慢测试
    fn hasher() -> PasswordHasher {
        PasswordHasher::new(4)
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = hasher();
        let hash = hasher.hash("rahasia123").unwrap();
        assert!(hasher.verify("rahasia123", &hash));
    }

    #[test]
    fn test_verify_fails_with_wrong_password() {
        let hasher = hasher();
        let hash = hasher.hash("rahasia123").unwrap();
        assert!(!hasher.verify("rahasia124", &hash));
    }

    #[test]
    fn test_unparsable_hash_is_false() {
        assert!(!hasher().verify("anything", "not-a-bcrypt-hash"));
    }

    #[test]
    fn test_default_cost_is_ten() {
        let hash = PasswordHasher::default().hash("x").unwrap();
        assert!(hash.starts_with("$2b$10$"));
    }
}
