use bcrypt::{hash, DEFAULT_COST};

use crate::web::error::AppError;

/// Hashes raw passwords with bcrypt at a configured cost.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn hash(&self, raw: &str) -> Result<String, AppError> {
        hash(raw, self.cost).map_err(|e| AppError::PasswordHashingError(e.to_string()))
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}
