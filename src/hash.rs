//! bcrypt password hashing, run off the async workers.

use crate::err::Error;

pub const DEFAULT_COST: u32 = 10;

#[derive(Debug, Clone, Copy)]
pub struct Hasher {
    cost: u32,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::with_cost(DEFAULT_COST)
    }
}

impl Hasher {
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    /// Hashes `plain` with a fresh random salt, so two calls never agree.
    pub async fn hash(&self, plain: &str) -> Result<String, Error> {
        let plain = plain.to_owned();
        let cost = self.cost;
        let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(plain, cost)).await??;
        Ok(hashed)
    }

    pub async fn verify(&self, plain: &str, hashed: &str) -> Result<bool, Error> {
        let plain = plain.to_owned();
        let hashed = hashed.to_owned();
        let matches =
            tokio::task::spawn_blocking(move || bcrypt::verify(plain, &hashed)).await??;
        Ok(matches)
    }
}
