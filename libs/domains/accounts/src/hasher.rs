//! Argon2id password hashing with an explicit per-account salt.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash as Argon2Hash, PasswordHasher as Argon2Hasher, SaltString, rand_core::OsRng,
    },
};
use core_config::{ConfigError, FromEnv, env_parse};

use crate::error::{AccountError, AccountResult};

/// Argon2id cost parameters.
///
/// Defaults: time cost 1, 64 MiB of memory, parallelism 4, 32-byte output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HasherConfig {
    pub time_cost: u32,
    pub memory_kib: u32,
    pub parallelism: u32,
}

impl HasherConfig {
    pub const OUTPUT_LEN: usize = 32;
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self {
            time_cost: 1,
            memory_kib: 64 * 1024,
            parallelism: 4,
        }
    }
}

impl FromEnv for HasherConfig {
    /// - ARGON2_TIME_COST
    /// - ARGON2_MEMORY_KIB
    /// - ARGON2_PARALLELISM
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            time_cost: env_parse("ARGON2_TIME_COST", defaults.time_cost)?,
            memory_kib: env_parse("ARGON2_MEMORY_KIB", defaults.memory_kib)?,
            parallelism: env_parse("ARGON2_PARALLELISM", defaults.parallelism)?,
        })
    }
}

#[derive(Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    pub fn new(config: &HasherConfig) -> Result<Self, ConfigError> {
        let params = Params::new(
            config.memory_kib,
            config.time_cost,
            config.parallelism,
            Some(HasherConfig::OUTPUT_LEN),
        )
        .map_err(|e| ConfigError::ParseError {
            key: "ARGON2_*".to_string(),
            details: e.to_string(),
        })?;

        Ok(Self { params })
    }

    /// 16 random bytes from the OS CSPRNG, base64 encoded.
    pub fn generate_salt() -> String {
        SaltString::generate(&mut OsRng).as_str().to_string()
    }

    /// Hash `password` with `salt`, returning the PHC string.
    ///
    /// Runs on the blocking pool.
    pub async fn hash(&self, password: &str, salt: &str) -> AccountResult<String> {
        let params = self.params.clone();
        let password = password.to_string();
        let salt = salt.to_string();

        tokio::task::spawn_blocking(move || {
            let salt = SaltString::from_b64(&salt)
                .map_err(|e| AccountError::Internal(format!("Invalid salt: {}", e)))?;
            Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
                .hash_password(password.as_bytes(), &salt)
                .map(|h| h.to_string())
                .map_err(|e| AccountError::Internal(format!("Password hashing failed: {}", e)))
        })
        .await
        .map_err(|e| AccountError::Internal(format!("Password hash task panicked: {}", e)))?
    }

    /// Recompute the digest for `password` with the stored `salt` and compare it with
    /// `digest` in constant time.
    ///
    /// The cost parameters are taken from `digest`, so accounts hashed under older
    /// settings keep working.
    pub async fn verify(&self, password: &str, salt: &str, digest: &str) -> AccountResult<bool> {
        let password = password.to_string();
        let salt = salt.to_string();
        let digest = digest.to_string();

        tokio::task::spawn_blocking(move || {
            let stored = Argon2Hash::new(&digest)
                .map_err(|e| AccountError::Internal(format!("Stored hash is malformed: {}", e)))?;
            let params = Params::try_from(&stored)
                .map_err(|e| AccountError::Internal(format!("Stored hash params: {}", e)))?;
            let salt = SaltString::from_b64(&salt)
                .map_err(|e| AccountError::Internal(format!("Stored salt is malformed: {}", e)))?;

            let computed = Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
                .hash_password(password.as_bytes(), &salt)
                .map_err(|e| AccountError::Internal(format!("Password hashing failed: {}", e)))?;

            // `Output` equality is constant-time.
            Ok(matches!((computed.hash, stored.hash), (Some(a), Some(b)) if a == b))
        })
        .await
        .map_err(|e| AccountError::Internal(format!("Password verify task panicked: {}", e)))?
    }

    /// Spend the same work as a real verification and discard the result.
    pub async fn dummy_verify(&self, password: &str) {
        let _ = self.hash(password, &Self::generate_salt()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap_hasher() -> PasswordHasher {
        PasswordHasher::new(&HasherConfig {
            time_cost: 1,
            memory_kib: 1024,
            parallelism: 1,
        })
        .unwrap()
    }

    #[test]
    fn test_generate_salt_is_unique_base64() {
        let a = PasswordHasher::generate_salt();
        let b = PasswordHasher::generate_salt();
        assert_ne!(a, b);
        // 16 bytes, unpadded base64
        assert_eq!(a.len(), 22);
        assert!(SaltString::from_b64(&a).is_ok());
    }

    #[tokio::test]
    async fn test_hash_then_verify() {
        let hasher = cheap_hasher();
        let salt = PasswordHasher::generate_salt();
        let digest = hasher.hash("password1", &salt).await.unwrap();

        assert!(digest.starts_with("$argon2id$v=19$"));
        assert!(hasher.verify("password1", &salt, &digest).await.unwrap());
        assert!(!hasher.verify("password2", &salt, &digest).await.unwrap());
    }

    #[tokio::test]
    async fn test_verify_with_wrong_salt_fails() {
        let hasher = cheap_hasher();
        let salt = PasswordHasher::generate_salt();
        let digest = hasher.hash("password1", &salt).await.unwrap();

        let other_salt = PasswordHasher::generate_salt();
        assert!(!hasher.verify("password1", &other_salt, &digest).await.unwrap());
    }

    #[tokio::test]
    async fn test_same_password_different_salts_differ() {
        let hasher = cheap_hasher();
        let a = hasher
            .hash("password1", &PasswordHasher::generate_salt())
            .await
            .unwrap();
        let b = hasher
            .hash("password1", &PasswordHasher::generate_salt())
            .await
            .unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_malformed_digest_is_internal_error() {
        let hasher = cheap_hasher();
        let salt = PasswordHasher::generate_salt();
        let err = hasher.verify("password1", &salt, "not-a-phc").await.unwrap_err();
        assert!(matches!(err, AccountError::Internal(_)));
    }

    #[test]
    fn test_invalid_params_are_rejected() {
        let result = PasswordHasher::new(&HasherConfig {
            time_cost: 0,
            memory_kib: 1024,
            parallelism: 1,
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_config_from_env() {
        temp_env::with_vars(
            [
                ("ARGON2_TIME_COST", Some("3")),
                ("ARGON2_MEMORY_KIB", None),
                ("ARGON2_PARALLELISM", Some("2")),
            ],
            || {
                let config = HasherConfig::from_env().unwrap();
                assert_eq!(config.time_cost, 3);
                assert_eq!(config.memory_kib, 65536);
                assert_eq!(config.parallelism, 2);
            },
        );
    }
}
