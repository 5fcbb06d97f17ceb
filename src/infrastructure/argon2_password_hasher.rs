use std::sync::Arc;

use argon2::{Algorithm, Argon2, Params, Version};

use crate::domain::{
    error::DomainError,
    models::{
        algorithm::AlgorithmDescriptor,
        params::{ParamSet, ParamSpec},
    },
    registry::AlgorithmRegistry,
    services::password_service::PasswordHasher,
};

/// Memory cost in KiB (19 MiB, OWASP minimum for Argon2id)
pub const DEFAULT_MEMORY_COST_KIB: u32 = 19456;
pub const DEFAULT_TIME_COST: u32 = 2;
pub const DEFAULT_PARALLELISM: u32 = 1;
pub const DEFAULT_DIGEST_LEN: usize = 32;

/// Argon2 version 0x13, written as `v=19`
pub const ARGON2_VERSION: u32 = 0x13;

/// Argon2 parameter schema, in the order the encoded form lists them
pub const ARGON2_PARAMS: [ParamSpec; 3] = [
    ParamSpec::new("m", 8, 4_194_304, DEFAULT_MEMORY_COST_KIB),
    ParamSpec::new("t", 1, 1024, DEFAULT_TIME_COST),
    ParamSpec::new("p", 1, 255, DEFAULT_PARALLELISM),
];

/// Argon2 key derivation for one variant (`argon2id`, `argon2i` or `argon2d`)
#[derive(Debug, Clone, Copy)]
pub struct Argon2PasswordHasher {
    algorithm: Algorithm,
}

impl Argon2PasswordHasher {
    pub fn new(algorithm: Algorithm) -> Self {
        Self { algorithm }
    }

    /// Algorithm id used in encoded hashes
    pub fn id(&self) -> &'static str {
        self.algorithm.as_str()
    }

    /// Registry entry for this variant
    pub fn descriptor(self) -> Result<AlgorithmDescriptor, DomainError> {
        AlgorithmDescriptor::new(
            self.id(),
            ARGON2_VERSION,
            ARGON2_PARAMS.to_vec(),
            DEFAULT_DIGEST_LEN,
            Arc::new(self),
        )
    }
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self::new(Algorithm::Argon2id)
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(
        &self,
        password: &[u8],
        salt: &[u8],
        params: &ParamSet,
        digest_len: usize,
    ) -> Result<Vec<u8>, DomainError> {
        let param = |name: &str| {
            params
                .get(name)
                .ok_or_else(|| DomainError::InvalidParameters(format!("missing parameter {name}")))
        };
        let params = Params::new(param("m")?, param("t")?, param("p")?, Some(digest_len))
            .map_err(|e| DomainError::InvalidParameters(e.to_string()))?;

        let mut digest = vec![0u8; digest_len];
        Argon2::new(self.algorithm, Version::V0x13, params)
            .hash_password_into(password, salt, &mut digest)
            .map_err(|e| DomainError::HashComputation(e.to_string()))?;

        Ok(digest)
    }
}

/// Registry holding `argon2id`, `argon2i` and `argon2d`
pub fn default_registry() -> Result<AlgorithmRegistry, DomainError> {
    let mut registry = AlgorithmRegistry::new();
    for algorithm in [Algorithm::Argon2id, Algorithm::Argon2i, Algorithm::Argon2d] {
        registry.register(Argon2PasswordHasher::new(algorithm).descriptor()?)?;
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    const SALT: &[u8] = b"0123456789abcdef";

    #[fixture]
    fn cheap_params() -> ParamSet {
        ParamSet::new().with("m", 64).with("t", 1).with("p", 1)
    }

    #[rstest]
    fn test_hash_is_deterministic(cheap_params: ParamSet) {
        let hasher = Argon2PasswordHasher::default();
        let a = hasher.hash(b"password", SALT, &cheap_params, 32).unwrap();
        let b = hasher.hash(b"password", SALT, &cheap_params, 32).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[rstest]
    fn test_hash_depends_on_salt_and_params(cheap_params: ParamSet) {
        let hasher = Argon2PasswordHasher::default();
        let base = hasher.hash(b"password", SALT, &cheap_params, 32).unwrap();

        let other_salt = hasher.hash(b"password", b"fedcba9876543210", &cheap_params, 32).unwrap();
        assert_ne!(base, other_salt);

        let more_passes = cheap_params.clone().with("t", 2);
        let other_params = hasher.hash(b"password", SALT, &more_passes, 32).unwrap();
        assert_ne!(base, other_params);
    }

    #[rstest]
    fn test_variants_produce_different_digests(cheap_params: ParamSet) {
        let id = Argon2PasswordHasher::new(Algorithm::Argon2id)
            .hash(b"password", SALT, &cheap_params, 32)
            .unwrap();
        let i = Argon2PasswordHasher::new(Algorithm::Argon2i)
            .hash(b"password", SALT, &cheap_params, 32)
            .unwrap();
        let d = Argon2PasswordHasher::new(Algorithm::Argon2d)
            .hash(b"password", SALT, &cheap_params, 32)
            .unwrap();
        assert_ne!(id, i);
        assert_ne!(id, d);
        assert_ne!(i, d);
    }

    #[rstest]
    fn test_verify_positive_and_negative(cheap_params: ParamSet) {
        let hasher = Argon2PasswordHasher::default();
        let digest = hasher.hash(b"correct-password", SALT, &cheap_params, 32).unwrap();
        assert!(hasher.verify(b"correct-password", SALT, &cheap_params, &digest).unwrap());
        assert!(!hasher.verify(b"wrong-password", SALT, &cheap_params, &digest).unwrap());
    }

    #[test]
    fn test_hash_rejects_memory_below_lanes() {
        let hasher = Argon2PasswordHasher::default();
        let params = ParamSet::new().with("m", 8).with("t", 1).with("p", 4);
        let result = hasher.hash(b"password", SALT, &params, 32);
        assert!(matches!(result, Err(DomainError::InvalidParameters(_))));
    }

    #[test]
    fn test_hash_rejects_missing_parameter() {
        let hasher = Argon2PasswordHasher::default();
        let params = ParamSet::new().with("m", 64).with("t", 1);
        let result = hasher.hash(b"password", SALT, &params, 32);
        assert!(matches!(result, Err(DomainError::InvalidParameters(_))));
    }

    #[rstest]
    #[case(Algorithm::Argon2id, "argon2id")]
    #[case(Algorithm::Argon2i, "argon2i")]
    #[case(Algorithm::Argon2d, "argon2d")]
    fn test_variant_ids(#[case] algorithm: Algorithm, #[case] expected: &str) {
        assert_eq!(Argon2PasswordHasher::new(algorithm).id(), expected);
    }

    #[test]
    fn test_default_registry() {
        let registry = default_registry().unwrap();
        assert_eq!(registry.ids(), vec!["argon2d", "argon2i", "argon2id"]);

        let argon2id = registry.lookup("argon2id").unwrap();
        assert_eq!(argon2id.version(), 19);
        assert_eq!(argon2id.digest_len(), DEFAULT_DIGEST_LEN);
        assert_eq!(
            argon2id.default_params(),
            ParamSet::new()
                .with("m", DEFAULT_MEMORY_COST_KIB)
                .with("t", DEFAULT_TIME_COST)
                .with("p", DEFAULT_PARALLELISM)
        );
    }
}
