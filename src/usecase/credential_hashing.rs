use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::{
    config::HashingConfig,
    domain::{
        error::DomainError,
        models::{
            algorithm::AlgorithmDescriptor,
            encoded_hash::{EncodedHash, SALT_LEN},
            params::ParamSet,
            verification::VerificationResult,
        },
        registry::AlgorithmRegistry,
        services::salt_service::SaltGenerator,
    },
    infrastructure::{
        encoded_hash_format::EncodedHashFormat, os_salt_generator::OsSaltGenerator,
    },
};

const DECOY_SALT: [u8; SALT_LEN] = [0; SALT_LEN];

/// Hashes new passwords with the preferred algorithm and verifies stored ones
/// with whichever registered algorithm produced them.
pub struct CredentialHashingService<S: SaltGenerator = OsSaltGenerator> {
    registry: Arc<AlgorithmRegistry>,
    preferred: AlgorithmDescriptor,
    preferred_params: ParamSet,
    salt_generator: S,
}

impl CredentialHashingService<OsSaltGenerator> {
    pub fn new(registry: Arc<AlgorithmRegistry>, config: &HashingConfig) -> Result<Self, DomainError> {
        Self::with_salt_generator(registry, config, OsSaltGenerator::new())
    }
}

impl<S: SaltGenerator> CredentialHashingService<S> {
    /// Resolve the preferred algorithm and complete its parameters.
    ///
    /// Unknown algorithms and out-of-range parameters are startup errors.
    pub fn with_salt_generator(
        registry: Arc<AlgorithmRegistry>,
        config: &HashingConfig,
        salt_generator: S,
    ) -> Result<Self, DomainError> {
        let preferred = registry.lookup(&config.algorithm)?.clone();
        let preferred_params = preferred.complete_params(&config.params);
        preferred.validate_params(&preferred_params)?;

        info!(
            algorithm = %preferred.id(),
            params = %preferred_params,
            "credential hashing configured"
        );

        Ok(Self {
            registry,
            preferred,
            preferred_params,
            salt_generator,
        })
    }

    pub fn preferred_algorithm(&self) -> &str {
        self.preferred.id()
    }

    pub fn preferred_params(&self) -> &ParamSet {
        &self.preferred_params
    }

    pub fn registry(&self) -> &AlgorithmRegistry {
        &self.registry
    }

    pub fn salt_generator(&self) -> &S {
        &self.salt_generator
    }

    /// Hash `plaintext` under the preferred algorithm with a fresh salt
    #[instrument(skip_all, fields(algorithm = %self.preferred.id()))]
    pub fn hash_password(&self, plaintext: &str) -> Result<String, DomainError> {
        if plaintext.is_empty() {
            return Err(DomainError::EmptyPassword);
        }

        let mut salt = vec![0u8; SALT_LEN];
        self.salt_generator.fill(&mut salt)?;

        let digest = self
            .preferred
            .hash(plaintext.as_bytes(), &salt, &self.preferred_params)?;
        let record = EncodedHash::new(
            self.preferred.id(),
            self.preferred.version(),
            self.preferred_params.clone(),
            salt,
            digest,
        );
        let encoded = self.format().serialize(&record)?;

        debug!("password hashed");
        Ok(encoded)
    }

    /// Check `plaintext` against a stored hash.
    ///
    /// Never fails: malformed records, unknown algorithms and wrong passwords
    /// all come back as [`VerificationResult::rejected`], and each of them
    /// runs the key derivation once.
    #[instrument(skip_all)]
    pub fn verify_password(&self, plaintext: &str, stored: &str) -> VerificationResult {
        if plaintext.is_empty() {
            debug!("empty password rejected");
            return self.reject_with_decoy(plaintext);
        }

        let (record, descriptor) = match self.format().parse_resolved(stored) {
            Ok(resolved) => resolved,
            Err(e) => {
                warn!(reason = %e, "stored hash unusable");
                return self.reject_with_decoy(plaintext);
            }
        };

        match descriptor.verify(
            plaintext.as_bytes(),
            record.salt(),
            record.params(),
            record.digest(),
        ) {
            Ok(true) => {
                let needs_rehash = self.is_stale(&record);
                if needs_rehash {
                    info!(algorithm = %record.algorithm_id(), params = %record.params(), "stored hash is stale");
                }
                VerificationResult::accepted(needs_rehash)
            }
            Ok(false) => {
                debug!(algorithm = %record.algorithm_id(), "password mismatch");
                VerificationResult::rejected()
            }
            Err(e) => {
                warn!(algorithm = %record.algorithm_id(), reason = %e, "verification failed");
                self.reject_with_decoy(plaintext)
            }
        }
    }

    /// Whether a stored hash should be replaced, judged without the password.
    ///
    /// Unusable records count as stale.
    pub fn needs_rehash(&self, stored: &str) -> bool {
        match self.format().parse(stored) {
            Ok(record) => self.is_stale(&record),
            Err(_) => true,
        }
    }

    fn is_stale(&self, record: &EncodedHash) -> bool {
        record.algorithm_id() != self.preferred.id()
            || record.version() != self.preferred.version()
            || record.params() != &self.preferred_params
            || record.digest().len() != self.preferred.digest_len()
    }

    /// Verify against a throwaway record under the preferred settings, then reject
    fn reject_with_decoy(&self, plaintext: &str) -> VerificationResult {
        let digest = vec![0u8; self.preferred.digest_len()];
        let _ = self.preferred.verify(
            plaintext.as_bytes(),
            &DECOY_SALT,
            &self.preferred_params,
            &digest,
        );
        VerificationResult::rejected()
    }

    fn format(&self) -> EncodedHashFormat<'_> {
        EncodedHashFormat::new(&self.registry)
    }
}
