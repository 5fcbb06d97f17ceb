use std::{fmt, sync::Arc};

use crate::domain::{
    error::DomainError,
    models::{
        encoded_hash::{MAX_DIGEST_LEN, MIN_DIGEST_LEN},
        params::{ParamSet, ParamSpec, is_identifier},
    },
    services::password_service::PasswordHasher,
};

/// A registered hashing algorithm: its identity, parameter schema and implementation
#[derive(Clone)]
pub struct AlgorithmDescriptor {
    id: String,
    version: u32,
    params: Vec<ParamSpec>,
    digest_len: usize,
    hasher: Arc<dyn PasswordHasher>,
}

impl AlgorithmDescriptor {
    /// Build a descriptor, checking the id, the schema and the digest length
    pub fn new(
        id: impl Into<String>,
        version: u32,
        params: Vec<ParamSpec>,
        digest_len: usize,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Result<Self, DomainError> {
        let id = id.into();
        if !is_identifier(&id) {
            return Err(DomainError::InvalidParameters(format!(
                "invalid algorithm id {id:?}"
            )));
        }
        if !(MIN_DIGEST_LEN..=MAX_DIGEST_LEN).contains(&digest_len) {
            return Err(DomainError::InvalidParameters(format!(
                "{id}: digest length {digest_len} out of range"
            )));
        }
        for (i, spec) in params.iter().enumerate() {
            if !is_identifier(spec.name) {
                return Err(DomainError::InvalidParameters(format!(
                    "{id}: invalid parameter name {:?}",
                    spec.name
                )));
            }
            if params[..i].iter().any(|other| other.name == spec.name) {
                return Err(DomainError::InvalidParameters(format!(
                    "{id}: parameter {} declared twice",
                    spec.name
                )));
            }
            if spec.min > spec.max || !spec.accepts(spec.default) {
                return Err(DomainError::InvalidParameters(format!(
                    "{id}: default for {} outside its range",
                    spec.name
                )));
            }
        }

        Ok(Self {
            id,
            version,
            params,
            digest_len,
            hasher,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Parameter schema in canonical order
    pub fn param_specs(&self) -> &[ParamSpec] {
        &self.params
    }

    /// Digest length for new hashes
    pub fn digest_len(&self) -> usize {
        self.digest_len
    }

    pub fn default_params(&self) -> ParamSet {
        self.params.iter().map(|s| (s.name, s.default)).collect()
    }

    /// Fill parameters missing from `params` with schema defaults
    pub fn complete_params(&self, params: &ParamSet) -> ParamSet {
        let mut completed = params.clone();
        for spec in &self.params {
            if !completed.contains(spec.name) {
                completed.insert(spec.name, spec.default);
            }
        }
        completed
    }

    /// Every schema parameter present, nothing unknown, each in range
    pub fn validate_params(&self, params: &ParamSet) -> Result<(), DomainError> {
        for spec in &self.params {
            match params.get(spec.name) {
                None => {
                    return Err(DomainError::InvalidParameters(format!(
                        "{}: missing parameter {}",
                        self.id, spec.name
                    )));
                }
                Some(value) if !spec.accepts(value) => {
                    return Err(DomainError::InvalidParameters(format!(
                        "{}: {}={} outside {}..={}",
                        self.id, spec.name, value, spec.min, spec.max
                    )));
                }
                Some(_) => {}
            }
        }
        if let Some(unknown) = params
            .names()
            .find(|name| !self.params.iter().any(|s| s.name == *name))
        {
            return Err(DomainError::InvalidParameters(format!(
                "{}: unknown parameter {unknown}",
                self.id
            )));
        }
        Ok(())
    }

    pub fn hash(
        &self,
        password: &[u8],
        salt: &[u8],
        params: &ParamSet,
    ) -> Result<Vec<u8>, DomainError> {
        self.hasher.hash(password, salt, params, self.digest_len)
    }

    pub fn verify(
        &self,
        password: &[u8],
        salt: &[u8],
        params: &ParamSet,
        expected_digest: &[u8],
    ) -> Result<bool, DomainError> {
        self.hasher.verify(password, salt, params, expected_digest)
    }
}

impl fmt::Debug for AlgorithmDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlgorithmDescriptor")
            .field("id", &self.id)
            .field("version", &self.version)
            .field("params", &self.params)
            .field("digest_len", &self.digest_len)
            .finish_non_exhaustive()
    }
}
