use std::fmt;

use crate::domain::models::params::ParamSet;

/// Salt length used for every new hash
pub const SALT_LEN: usize = 16;

pub const MIN_SALT_LEN: usize = 16;
pub const MAX_SALT_LEN: usize = 64;
pub const MIN_DIGEST_LEN: usize = 16;
pub const MAX_DIGEST_LEN: usize = 64;

/// Structured form of a stored credential hash
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedHash {
    algorithm_id: String,
    version: u32,
    params: ParamSet,
    salt: Vec<u8>,
    digest: Vec<u8>,
}

impl EncodedHash {
    pub fn new(
        algorithm_id: impl Into<String>,
        version: u32,
        params: ParamSet,
        salt: Vec<u8>,
        digest: Vec<u8>,
    ) -> Self {
        Self {
            algorithm_id: algorithm_id.into(),
            version,
            params,
            salt,
            digest,
        }
    }

    pub fn algorithm_id(&self) -> &str {
        &self.algorithm_id
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn params(&self) -> &ParamSet {
        &self.params
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    pub fn digest(&self) -> &[u8] {
        &self.digest
    }
}

// salt and digest are never printed
impl fmt::Debug for EncodedHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedHash")
            .field("algorithm_id", &self.algorithm_id)
            .field("version", &self.version)
            .field("params", &self.params)
            .field("salt_len", &self.salt.len())
            .field("digest_len", &self.digest.len())
            .finish()
    }
}
