use argon2::password_hash::Output;

use crate::domain::{error::DomainError, models::params::ParamSet};

/// Key derivation behind one registered algorithm
pub trait PasswordHasher: Send + Sync {
    /// Derive a `digest_len` byte digest from the password and salt
    fn hash(
        &self,
        password: &[u8],
        salt: &[u8],
        params: &ParamSet,
        digest_len: usize,
    ) -> Result<Vec<u8>, DomainError>;

    /// Recompute the digest and compare it against `expected_digest` in constant time
    fn verify(
        &self,
        password: &[u8],
        salt: &[u8],
        params: &ParamSet,
        expected_digest: &[u8],
    ) -> Result<bool, DomainError> {
        let actual = self.hash(password, salt, params, expected_digest.len())?;
        Ok(constant_time_eq(&actual, expected_digest))
    }
}

/// Byte comparison whose running time does not depend on where the inputs differ.
///
/// Only the lengths may leak, and those are public in the encoded format. Each
/// block is compared through [`Output`], whose equality is constant time.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.chunks(Output::MAX_LENGTH)
        .zip(b.chunks(Output::MAX_LENGTH))
        .fold(true, |equal, (x, y)| {
            let same = match (padded_block(x), padded_block(y)) {
                (Ok(x), Ok(y)) => x == y,
                _ => false,
            };
            equal & same
        })
}

fn padded_block(chunk: &[u8]) -> Result<Output, argon2::password_hash::Error> {
    let mut block = [0u8; Output::MAX_LENGTH];
    block[..chunk.len()].copy_from_slice(chunk);
    Output::new(&block)
}
