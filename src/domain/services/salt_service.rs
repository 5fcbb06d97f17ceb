use crate::domain::error::DomainError;

/// Source of salt bytes for new hashes
pub trait SaltGenerator: Send + Sync {
    /// Fill `buf` with fresh random bytes, or fail with `RandomnessUnavailable`
    fn fill(&self, buf: &mut [u8]) -> Result<(), DomainError>;
}
