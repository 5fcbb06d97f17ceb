use rand_core::{OsRng, TryRngCore};
use tracing::error;

use crate::domain::{error::DomainError, services::salt_service::SaltGenerator};

/// Salt source backed by the operating system CSPRNG
#[derive(Debug, Clone, Copy, Default)]
pub struct OsSaltGenerator;

impl OsSaltGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl SaltGenerator for OsSaltGenerator {
    fn fill(&self, buf: &mut [u8]) -> Result<(), DomainError> {
        OsRng.try_fill_bytes(buf).map_err(|e| {
            error!(error = %e, "OS random source failed");
            DomainError::RandomnessUnavailable
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_produces_distinct_salts() {
        let generator = OsSaltGenerator::new();
        let mut a = [0u8; 16];
        let mut b = [0u8; 16];
        generator.fill(&mut a).unwrap();
        generator.fill(&mut b).unwrap();
        assert_ne!(a, b);
        assert_ne!(a, [0u8; 16]);
    }
}
