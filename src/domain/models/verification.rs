use serde::{Deserialize, Serialize};

/// Outcome of checking a password against a stored hash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub matched: bool,
    pub needs_rehash: bool,
}

impl VerificationResult {
    /// Negative outcome, used for mismatches and unusable records alike
    pub const fn rejected() -> Self {
        Self {
            matched: false,
            needs_rehash: false,
        }
    }

    pub const fn accepted(needs_rehash: bool) -> Self {
        Self {
            matched: true,
            needs_rehash,
        }
    }
}
