//! Salted, algorithm-tagged password hashing with transparent upgrades.
//!
//! Build an [`AlgorithmRegistry`] once (usually [`default_registry`]), pick the
//! preferred algorithm through [`HashingConfig`], and share the resulting
//! [`CredentialHashingService`]:
//!
//! ```
//! use std::sync::Arc;
//! use credential_hasher::{
//!     CredentialHashingService, HashingConfig, ParamSet, default_registry,
//! };
//!
//! let registry = Arc::new(default_registry().unwrap());
//! let config = HashingConfig::new("argon2id", ParamSet::new().with("m", 64).with("t", 1));
//! let service = CredentialHashingService::new(registry, &config).unwrap();
//!
//! let stored = service.hash_password("my_secure_password").unwrap();
//! assert!(stored.starts_with("$argon2id$v=19$m=64,t=1,p=1$"));
//!
//! let result = service.verify_password("my_secure_password", &stored);
//! assert!(result.matched && !result.needs_rehash);
//! ```

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod telemetry;
pub mod usecase;

pub use config::HashingConfig;
pub use domain::{
    error::DomainError,
    models::{
        algorithm::AlgorithmDescriptor,
        encoded_hash::EncodedHash,
        params::{ParamSet, ParamSpec},
        verification::VerificationResult,
    },
    registry::AlgorithmRegistry,
    services::{password_service::PasswordHasher, salt_service::SaltGenerator},
};
pub use infrastructure::{
    argon2_password_hasher::{Argon2PasswordHasher, default_registry},
    encoded_hash_format::EncodedHashFormat,
    os_salt_generator::OsSaltGenerator,
};
pub use usecase::{
    bounded_hashing::BoundedHashingService, credential_hashing::CredentialHashingService,
};
