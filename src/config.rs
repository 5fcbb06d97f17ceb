use std::env::VarError;

use serde::Deserialize;

use crate::domain::{error::DomainError, models::params::ParamSet};

pub const ALGORITHM_VAR: &str = "PASSWORD_HASH_ALGORITHM";
pub const PARAMS_VAR: &str = "PASSWORD_HASH_PARAMS";
pub const MAX_CONCURRENCY_VAR: &str = "PASSWORD_HASH_MAX_CONCURRENCY";

pub const DEFAULT_ALGORITHM: &str = "argon2id";
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// Preferred algorithm and cost settings for new hashes.
///
/// Parameters left out fall back to the algorithm's defaults when the service
/// is built.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HashingConfig {
    pub algorithm: String,
    pub params: ParamSet,
    pub max_concurrency: usize,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            algorithm: DEFAULT_ALGORITHM.to_string(),
            params: ParamSet::new(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

impl HashingConfig {
    pub fn new(algorithm: impl Into<String>, params: ParamSet) -> Self {
        Self {
            algorithm: algorithm.into(),
            params,
            ..Self::default()
        }
    }

    /// Read the process environment (after `.env` has been loaded)
    pub fn from_env() -> Result<Self, DomainError> {
        Self::from_lookup(|key| match dotenvy::var(key) {
            Ok(value) => Ok(Some(value)),
            Err(dotenvy::Error::EnvVar(VarError::NotPresent)) => Ok(None),
            Err(e) => Err(DomainError::Config(format!("{key}: {e}"))),
        })
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, DomainError>
    where
        F: Fn(&str) -> Result<Option<String>, DomainError>,
    {
        let mut config = Self::default();

        if let Some(algorithm) = lookup(ALGORITHM_VAR)? {
            config.algorithm = algorithm.trim().to_string();
        }
        if let Some(params) = lookup(PARAMS_VAR)? {
            config.params = params
                .trim()
                .parse()
                .map_err(|e| DomainError::Config(format!("{PARAMS_VAR}: {e}")))?;
        }
        if let Some(limit) = lookup(MAX_CONCURRENCY_VAR)? {
            config.max_concurrency = limit
                .trim()
                .parse()
                .map_err(|e| DomainError::Config(format!("{MAX_CONCURRENCY_VAR}: {e}")))?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_in(
        vars: &[(&str, &str)],
    ) -> impl Fn(&str) -> Result<Option<String>, DomainError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| Ok(vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = HashingConfig::from_lookup(lookup_in(&[])).unwrap();
        assert_eq!(config, HashingConfig::default());
        assert_eq!(config.algorithm, "argon2id");
        assert!(config.params.is_empty());
    }

    #[test]
    fn test_reads_all_variables() {
        let config = HashingConfig::from_lookup(lookup_in(&[
            (ALGORITHM_VAR, "argon2i"),
            (PARAMS_VAR, " m=65536,t=3 "),
            (MAX_CONCURRENCY_VAR, "8"),
        ]))
        .unwrap();
        assert_eq!(config.algorithm, "argon2i");
        assert_eq!(config.params, ParamSet::new().with("m", 65536).with("t", 3));
        assert_eq!(config.max_concurrency, 8);
    }

    #[test]
    fn test_bad_params_negative() {
        let result = HashingConfig::from_lookup(lookup_in(&[(PARAMS_VAR, "m=lots")]));
        assert!(matches!(result, Err(DomainError::Config(_))));
    }

    #[test]
    fn test_bad_concurrency_negative() {
        let result = HashingConfig::from_lookup(lookup_in(&[(MAX_CONCURRENCY_VAR, "-1")]));
        assert!(matches!(result, Err(DomainError::Config(_))));
    }

    #[test]
    fn test_lookup_error_propagates() {
        let result =
            HashingConfig::from_lookup(|_| Err(DomainError::Config("unreadable".to_string())));
        assert_eq!(result, Err(DomainError::Config("unreadable".to_string())));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: HashingConfig =
            serde_json::from_str(r#"{"params": {"m": 1024}}"#).unwrap();
        assert_eq!(config.algorithm, DEFAULT_ALGORITHM);
        assert_eq!(config.params, ParamSet::new().with("m", 1024));
        assert_eq!(config.max_concurrency, DEFAULT_MAX_CONCURRENCY);
    }
}
