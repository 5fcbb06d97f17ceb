use std::collections::{HashMap, hash_map::Entry};

use crate::domain::{error::DomainError, models::algorithm::AlgorithmDescriptor};

/// Catalogue of hashing algorithms keyed by id.
///
/// Filled once at startup, then shared read-only (typically behind an `Arc`).
#[derive(Debug, Default)]
pub struct AlgorithmRegistry {
    algorithms: HashMap<String, AlgorithmDescriptor>,
}

impl AlgorithmRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, descriptor: AlgorithmDescriptor) -> Result<(), DomainError> {
        match self.algorithms.entry(descriptor.id().to_string()) {
            Entry::Occupied(entry) => Err(DomainError::DuplicateAlgorithm(entry.key().clone())),
            Entry::Vacant(entry) => {
                entry.insert(descriptor);
                Ok(())
            }
        }
    }

    pub fn lookup(&self, id: &str) -> Result<&AlgorithmDescriptor, DomainError> {
        self.algorithms
            .get(id)
            .ok_or_else(|| DomainError::UnknownAlgorithm(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.algorithms.contains_key(id)
    }

    /// Registered ids, sorted
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.algorithms.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.algorithms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.algorithms.is_empty()
    }
}
