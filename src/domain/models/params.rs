use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Schema entry for one numeric algorithm parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub min: u32,
    pub max: u32,
    pub default: u32,
}

impl ParamSpec {
    pub const fn new(name: &'static str, min: u32, max: u32, default: u32) -> Self {
        Self {
            name,
            min,
            max,
            default,
        }
    }

    pub fn accepts(&self, value: u32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Named integer parameters of a hashing algorithm.
///
/// Equality ignores insertion order; the text form written by the encoded
/// hash codec follows the algorithm's schema order instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamSet(BTreeMap<String, u32>);

impl ParamSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: u32) -> Self {
        self.0.insert(name.into(), value);
        self
    }

    /// Returns the previous value if `name` was already present
    pub fn insert(&mut self, name: impl Into<String>, value: u32) -> Option<u32> {
        self.0.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.0.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, u32)> for ParamSet {
    fn from_iter<I: IntoIterator<Item = (S, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Parses `name=value(,name=value)*`.
///
/// Values are plain decimal without sign or leading zeros. Duplicate names are
/// rejected. An empty string yields an empty set.
impl FromStr for ParamSet {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut params = ParamSet::new();
        if s.is_empty() {
            return Ok(params);
        }

        for pair in s.split(',') {
            let (name, value) = pair
                .split_once('=')
                .ok_or(DomainError::MalformedHash("parameter without value"))?;
            if !is_identifier(name) {
                return Err(DomainError::MalformedHash("invalid parameter name"));
            }
            let value =
                parse_decimal(value).ok_or(DomainError::MalformedHash("non-numeric parameter"))?;
            if params.insert(name, value).is_some() {
                return Err(DomainError::MalformedHash("duplicate parameter"));
            }
        }

        Ok(params)
    }
}

impl fmt::Display for ParamSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{name}={value}")?;
        }
        Ok(())
    }
}

/// Lowercase ASCII letters, digits and `-`, non-empty
pub(crate) fn is_identifier(s: &str) -> bool {
    !s.is_empty()
        && s
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

pub(crate) fn parse_decimal(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if s.len() > 1 && s.starts_with('0') {
        return None;
    }
    s.parse().ok()
}
