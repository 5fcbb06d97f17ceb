//! Text codec for stored credential hashes.
//!
//! ```text
//! $<algorithm-id>$v=<version>$<name>=<value>,...$<salt>$<digest>
//! ```
//!
//! Salt and digest use the standard base64 alphabet without padding. Parameters
//! are written in the algorithm's schema order, so one record has exactly one
//! text form.

use base64::{Engine as _, engine::general_purpose::STANDARD_NO_PAD};

use crate::domain::{
    error::DomainError,
    models::{
        algorithm::AlgorithmDescriptor,
        encoded_hash::{EncodedHash, MAX_DIGEST_LEN, MAX_SALT_LEN, MIN_DIGEST_LEN, MIN_SALT_LEN},
        params::{ParamSet, is_identifier, parse_decimal},
    },
    registry::AlgorithmRegistry,
};

const DELIMITER: char = '$';
const VERSION_PREFIX: &str = "v=";

/// Parses and serializes encoded hashes against the algorithms of a registry
#[derive(Debug, Clone, Copy)]
pub struct EncodedHashFormat<'a> {
    registry: &'a AlgorithmRegistry,
}

impl<'a> EncodedHashFormat<'a> {
    pub fn new(registry: &'a AlgorithmRegistry) -> Self {
        Self { registry }
    }

    /// Parse stored text.
    ///
    /// Fails with `UnknownAlgorithm` when the id is well-formed but not registered,
    /// and with `MalformedHash` for everything else.
    pub fn parse(&self, text: &str) -> Result<EncodedHash, DomainError> {
        self.parse_resolved(text).map(|(hash, _)| hash)
    }

    /// Parse stored text and also return the registered algorithm it names
    pub fn parse_resolved(
        &self,
        text: &str,
    ) -> Result<(EncodedHash, &'a AlgorithmDescriptor), DomainError> {
        let rest = text
            .strip_prefix(DELIMITER)
            .ok_or(DomainError::MalformedHash("missing leading delimiter"))?;
        let segments: Vec<&str> = rest.split(DELIMITER).collect();
        let [id, version, params, salt, digest] = segments[..] else {
            return Err(DomainError::MalformedHash("wrong number of segments"));
        };

        if !is_identifier(id) {
            return Err(DomainError::MalformedHash("invalid algorithm id"));
        }
        let descriptor = self.registry.lookup(id)?;

        let version = version
            .strip_prefix(VERSION_PREFIX)
            .and_then(parse_decimal)
            .ok_or(DomainError::MalformedHash("invalid version"))?;
        if version != descriptor.version() {
            return Err(DomainError::MalformedHash("unsupported version"));
        }

        let params: ParamSet = params.parse()?;
        descriptor
            .validate_params(&params)
            .map_err(|_| DomainError::MalformedHash("parameter missing or out of range"))?;

        let salt = decode_b64(salt, MIN_SALT_LEN..=MAX_SALT_LEN, "invalid salt")?;
        let digest = decode_b64(digest, MIN_DIGEST_LEN..=MAX_DIGEST_LEN, "invalid digest")?;

        Ok((EncodedHash::new(id, version, params, salt, digest), descriptor))
    }

    /// Serialize a record into its canonical text form.
    ///
    /// Records that would not parse back (unregistered algorithm, bad
    /// parameters, salt or digest length) are refused.
    pub fn serialize(&self, hash: &EncodedHash) -> Result<String, DomainError> {
        let descriptor = self.registry.lookup(hash.algorithm_id())?;
        check_record(descriptor, hash)?;

        let params = descriptor
            .param_specs()
            .iter()
            .filter_map(|spec| {
                hash.params()
                    .get(spec.name)
                    .map(|value| format!("{}={}", spec.name, value))
            })
            .collect::<Vec<_>>()
            .join(",");

        Ok(format!(
            "${id}$v={version}${params}${salt}${digest}",
            id = hash.algorithm_id(),
            version = hash.version(),
            salt = STANDARD_NO_PAD.encode(hash.salt()),
            digest = STANDARD_NO_PAD.encode(hash.digest()),
        ))
    }
}

fn check_record(descriptor: &AlgorithmDescriptor, hash: &EncodedHash) -> Result<(), DomainError> {
    if hash.version() != descriptor.version() {
        return Err(DomainError::InvalidParameters(format!(
            "{}: version {} not supported",
            descriptor.id(),
            hash.version()
        )));
    }
    descriptor.validate_params(hash.params())?;
    if !(MIN_SALT_LEN..=MAX_SALT_LEN).contains(&hash.salt().len()) {
        return Err(DomainError::InvalidParameters(format!(
            "salt length {} out of range",
            hash.salt().len()
        )));
    }
    if !(MIN_DIGEST_LEN..=MAX_DIGEST_LEN).contains(&hash.digest().len()) {
        return Err(DomainError::InvalidParameters(format!(
            "digest length {} out of range",
            hash.digest().len()
        )));
    }
    Ok(())
}

fn decode_b64(
    segment: &str,
    len: std::ops::RangeInclusive<usize>,
    reason: &'static str,
) -> Result<Vec<u8>, DomainError> {
    let bytes = STANDARD_NO_PAD
        .decode(segment)
        .map_err(|_| DomainError::MalformedHash(reason))?;
    if !len.contains(&bytes.len()) {
        return Err(DomainError::MalformedHash(reason));
    }
    Ok(bytes)
}
