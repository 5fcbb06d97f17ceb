pub mod algorithm;
pub mod encoded_hash;
pub mod params;
pub mod verification;
