pub mod bounded_hashing;
pub mod credential_hashing;
