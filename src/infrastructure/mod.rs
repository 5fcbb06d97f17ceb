pub mod argon2_password_hasher;
pub mod encoded_hash_format;
pub mod os_salt_generator;
