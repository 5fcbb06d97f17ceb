pub mod password_service;
pub mod salt_service;
