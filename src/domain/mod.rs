pub mod error;
pub mod models;
pub mod registry;
pub mod services;
