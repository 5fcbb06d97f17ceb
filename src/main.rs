use std::sync::Arc;

use credential_hasher::{
    BoundedHashingService, CredentialHashingService, HashingConfig, default_registry,
    telemetry::init_tracing,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env is optional; real environment variables win
    dotenvy::dotenv().ok();
    init_tracing("info");

    let config = HashingConfig::from_env()?;
    let registry = Arc::new(default_registry()?);
    let service = CredentialHashingService::new(Arc::clone(&registry), &config)?;
    let hasher = BoundedHashingService::new(Arc::new(service), config.max_concurrency)?;

    let password = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "my_secure_password".to_string());

    let hashed = hasher.hash_password(password.clone()).await?;
    println!("Hashed password: {hashed}");

    let result = hasher.verify_password(password, hashed.clone()).await;
    println!("Password valid: {}", serde_json::to_string(&result)?);

    let result = hasher
        .verify_password("wrong_password".to_string(), hashed)
        .await;
    println!(
        "Password valid with wrong password: {}",
        serde_json::to_string(&result)?
    );

    Ok(())
}
