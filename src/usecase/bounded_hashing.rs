use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::error;

use crate::{
    domain::{
        error::DomainError, models::verification::VerificationResult,
        services::salt_service::SaltGenerator,
    },
    infrastructure::os_salt_generator::OsSaltGenerator,
    usecase::credential_hashing::CredentialHashingService,
};

/// Async front for [`CredentialHashingService`] that caps how many hash or
/// verify computations run at once.
///
/// Work runs on the blocking pool; the permit travels with it, so a dropped
/// caller does not free the slot before the computation ends.
pub struct BoundedHashingService<S: SaltGenerator + 'static = OsSaltGenerator> {
    service: Arc<CredentialHashingService<S>>,
    permits: Arc<Semaphore>,
}

impl<S: SaltGenerator + 'static> Clone for BoundedHashingService<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            permits: Arc::clone(&self.permits),
        }
    }
}

impl<S: SaltGenerator + 'static> BoundedHashingService<S> {
    pub fn new(
        service: Arc<CredentialHashingService<S>>,
        max_concurrency: usize,
    ) -> Result<Self, DomainError> {
        if max_concurrency == 0 || max_concurrency > Semaphore::MAX_PERMITS {
            return Err(DomainError::InvalidParameters(format!(
                "max concurrency {max_concurrency} out of range"
            )));
        }
        Ok(Self {
            service,
            permits: Arc::new(Semaphore::new(max_concurrency)),
        })
    }

    pub fn service(&self) -> &CredentialHashingService<S> {
        &self.service
    }

    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }

    pub async fn hash_password(&self, plaintext: String) -> Result<String, DomainError> {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| DomainError::WorkerFailed)?;
        let service = Arc::clone(&self.service);

        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            service.hash_password(&plaintext)
        })
        .await
        .map_err(|e| {
            error!(error = %e, "hashing worker failed");
            DomainError::WorkerFailed
        })?
    }

    pub async fn verify_password(&self, plaintext: String, stored: String) -> VerificationResult {
        let Ok(permit) = Arc::clone(&self.permits).acquire_owned().await else {
            return VerificationResult::rejected();
        };
        let service = Arc::clone(&self.service);

        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            service.verify_password(&plaintext, &stored)
        })
        .await
        .unwrap_or_else(|e| {
            error!(error = %e, "verification worker failed");
            VerificationResult::rejected()
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        thread,
        time::Duration,
    };

    use super::*;
    use crate::{
        config::HashingConfig, domain::models::params::ParamSet,
        infrastructure::argon2_password_hasher::default_registry,
    };
    use rstest::*;

    fn cheap_config() -> HashingConfig {
        HashingConfig::new(
            "argon2id",
            ParamSet::new().with("m", 64).with("t", 1).with("p", 1),
        )
    }

    #[fixture]
    fn bounded() -> BoundedHashingService {
        let registry = Arc::new(default_registry().unwrap());
        let service = CredentialHashingService::new(registry, &cheap_config()).unwrap();
        BoundedHashingService::new(Arc::new(service), 2).unwrap()
    }

    /// Records the highest number of overlapping salt requests
    #[derive(Default)]
    struct SlowSaltGenerator {
        active: AtomicUsize,
        peak: AtomicUsize,
    }

    impl SaltGenerator for SlowSaltGenerator {
        fn fill(&self, buf: &mut [u8]) -> Result<(), DomainError> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(20));
            buf.iter_mut().enumerate().for_each(|(i, b)| *b = i as u8);
            self.active.fetch_sub(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[rstest]
    #[tokio::test]
    async fn test_hash_and_verify(bounded: BoundedHashingService) {
        let hashed = bounded
            .hash_password("my_secure_password".to_string())
            .await
            .unwrap();
        assert_eq!(
            bounded
                .verify_password("my_secure_password".to_string(), hashed.clone())
                .await,
            VerificationResult::accepted(false)
        );
        assert_eq!(
            bounded
                .verify_password("wrong_password".to_string(), hashed)
                .await,
            VerificationResult::rejected()
        );
        assert_eq!(bounded.available_permits(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn test_errors_pass_through(bounded: BoundedHashingService) {
        assert_eq!(
            bounded.hash_password(String::new()).await,
            Err(DomainError::EmptyPassword)
        );
        assert_eq!(
            bounded
                .verify_password("x".to_string(), "garbage".to_string())
                .await,
            VerificationResult::rejected()
        );
    }

    #[test]
    fn test_zero_concurrency_negative() {
        let registry = Arc::new(default_registry().unwrap());
        let service = CredentialHashingService::new(registry, &cheap_config()).unwrap();
        assert!(matches!(
            BoundedHashingService::new(Arc::new(service), 0),
            Err(DomainError::InvalidParameters(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrency_is_bounded() {
        let registry = Arc::new(default_registry().unwrap());
        let service = Arc::new(
            CredentialHashingService::with_salt_generator(
                registry,
                &cheap_config(),
                SlowSaltGenerator::default(),
            )
            .unwrap(),
        );
        let bounded = BoundedHashingService::new(Arc::clone(&service), 2).unwrap();

        let tasks: Vec<_> = (0..8)
            .map(|i| {
                let bounded = bounded.clone();
                tokio::spawn(async move { bounded.hash_password(format!("password-{i}")).await })
            })
            .collect();
        for task in tasks {
            assert!(task.await.unwrap().is_ok());
        }

        let peak = service.salt_generator().peak.load(Ordering::SeqCst);
        assert!(peak >= 1);
        assert!(peak <= 2, "peak concurrency {peak} exceeded the limit");
        assert_eq!(bounded.available_permits(), 2);
    }
}
