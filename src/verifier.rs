//! Credential verification.

use std::time::Duration;

use async_trait::async_trait;

use crate::form::Credentials;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    #[error("Invalid username or password.")]
    InvalidCredentials,
    #[error("Authentication service unavailable: {0}")]
    Unavailable(String),
}

/// Something that can decide whether a set of [`Credentials`] is acceptable.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, credentials: &Credentials) -> Result<(), VerifyError>;
}

/// Stand-in for a remote identity service: waits a fixed delay and accepts everything.
pub struct SimulatedVerifier {
    delay: Duration,
}

impl SimulatedVerifier {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl CredentialVerifier for SimulatedVerifier {
    async fn verify(&self, credentials: &Credentials) -> Result<(), VerifyError> {
        tracing::debug!(username = %credentials.username, delay = ?self.delay, "verifying");
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_simulated_verifier_waits_for_delay() {
        let verifier = SimulatedVerifier::new(Duration::from_millis(1500));
        let credentials = Credentials::new("alice", "secret123");

        let start = tokio::time::Instant::now();
        assert_eq!(verifier.verify(&credentials).await, Ok(()));
        assert_eq!(start.elapsed(), Duration::from_millis(1500));
    }
}
