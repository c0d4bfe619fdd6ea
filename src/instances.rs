//! Per-session login pages kept in memory.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use jiff::{SignedDuration, Timestamp};
use ring::rand::{SecureRandom, SystemRandom};

use crate::form::FormState;
use crate::page::LoginPage;
use crate::verifier::CredentialVerifier;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed to generate instance id")]
    Random,
}

struct Entry {
    page: Arc<LoginPage>,
    last_seen: Timestamp,
}

pub struct Instances {
    verifier: Arc<dyn CredentialVerifier>,
    idle_timeout: SignedDuration,
    rng: SystemRandom,
    entries: Mutex<HashMap<String, Entry>>,
}

impl Instances {
    pub fn new(verifier: Arc<dyn CredentialVerifier>, idle_timeout: SignedDuration) -> Self {
        Self {
            verifier,
            idle_timeout,
            rng: SystemRandom::new(),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Return the page for `id` and mark it as seen.
    pub fn get(&self, id: &str) -> Option<Arc<LoginPage>> {
        let mut entries = self.entries.lock().unwrap();
        let entry = entries.get_mut(id)?;
        entry.last_seen = Timestamp::now();
        Some(entry.page.clone())
    }

    /// Create a fresh page under a new id, dropping the page previously held under `previous`.
    ///
    /// A submission still in flight on the dropped page runs to completion on its own.
    pub fn open(&self, previous: Option<&str>) -> Result<(String, Arc<LoginPage>), Error> {
        let id = self.new_id()?;
        let page = Arc::new(LoginPage::new(self.verifier.clone()));

        let mut entries = self.entries.lock().unwrap();

        if let Some(previous) = previous
            && entries.remove(previous).is_some()
        {
            tracing::debug!(%previous, "dropped previous form instance");
        }

        entries.insert(
            id.clone(),
            Entry {
                page: page.clone(),
                last_seen: Timestamp::now(),
            },
        );

        tracing::debug!(%id, "created form instance");
        Ok((id, page))
    }

    /// Drop pages not seen since `idle_timeout` before `now`. In-flight submissions are kept.
    pub fn evict_idle(&self, now: Timestamp) -> usize {
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();

        entries.retain(|_, entry| {
            now.duration_since(entry.last_seen) < self.idle_timeout
                || entry.page.form().state() == FormState::Submitting
        });

        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    fn new_id(&self) -> Result<String, Error> {
        let mut bytes = [0u8; 16];
        self.rng.fill(&mut bytes).map_err(|_| Error::Random)?;
        Ok(bytes.iter().map(|byte| format!("{byte:02x}")).collect())
    }
}

/// Periodically evict idle instances.
pub async fn reap(instances: Arc<Instances>, period: std::time::Duration) {
    let mut interval = tokio::time::interval(period);

    loop {
        interval.tick().await;
        let evicted = instances.evict_idle(Timestamp::now());

        if evicted > 0 {
            tracing::debug!(evicted, remaining = instances.len(), "evicted idle form instances");
        }
    }
}
