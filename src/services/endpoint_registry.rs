use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use tracing::{debug, warn};

use crate::domain::errors::ConfigurationError;

static GLOBAL: OnceLock<Arc<EndpointRegistry>> = OnceLock::new();

/// Records which collection owns each backend namespace.
///
/// Two collections writing under the same endpoint, bucket and prefix would
/// overwrite or purge each other's attachments, so the second claim is
/// rejected. Entries live until `reset`.
#[derive(Debug, Default)]
pub struct EndpointRegistry {
    claims: Mutex<HashMap<String, String>>,
}

impl EndpointRegistry {
    /// Create an empty, isolated registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry shared by every store built without an explicit one
    pub fn global() -> Arc<EndpointRegistry> {
        GLOBAL.get_or_init(|| Arc::new(EndpointRegistry::new())).clone()
    }

    /// Claim `address` for `collection`.
    ///
    /// Re-claiming by the same collection succeeds; a claim by any other
    /// collection fails with `EndpointAlreadyClaimed`.
    pub fn claim(&self, address: &str, collection: &str) -> Result<(), ConfigurationError> {
        let mut claims = self.lock();

        match claims.get(address) {
            Some(existing) if existing == collection => {
                debug!(address, collection, "endpoint re-claimed by owner");
                Ok(())
            }
            Some(existing) => {
                warn!(
                    address,
                    existing = %existing,
                    conflicting = collection,
                    "endpoint already claimed by another collection"
                );
                Err(ConfigurationError::EndpointAlreadyClaimed {
                    address: address.to_string(),
                    existing: existing.clone(),
                    conflicting: collection.to_string(),
                })
            }
            None => {
                claims.insert(address.to_string(), collection.to_string());
                debug!(address, collection, "endpoint claimed");
                Ok(())
            }
        }
    }

    /// Collection currently owning `address`, if any
    pub fn owner(&self, address: &str) -> Option<String> {
        self.lock().get(address).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Forget every claim. Meant for test teardown.
    pub fn reset(&self) {
        self.lock().clear();
    }

    // A panic while holding the lock cannot leave the map half-updated
    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.claims.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
