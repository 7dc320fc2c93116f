//! src/services/proxy_service.rs
//!
//! ProxyService — the shared state handed to every request handler. Owns
//! the one long-lived store client (injected at construction so tests can
//! pass a fake) and translates store errors into HTTP-facing `ProxyError`s.
//!
//! Holding `store: None` models an incompletely configured process: the
//! server stays up and answers every proxied request with a configuration
//! error instead of crashing.

use std::sync::Arc;

use crate::{
    errors::ProxyError,
    models::attrs::ObjectAttrs,
    services::store::{ByteStream, StoreClient, StoreError},
};

#[derive(Clone)]
pub struct ProxyService {
    store: Option<Arc<dyn StoreClient>>,

    /// When set, transient error bodies carry the underlying store error
    /// instead of a generic message. Never enabled in production.
    dev_mode: bool,
}

impl ProxyService {
    pub fn new(store: Option<Arc<dyn StoreClient>>, dev_mode: bool) -> Self {
        Self { store, dev_mode }
    }

    fn store(&self) -> Result<&dyn StoreClient, ProxyError> {
        self.store
            .as_deref()
            .ok_or(ProxyError::Configuration)
    }

    /// Fetch object metadata, mapping store failures to response errors.
    pub async fn stat(&self, key: &str) -> Result<ObjectAttrs, ProxyError> {
        self.store()?
            .stat(key)
            .await
            .map_err(|err| self.map_store_error(err, "Failed to access file"))
    }

    /// Open the object's byte stream, mapping store failures to response
    /// errors. Only called before any response bytes are written.
    pub async fn open(&self, key: &str) -> Result<ByteStream, ProxyError> {
        self.store()?
            .open(key)
            .await
            .map_err(|err| self.map_store_error(err, "Failed to read file"))
    }

    fn map_store_error(&self, err: StoreError, generic: &str) -> ProxyError {
        match err {
            StoreError::NotFound(path) => {
                tracing::warn!(key = %path, "object not found");
                ProxyError::NotFound { path }
            }
            StoreError::Transient(detail) => {
                tracing::error!(error = %detail, "store request failed");
                let message = if self.dev_mode {
                    detail
                } else {
                    generic.to_string()
                };
                ProxyError::Transient { message }
            }
        }
    }
}
