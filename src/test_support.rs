//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Mutex;

use async_trait::async_trait;

use crate::catalog::{
    BackendError, CatalogBackend, CatalogItem, CollectionKind, FetchParams, InquiryPayload,
};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;

/// An in-memory backend that returns canned results and records writes.
#[derive(Default)]
pub struct FakeBackend {
    pub items: Vec<CatalogItem>,
    pub submit_error: Option<BackendError>,
    pub submitted: Mutex<Vec<InquiryPayload>>,
}

#[async_trait]
impl CatalogBackend for FakeBackend {
    fn name(&self) -> &str {
        "fake"
    }

    async fn fetch_collection(
        &self,
        _kind: CollectionKind,
        _params: &FetchParams,
    ) -> Result<Vec<CatalogItem>, BackendError> {
        Ok(self.items.clone())
    }

    async fn submit_inquiry(&self, payload: &InquiryPayload) -> Result<(), BackendError> {
        self.submitted.lock().unwrap().push(payload.clone());
        match &self.submit_error {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

/// Creates a test App with default config and no identity.
pub fn test_app() -> App {
    App::from_config(&ResolvedConfig::default())
}
