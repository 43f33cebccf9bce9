//! REST backend for the catalog and inquiry endpoints.
//!
//! - `GET  {base}/api/v1/courses?limit=..&<filters>`
//! - `GET  {base}/api/v1/mentors?limit=..&<filters>`
//! - `POST {base}/api/v1/queries`
//!
//! Any non-2xx status is an error. On writes, a JSON body with a `message`
//! field is kept so the form can show it verbatim.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::de::DeserializeOwned;

use crate::catalog::types::{CourseRecord, ErrorBody, MentorRecord, Payload};
use crate::catalog::{
    BackendError, CatalogBackend, CatalogItem, CollectionKind, FetchParams, InquiryPayload,
};

/// Reqwest-backed implementation of [`CatalogBackend`].
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, BackendError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(BackendError::Config("base URL is empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Config(e.to_string()))?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/v1/{}", self.base_url, path)
    }

    async fn get_records<T: DeserializeOwned>(
        &self,
        kind: CollectionKind,
        params: &FetchParams,
    ) -> Result<Vec<T>, BackendError> {
        let url = self.endpoint(kind.path());
        let response = self
            .client
            .get(&url)
            .query(&params.query_pairs())
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let status = response.status();
        debug!("GET {} -> {}", url, status);

        let body = response
            .text()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        if !status.is_success() {
            warn!("Collection fetch failed: {} - {}", status, body);
            return Err(BackendError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        serde_json::from_str::<Payload<T>>(&body)
            .map(Payload::into_records)
            .map_err(|e| BackendError::Parse(e.to_string()))
    }
}

/// Pulls the `message` field out of an error body, if the body is JSON and has one.
fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
}

#[async_trait]
impl CatalogBackend for HttpBackend {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch_collection(
        &self,
        kind: CollectionKind,
        params: &FetchParams,
    ) -> Result<Vec<CatalogItem>, BackendError> {
        info!("Fetching {} (limit={:?}, filters={:?})", kind, params.limit, params.filters);

        let items: Vec<CatalogItem> = match kind {
            CollectionKind::Courses => self
                .get_records::<CourseRecord>(kind, params)
                .await?
                .into_iter()
                .map(CatalogItem::from)
                .collect(),
            CollectionKind::Mentors => self
                .get_records::<MentorRecord>(kind, params)
                .await?
                .into_iter()
                .map(CatalogItem::from)
                .collect(),
        };

        debug!("Fetched {} {} records", items.len(), kind);
        Ok(items)
    }

    async fn submit_inquiry(&self, payload: &InquiryPayload) -> Result<(), BackendError> {
        let url = self.endpoint("queries");
        info!(
            "Submitting inquiry (subject={:?}, linked={:?})",
            payload.subject, payload.course
        );

        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let status = response.status();
        debug!("POST {} -> {}", url, status);

        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        warn!("Inquiry rejected: {} - {}", status, body);
        Err(BackendError::Api {
            status: status.as_u16(),
            message: error_message(&body),
        })
    }
}
