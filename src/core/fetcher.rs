//! # Remote Collection Fetcher
//!
//! Holds the visible [`FetchState`] of one remote collection and decides
//! which network results are allowed to change it.
//!
//! The fetcher does no I/O. [`RemoteCollectionFetcher::begin`] flips the state
//! to `Loading` and hands back a [`FetchTicket`]; whoever performs the request
//! reports back through [`RemoteCollectionFetcher::resolve`] with the ticket's
//! generation. Every `begin` bumps the generation, so a result carrying an
//! older generation is stale and dropped without touching state.
//!
//! ```text
//! begin() ─► gen 1 ──────────────────────────► resolve(1) ✗ stale
//! begin() ─► gen 2 ─────────► resolve(2) ✓ Loaded
//! ```

use log::{debug, info, warn};

use crate::catalog::{BackendError, CatalogItem, FetchParams};

/// Lifecycle of one fetch cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    Idle,
    Loading,
    Loaded(Vec<T>),
    Failed(String),
}

/// What a collection element must expose to be prepared for presentation.
pub trait Presentable {
    fn is_active(&self) -> bool;
    fn ordering_hint(&self) -> i64;
}

impl Presentable for CatalogItem {
    fn is_active(&self) -> bool {
        self.active
    }

    fn ordering_hint(&self) -> i64 {
        self.order
    }
}

/// Drops inactive items, stable-sorts by ordering hint, then applies `limit`.
pub fn prepare_collection<T: Presentable>(items: Vec<T>, limit: Option<usize>) -> Vec<T> {
    let mut items: Vec<T> = items.into_iter().filter(Presentable::is_active).collect();
    items.sort_by_key(Presentable::ordering_hint);
    if let Some(limit) = limit {
        items.truncate(limit);
    }
    items
}

/// Issued by [`RemoteCollectionFetcher::begin`]; identifies one request.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket {
    pub generation: u64,
    pub params: FetchParams,
}

/// Result of feeding a response back into the fetcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A newer request was issued after this one; nothing changed.
    Stale,
    /// State is now `Loaded`. `collection` identifies the new sequence.
    Loaded { collection: u64, len: usize },
    /// State is now `Failed`.
    Failed,
}

pub struct RemoteCollectionFetcher<T = CatalogItem> {
    label: String,
    params: FetchParams,
    generation: u64,
    state: FetchState<T>,
}

impl<T: Presentable> RemoteCollectionFetcher<T> {
    /// `label` names the collection in the failure message ("courses").
    pub fn new(label: impl Into<String>, params: FetchParams) -> Self {
        Self {
            label: label.into(),
            params,
            generation: 0,
            state: FetchState::Idle,
        }
    }

    pub fn state(&self) -> &FetchState<T> {
        &self.state
    }

    pub fn params(&self) -> &FetchParams {
        &self.params
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Loaded items, or an empty slice in any other state.
    pub fn items(&self) -> &[T] {
        match &self.state {
            FetchState::Loaded(items) => items,
            _ => &[],
        }
    }

    /// Generic, user-safe text for a failed fetch.
    pub fn failure_message(&self) -> String {
        format!("Failed to load {}", self.label)
    }

    /// Starts a new fetch cycle with the current params.
    pub fn begin(&mut self) -> FetchTicket {
        self.generation += 1;
        self.state = FetchState::Loading;
        debug!("Fetch cycle {} for {} started", self.generation, self.label);
        FetchTicket {
            generation: self.generation,
            params: self.params.clone(),
        }
    }

    /// Starts a new fetch cycle with new params.
    pub fn begin_with(&mut self, params: FetchParams) -> FetchTicket {
        self.params = params;
        self.begin()
    }

    /// Invalidates any request still in flight without changing visible state.
    pub fn cancel(&mut self) {
        self.generation += 1;
    }

    /// Commits a response if, and only if, it belongs to the latest cycle.
    pub fn resolve(
        &mut self,
        generation: u64,
        result: Result<Vec<T>, BackendError>,
    ) -> FetchOutcome {
        if generation != self.generation || !matches!(self.state, FetchState::Loading) {
            debug!(
                "Dropping stale {} response (generation {}, current {})",
                self.label, generation, self.generation
            );
            return FetchOutcome::Stale;
        }

        match result {
            Ok(items) => {
                let items = prepare_collection(items, self.params.limit);
                let len = items.len();
                info!("Loaded {} {} (generation {})", len, self.label, generation);
                self.state = FetchState::Loaded(items);
                FetchOutcome::Loaded {
                    collection: generation,
                    len,
                }
            }
            Err(e) => {
                warn!("Failed to load {}: {}", self.label, e);
                self.state = FetchState::Failed(self.failure_message());
                FetchOutcome::Failed
            }
        }
    }
}
