//! # Content Catalog View
//!
//! One catalog section: a fetcher, a rotator, a selection and at most one
//! open item inquiry. The view owns its fetch scope. [`ContentCatalogView::unmount`]
//! invalidates any request still in flight, drops the inquiry and releases
//! the rotation timer.
//!
//! ```text
//! ContentCatalogView
//! ├── fetcher: RemoteCollectionFetcher   // Idle/Loading/Loaded/Failed
//! ├── rotator: CarouselRotator           // strip mode only
//! ├── mode: PresentationMode             // Grid | Strip
//! ├── selected: usize                    // grid index / offset in strip window
//! └── inquiry: Option<FormSession>       // fresh per "inquire"
//! ```

use std::time::Duration;

use log::{debug, info};

use crate::catalog::{BackendError, CatalogItem, CollectionKind, FetchParams};
use crate::core::fetcher::{FetchOutcome, FetchState, FetchTicket, RemoteCollectionFetcher};
use crate::core::inquiry::FormSession;
use crate::core::rotator::{CarouselRotator, RotationCommand};
use crate::core::submission::Identity;

/// Number of cards a strip shows at once.
pub const STRIP_WINDOW: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationMode {
    /// Every item, static.
    Grid,
    /// A rotating window of [`STRIP_WINDOW`] items.
    Strip,
}

/// What the view should render, derived from fetch state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogPhase {
    Idle,
    Loading,
    Failed,
    Empty,
    Populated,
}

pub struct ContentCatalogView {
    title: String,
    kind: CollectionKind,
    mode: PresentationMode,
    fetcher: RemoteCollectionFetcher,
    rotator: CarouselRotator,
    selected: usize,
    pub inquiry: Option<FormSession>,
}

impl ContentCatalogView {
    pub fn new(
        title: impl Into<String>,
        kind: CollectionKind,
        params: FetchParams,
        mode: PresentationMode,
        rotation_interval: Duration,
    ) -> Self {
        Self {
            title: title.into(),
            kind,
            mode,
            fetcher: RemoteCollectionFetcher::new(kind.noun(), params),
            rotator: CarouselRotator::new(rotation_interval),
            selected: 0,
            inquiry: None,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn kind(&self) -> CollectionKind {
        self.kind
    }

    pub fn mode(&self) -> PresentationMode {
        self.mode
    }

    pub fn fetch_state(&self) -> &FetchState<CatalogItem> {
        self.fetcher.state()
    }

    pub fn rotator(&self) -> &CarouselRotator {
        &self.rotator
    }

    pub fn items(&self) -> &[CatalogItem] {
        self.fetcher.items()
    }

    pub fn phase(&self) -> CatalogPhase {
        match self.fetcher.state() {
            FetchState::Idle => CatalogPhase::Idle,
            FetchState::Loading => CatalogPhase::Loading,
            FetchState::Failed(_) => CatalogPhase::Failed,
            FetchState::Loaded(items) if items.is_empty() => CatalogPhase::Empty,
            FetchState::Loaded(_) => CatalogPhase::Populated,
        }
    }

    /// Starts a fetch cycle (mount or manual refresh). The old collection is
    /// no longer live, so its rotation stops.
    pub fn begin_fetch(&mut self) -> (FetchTicket, RotationCommand) {
        let ticket = self.fetcher.begin();
        self.selected = 0;
        (ticket, self.rotator.detach())
    }

    pub fn apply_fetch(
        &mut self,
        generation: u64,
        result: Result<Vec<CatalogItem>, BackendError>,
    ) -> RotationCommand {
        match self.fetcher.resolve(generation, result) {
            FetchOutcome::Stale => RotationCommand::Idle,
            FetchOutcome::Loaded { collection, len } => {
                self.selected = 0;
                match self.mode {
                    PresentationMode::Strip => self.rotator.attach(collection, len),
                    PresentationMode::Grid => self.rotator.detach(),
                }
            }
            FetchOutcome::Failed => self.rotator.detach(),
        }
    }

    pub fn tick(&mut self, collection: u64) -> bool {
        self.mode == PresentationMode::Strip && self.rotator.tick(collection)
    }

    pub fn toggle_mode(&mut self) -> RotationCommand {
        self.selected = 0;
        match self.mode {
            PresentationMode::Strip => {
                self.mode = PresentationMode::Grid;
                self.rotator.detach()
            }
            PresentationMode::Grid => {
                self.mode = PresentationMode::Strip;
                match self.fetcher.state() {
                    FetchState::Loaded(items) => {
                        self.rotator.attach(self.fetcher.generation(), items.len())
                    }
                    _ => RotationCommand::Idle,
                }
            }
        }
    }

    /// Items on screen, with their index into the full collection.
    pub fn visible_items(&self) -> Vec<(usize, &CatalogItem)> {
        let items = self.items();
        match self.mode {
            PresentationMode::Grid => items.iter().enumerate().collect(),
            PresentationMode::Strip => {
                if items.is_empty() {
                    return Vec::new();
                }
                let start = self.rotator.current_index();
                (0..STRIP_WINDOW.min(items.len()))
                    .map(|offset| {
                        let i = (start + offset) % items.len();
                        (i, &items[i])
                    })
                    .collect()
            }
        }
    }

    /// Index (into the full collection) of the highlighted item.
    pub fn highlight_index(&self) -> Option<usize> {
        let len = self.items().len();
        if len == 0 {
            return None;
        }
        Some(match self.mode {
            PresentationMode::Grid => self.selected.min(len - 1),
            PresentationMode::Strip => (self.rotator.current_index() + self.selected) % len,
        })
    }

    pub fn highlight(&self) -> Option<&CatalogItem> {
        self.highlight_index().and_then(|i| self.items().get(i))
    }

    /// Grid: wraps through all items. Strip: moves within the visible window.
    pub fn move_selection(&mut self, delta: isize) {
        let len = self.items().len();
        if len == 0 {
            return;
        }
        self.selected = match self.mode {
            PresentationMode::Grid => {
                (self.selected as isize + delta).rem_euclid(len as isize) as usize
            }
            PresentationMode::Strip => {
                let window = STRIP_WINDOW.min(len) as isize;
                (self.selected as isize + delta).clamp(0, window - 1) as usize
            }
        };
    }

    /// Opens a fresh inquiry for the highlighted item. Does nothing if one is
    /// already open or nothing is highlighted.
    pub fn open_inquiry(&mut self, instance: u64, identity: &Identity) -> bool {
        if self.inquiry.is_some() {
            return false;
        }
        let Some(item) = self.highlight() else {
            return false;
        };
        info!("Opening inquiry {} for {} '{}'", instance, self.kind, item.title);
        let session = FormSession::for_item(instance, item, identity);
        self.inquiry = Some(session);
        true
    }

    /// Discards the inquiry, whatever state its pipeline is in.
    pub fn close_inquiry(&mut self) -> Option<FormSession> {
        let closed = self.inquiry.take();
        if let Some(session) = &closed {
            debug!(
                "Closing inquiry {} ({:?})",
                session.instance(),
                session.pipeline.state()
            );
        }
        closed
    }

    pub fn unmount(&mut self) -> RotationCommand {
        self.fetcher.cancel();
        self.inquiry = None;
        self.rotator.detach()
    }
}
