//! # Runtime
//!
//! Carries out the [`Effect`]s returned by `core::action::update` on tokio,
//! and reports every result back into the action channel the UI loop drains.
//!
//! ```text
//! update() ──Effect──► Runtime::execute ──tokio::spawn──► backend / timer
//!    ▲                                                         │
//!    └──────────────── mpsc::Sender<Action> ◄──────────────────┘
//! ```
//!
//! Every task the runtime starts is held by a guard that aborts it on drop.
//! Guards are keyed by section (fetches, rotation timers) or by form scope
//! (success-window timers), so starting a new one for the same key releases
//! the old one, and dropping the runtime releases all of them. Submissions
//! are not guarded: an in-flight write is never cancelled, and a late result
//! is recognised by its form instance in the reducer.

use std::collections::HashMap;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use log::{debug, info, warn};
use tokio::task::{AbortHandle, JoinHandle};
use tokio::time::{Instant, interval_at, sleep_until};

use crate::catalog::{CatalogBackend, CollectionKind};
use crate::core::action::{Action, Effect};
use crate::core::fetcher::FetchTicket;
use crate::core::state::FormScope;

/// Aborts the task when dropped.
struct TaskGuard(AbortHandle);

impl TaskGuard {
    fn new<T>(handle: JoinHandle<T>) -> Self {
        Self(handle.abort_handle())
    }
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.0.abort();
    }
}

pub struct Runtime {
    backend: Arc<dyn CatalogBackend>,
    tx: mpsc::Sender<Action>,
    fetches: HashMap<usize, TaskGuard>,
    rotations: HashMap<usize, TaskGuard>,
    reverts: HashMap<FormScope, TaskGuard>,
}

impl Runtime {
    pub fn new(backend: Arc<dyn CatalogBackend>, tx: mpsc::Sender<Action>) -> Self {
        info!("Runtime started with backend: {}", backend.name());
        Self {
            backend,
            tx,
            fetches: HashMap::new(),
            rotations: HashMap::new(),
            reverts: HashMap::new(),
        }
    }

    /// Number of live timers (rotation + success window).
    pub fn timer_count(&self) -> usize {
        self.rotations.len() + self.reverts.len()
    }

    /// Runs one effect. Returns `true` when the app should quit.
    pub fn execute(&mut self, effect: Effect) -> bool {
        match effect {
            Effect::SpawnFetch {
                section,
                kind,
                ticket,
            } => {
                let guard = self.spawn_fetch(section, kind, ticket);
                self.fetches.insert(section, guard);
            }
            Effect::StartRotation {
                section,
                collection,
                interval,
            } => {
                let guard = self.spawn_rotation(section, collection, interval);
                self.rotations.insert(section, guard);
            }
            Effect::StopRotation { section } => {
                if self.rotations.remove(&section).is_some() {
                    debug!("Rotation timer for section {} released", section);
                }
            }
            Effect::SpawnSubmit {
                scope,
                instance,
                payload,
            } => {
                info!("Spawning submission for {:?}/{}", scope, instance);
                let backend = self.backend.clone();
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let result = backend.submit_inquiry(&payload).await;
                    let action = Action::SubmissionResolved {
                        scope,
                        instance,
                        result,
                    };
                    if tx.send(action).is_err() {
                        warn!("Failed to send submission result: receiver dropped");
                    }
                });
            }
            Effect::ScheduleRevert {
                scope,
                instance,
                after,
            } => {
                let guard = self.spawn_revert(scope, instance, after);
                self.reverts.insert(scope, guard);
            }
            Effect::CancelRevert { scope } => {
                if self.reverts.remove(&scope).is_some() {
                    debug!("Success window timer for {:?} released", scope);
                }
            }
            Effect::Quit => return true,
        }
        false
    }

    fn spawn_fetch(
        &self,
        section: usize,
        kind: CollectionKind,
        ticket: FetchTicket,
    ) -> TaskGuard {
        info!(
            "Spawning {} fetch for section {} (generation {})",
            kind, section, ticket.generation
        );
        let backend = self.backend.clone();
        let tx = self.tx.clone();
        TaskGuard::new(tokio::spawn(async move {
            let result = backend.fetch_collection(kind, &ticket.params).await;
            let action = Action::FetchResolved {
                section,
                generation: ticket.generation,
                result,
            };
            if tx.send(action).is_err() {
                warn!("Failed to send fetch result: receiver dropped");
            }
        }))
    }

    fn spawn_rotation(&self, section: usize, collection: u64, interval: Duration) -> TaskGuard {
        debug!(
            "Rotation timer for section {} (collection {}, every {:?})",
            section, collection, interval
        );
        let tx = self.tx.clone();
        // First tick one full interval from now, not immediately.
        let mut ticker = interval_at(Instant::now() + interval, interval);
        TaskGuard::new(tokio::spawn(async move {
            loop {
                ticker.tick().await;
                if tx
                    .send(Action::RotationTick {
                        section,
                        collection,
                    })
                    .is_err()
                {
                    return;
                }
            }
        }))
    }

    fn spawn_revert(&self, scope: FormScope, instance: u64, after: Duration) -> TaskGuard {
        debug!("Success window for {:?}/{} ends in {:?}", scope, instance, after);
        let tx = self.tx.clone();
        let deadline = Instant::now() + after;
        TaskGuard::new(tokio::spawn(async move {
            sleep_until(deadline).await;
            if tx
                .send(Action::SuccessWindowElapsed { scope, instance })
                .is_err()
            {
                warn!("Failed to send success window expiry: receiver dropped");
            }
        }))
    }
}
