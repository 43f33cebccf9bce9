//! # Actions
//!
//! Everything that can happen in Redefine becomes an `Action`.
//! User presses Tab? That's `Action::NextSection`.
//! Courses arrive? That's `Action::FetchResolved { .. }`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state and returns the [`Effect`]s the runtime should carry out. No
//! side effects here. I/O happens elsewhere.
//!
//! ```text
//! State + Action  →  update()  →  New State + Vec<Effect>
//! ```
//!
//! Timers and network calls report back as actions too, tagged with the
//! generation, collection or form instance they were started for, so a
//! late arrival is recognised here and dropped.

use std::time::Duration;

use log::{debug, info, warn};

use crate::catalog::{BackendError, CatalogItem, CollectionKind, InquiryPayload};
use crate::core::fetcher::FetchTicket;
use crate::core::inquiry::FormSession;
use crate::core::rotator::RotationCommand;
use crate::core::state::{App, FormScope};
use crate::core::submission::{Resolution, SubmitRejection};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Start every section's first fetch.
    Mount,
    /// Re-fetch the active section.
    Refresh,
    FetchResolved {
        section: usize,
        generation: u64,
        result: Result<Vec<CatalogItem>, BackendError>,
    },
    RotationTick {
        section: usize,
        collection: u64,
    },
    SelectSection(usize),
    NextSection,
    PrevSection,
    MoveSelection(isize),
    ToggleMode,
    OpenInquiry,
    OpenContact,
    CloseForm,
    FocusNext,
    FocusPrev,
    FormInput(String),
    FormBackspace,
    SubmitForm,
    SubmissionResolved {
        scope: FormScope,
        instance: u64,
        result: Result<(), BackendError>,
    },
    SuccessWindowElapsed {
        scope: FormScope,
        instance: u64,
    },
    /// Tear every section down, then exit.
    Quit,
}

/// Work for the runtime. Each one reports back, if at all, as an [`Action`].
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    SpawnFetch {
        section: usize,
        kind: CollectionKind,
        ticket: FetchTicket,
    },
    StartRotation {
        section: usize,
        collection: u64,
        interval: Duration,
    },
    StopRotation {
        section: usize,
    },
    SpawnSubmit {
        scope: FormScope,
        instance: u64,
        payload: InquiryPayload,
    },
    ScheduleRevert {
        scope: FormScope,
        instance: u64,
        after: Duration,
    },
    CancelRevert {
        scope: FormScope,
    },
    Quit,
}

fn rotation_effect(section: usize, command: RotationCommand) -> Option<Effect> {
    match command {
        RotationCommand::Start {
            collection,
            interval,
        } => Some(Effect::StartRotation {
            section,
            collection,
            interval,
        }),
        RotationCommand::Stop => Some(Effect::StopRotation { section }),
        RotationCommand::Idle => None,
    }
}

fn begin_fetch(app: &mut App, section: usize) -> Vec<Effect> {
    let Some(view) = app.sections.get_mut(section) else {
        return Vec::new();
    };
    let (ticket, command) = view.begin_fetch();
    let mut effects: Vec<Effect> = rotation_effect(section, command).into_iter().collect();
    effects.push(Effect::SpawnFetch {
        section,
        kind: view.kind(),
        ticket,
    });
    effects
}

fn close_form(app: &mut App, scope: FormScope) -> Vec<Effect> {
    match app.take_form(scope) {
        Some(_) => vec![Effect::CancelRevert { scope }],
        None => Vec::new(),
    }
}

fn switch_section(app: &mut App, index: usize) {
    if index < app.sections.len() && app.active_form_scope().is_none() {
        app.active = index;
        app.status_message = app.sections[index].title().to_string();
    }
}

pub fn update(app: &mut App, action: Action) -> Vec<Effect> {
    match action {
        Action::Mount => {
            info!("Mounting {} sections", app.sections.len());
            app.status_message = "Loading catalog...".to_string();
            (0..app.sections.len())
                .flat_map(|i| begin_fetch(app, i))
                .collect()
        }
        Action::Refresh => {
            app.status_message = "Refreshing...".to_string();
            let active = app.active;
            begin_fetch(app, active)
        }
        Action::FetchResolved {
            section,
            generation,
            result,
        } => {
            let Some(view) = app.sections.get_mut(section) else {
                warn!("Fetch result for unknown section {}", section);
                return Vec::new();
            };
            let command = view.apply_fetch(generation, result);
            if section == app.active {
                app.status_message = view.title().to_string();
            }
            rotation_effect(section, command).into_iter().collect()
        }
        Action::RotationTick {
            section,
            collection,
        } => {
            if let Some(view) = app.sections.get_mut(section)
                && !view.tick(collection)
            {
                debug!(
                    "Ignoring rotation tick for section {} collection {}",
                    section, collection
                );
            }
            Vec::new()
        }
        Action::SelectSection(index) => {
            switch_section(app, index);
            Vec::new()
        }
        Action::NextSection => {
            let next = (app.active + 1) % app.sections.len().max(1);
            switch_section(app, next);
            Vec::new()
        }
        Action::PrevSection => {
            let len = app.sections.len().max(1);
            let prev = (app.active + len - 1) % len;
            switch_section(app, prev);
            Vec::new()
        }
        Action::MoveSelection(delta) => {
            if app.active_form_scope().is_none()
                && let Some(view) = app.active_section_mut()
            {
                view.move_selection(delta);
            }
            Vec::new()
        }
        Action::ToggleMode => {
            let section = app.active;
            match app.active_section_mut() {
                Some(view) => rotation_effect(section, view.toggle_mode())
                    .into_iter()
                    .collect(),
                None => Vec::new(),
            }
        }
        Action::OpenInquiry => {
            if app.active_form_scope().is_some() {
                return Vec::new();
            }
            let section = app.active;
            let instance = app.next_instance();
            let identity = app.identity.clone();
            let opened = app
                .active_section_mut()
                .is_some_and(|view| view.open_inquiry(instance, &identity));
            if opened && let Some(session) = app.form(FormScope::Section(section)) {
                app.status_message = session.title();
            }
            Vec::new()
        }
        Action::OpenContact => {
            if app.active_form_scope().is_none() {
                let instance = app.next_instance();
                let session = FormSession::general(instance, &app.identity);
                info!("Opening contact form {}", instance);
                app.status_message = session.title();
                app.contact = Some(session);
            }
            Vec::new()
        }
        Action::CloseForm => match app.active_form_scope() {
            Some(scope) => {
                app.status_message = String::new();
                close_form(app, scope)
            }
            None => Vec::new(),
        },
        Action::FocusNext => {
            if let Some(form) = app.active_form_mut() {
                form.focus_next();
            }
            Vec::new()
        }
        Action::FocusPrev => {
            if let Some(form) = app.active_form_mut() {
                form.focus_prev();
            }
            Vec::new()
        }
        Action::FormInput(text) => {
            if let Some(form) = app.active_form_mut() {
                form.input(&text);
            }
            Vec::new()
        }
        Action::FormBackspace => {
            if let Some(form) = app.active_form_mut() {
                form.backspace();
            }
            Vec::new()
        }
        Action::SubmitForm => {
            let Some(scope) = app.active_form_scope() else {
                return Vec::new();
            };
            let Some(form) = app.form_mut(scope) else {
                return Vec::new();
            };
            let instance = form.instance();
            match form.pipeline.submit() {
                Ok(payload) => {
                    app.status_message = "Submitting...".to_string();
                    vec![Effect::SpawnSubmit {
                        scope,
                        instance,
                        payload,
                    }]
                }
                Err(SubmitRejection::InFlight) => Vec::new(),
                Err(SubmitRejection::Invalid(_)) => {
                    app.status_message = "Please fix the highlighted fields".to_string();
                    Vec::new()
                }
            }
        }
        Action::SubmissionResolved {
            scope,
            instance,
            result,
        } => {
            let Some(form) = app
                .form_mut(scope)
                .filter(|form| form.instance() == instance)
            else {
                debug!(
                    "Dropping submission result for closed form {:?}/{}",
                    scope, instance
                );
                return Vec::new();
            };

            match form.pipeline.resolve(result) {
                Resolution::Succeeded => {
                    let closes = form.closes_on_success();
                    app.status_message = "Query submitted successfully!".to_string();
                    if closes {
                        // Closed before any success window was scheduled.
                        app.take_form(scope);
                        return Vec::new();
                    }
                    vec![Effect::ScheduleRevert {
                        scope,
                        instance,
                        after: app.success_window,
                    }]
                }
                Resolution::Failed => {
                    app.status_message = "Submission failed".to_string();
                    Vec::new()
                }
                Resolution::Ignored => Vec::new(),
            }
        }
        Action::SuccessWindowElapsed { scope, instance } => {
            match app
                .form_mut(scope)
                .filter(|form| form.instance() == instance)
            {
                Some(form) => {
                    form.pipeline.elapse_success_window();
                }
                None => debug!(
                    "Success window elapsed for closed form {:?}/{}",
                    scope, instance
                ),
            }
            Vec::new()
        }
        Action::Quit => {
            let mut effects = unmount(app);
            effects.push(Effect::Quit);
            effects
        }
    }
}

fn unmount(app: &mut App) -> Vec<Effect> {
    info!("Unmounting all sections");
    let mut effects = Vec::new();
    if app.contact.take().is_some() {
        effects.push(Effect::CancelRevert {
            scope: FormScope::Contact,
        });
    }
    for (i, view) in app.sections.iter_mut().enumerate() {
        if view.inquiry.is_some() {
            effects.push(Effect::CancelRevert {
                scope: FormScope::Section(i),
            });
        }
        effects.extend(rotation_effect(i, view.unmount()));
    }
    effects
}
