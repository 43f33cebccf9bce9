//! # Core Application Logic
//!
//! This module contains Redefine's business logic.
//! It knows nothing about any specific UI technology, and it never waits on
//! the network or a clock: fetches, submissions and timers are requested as
//! effects and come back as actions.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │ Vec<Effect>
//!                    ┌───────────┴─────────────┐
//!                    ▼                         ▼
//!             ┌────────────┐            ┌────────────┐
//!             │  Runtime   │            │    TUI     │
//!             │  (tokio)   │            │ (ratatui)  │
//!             └────────────┘            └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: The `Action` and `Effect` enums plus `update()`
//! - [`catalog_view`]: One catalog section (fetch + rotation + inquiry)
//! - [`fetcher`]: Generation-guarded remote collection state
//! - [`rotator`]: Carousel index policy
//! - [`submission`]: Inquiry validation and submission lifecycle
//! - [`inquiry`]: An open form (context, pipeline, focus)
//! - [`validation`]: Declarative field rules
//! - [`config`]: Settings with override hierarchy

pub mod action;
pub mod catalog_view;
pub mod config;
pub mod fetcher;
pub mod inquiry;
pub mod rotator;
pub mod state;
pub mod submission;
pub mod validation;
