//! # Application State
//!
//! Core business state for Redefine. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── sections: Vec<ContentCatalogView>   // Courses, All Courses, Mentors
//! ├── active: usize                       // visible section
//! ├── contact: Option<FormSession>        // general contact form
//! ├── identity: Identity                  // prefill for new forms
//! ├── status_message: String              // status bar text
//! ├── success_window: Duration            // Succeeded → Idle delay
//! └── next_instance: u64                  // form instance counter
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.
//! This keeps things predictable, so no surprise mutations.

use std::time::Duration;

use crate::Section;
use crate::catalog::{CollectionKind, FetchParams};
use crate::core::catalog_view::{ContentCatalogView, PresentationMode};
use crate::core::config::ResolvedConfig;
use crate::core::inquiry::FormSession;
use crate::core::submission::Identity;

/// Which form a submission or timer belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormScope {
    /// Item inquiry opened from the section at this index.
    Section(usize),
    /// The general contact form.
    Contact,
}

pub struct App {
    pub sections: Vec<ContentCatalogView>,
    pub active: usize,
    pub contact: Option<FormSession>,
    pub identity: Identity,
    pub status_message: String,
    pub success_window: Duration,
    next_instance: u64,
}

impl App {
    pub fn new(
        sections: Vec<ContentCatalogView>,
        identity: Identity,
        success_window: Duration,
    ) -> Self {
        Self {
            sections,
            active: 0,
            contact: None,
            identity,
            status_message: String::from("Welcome to Redefine!"),
            success_window,
            next_instance: 0,
        }
    }

    /// The three catalog sections, configured from `config`.
    pub fn from_config(config: &ResolvedConfig) -> Self {
        let mentor_params = if config.mentors_featured_only {
            FetchParams::default().with_filter("featured", "true")
        } else {
            FetchParams::default()
        };

        let sections = Section::ALL
            .iter()
            .map(|section| {
                let (kind, params, mode) = match section {
                    Section::Courses => (
                        CollectionKind::Courses,
                        FetchParams::default().with_limit(config.courses_limit),
                        PresentationMode::Strip,
                    ),
                    Section::AllCourses => (
                        CollectionKind::Courses,
                        FetchParams::default().with_limit(config.all_courses_limit),
                        PresentationMode::Grid,
                    ),
                    Section::Mentors => (
                        CollectionKind::Mentors,
                        mentor_params.clone(),
                        PresentationMode::Strip,
                    ),
                };
                ContentCatalogView::new(
                    section.title(),
                    kind,
                    params,
                    mode,
                    config.rotation_interval,
                )
            })
            .collect();

        let mut app = Self::new(sections, config.identity.clone(), config.success_window);
        app.active = config.initial_section.index();
        app
    }

    pub fn active_section(&self) -> Option<&ContentCatalogView> {
        self.sections.get(self.active)
    }

    pub fn active_section_mut(&mut self) -> Option<&mut ContentCatalogView> {
        self.sections.get_mut(self.active)
    }

    /// Hands out a fresh form instance id.
    pub fn next_instance(&mut self) -> u64 {
        self.next_instance += 1;
        self.next_instance
    }

    pub fn form(&self, scope: FormScope) -> Option<&FormSession> {
        match scope {
            FormScope::Contact => self.contact.as_ref(),
            FormScope::Section(i) => self.sections.get(i).and_then(|s| s.inquiry.as_ref()),
        }
    }

    pub fn form_mut(&mut self, scope: FormScope) -> Option<&mut FormSession> {
        match scope {
            FormScope::Contact => self.contact.as_mut(),
            FormScope::Section(i) => self.sections.get_mut(i).and_then(|s| s.inquiry.as_mut()),
        }
    }

    /// The form on screen, if any. The contact form sits above section inquiries.
    pub fn active_form_scope(&self) -> Option<FormScope> {
        if self.contact.is_some() {
            Some(FormScope::Contact)
        } else if self.active_section().is_some_and(|s| s.inquiry.is_some()) {
            Some(FormScope::Section(self.active))
        } else {
            None
        }
    }

    pub fn active_form(&self) -> Option<&FormSession> {
        self.active_form_scope().and_then(|scope| self.form(scope))
    }

    pub fn active_form_mut(&mut self) -> Option<&mut FormSession> {
        self.active_form_scope().and_then(|scope| self.form_mut(scope))
    }

    /// Removes the form for `scope`, discarding its pipeline.
    pub fn take_form(&mut self, scope: FormScope) -> Option<FormSession> {
        match scope {
            FormScope::Contact => self.contact.take(),
            FormScope::Section(i) => self.sections.get_mut(i).and_then(|s| s.close_inquiry()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_app;

    #[test]
    fn test_app_new_defaults() {
        let app = test_app();
        assert_eq!(app.status_message, "Welcome to Redefine!");
        assert_eq!(app.sections.len(), 3);
        assert_eq!(app.active, 0);
        assert!(app.active_form().is_none());
    }

    #[test]
    fn test_from_config_builds_sections() {
        let app = test_app();
        let titles: Vec<&str> = app.sections.iter().map(|s| s.title()).collect();
        assert_eq!(titles, vec!["Courses", "All Courses", "Mentors"]);
        assert_eq!(app.sections[0].mode(), PresentationMode::Strip);
        assert_eq!(app.sections[1].mode(), PresentationMode::Grid);
        assert_eq!(app.sections[2].kind(), CollectionKind::Mentors);
    }

    #[test]
    fn test_initial_section_from_config() {
        let config = ResolvedConfig {
            initial_section: Section::Mentors,
            ..ResolvedConfig::default()
        };
        assert_eq!(App::from_config(&config).active, 2);
    }

    #[test]
    fn test_instances_are_unique() {
        let mut app = test_app();
        let a = app.next_instance();
        let b = app.next_instance();
        assert_ne!(a, b);
    }

    #[test]
    fn test_contact_form_takes_precedence() {
        let mut app = test_app();
        app.contact = Some(FormSession::general(1, &Identity::default()));
        assert_eq!(app.active_form_scope(), Some(FormScope::Contact));
        assert!(app.take_form(FormScope::Contact).is_some());
        assert_eq!(app.active_form_scope(), None);
    }
}
