//! Redefine library exports for testing

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub mod catalog;
pub mod core;
pub mod runtime;
pub mod tui;

#[cfg(test)]
pub mod test_support;

/// Catalog section shown on start-up.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Deserialize, Serialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Section {
    #[default]
    Courses,
    AllCourses,
    Mentors,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Courses, Section::AllCourses, Section::Mentors];

    /// Position among the app's sections.
    pub fn index(self) -> usize {
        match self {
            Section::Courses => 0,
            Section::AllCourses => 1,
            Section::Mentors => 2,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Section::Courses => "Courses",
            Section::AllCourses => "All Courses",
            Section::Mentors => "Mentors",
        }
    }
}
