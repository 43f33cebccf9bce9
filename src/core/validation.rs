//! # Validation Rules
//!
//! Declarative per-field constraints for the inquiry form. Rules are data
//! ([`INQUIRY_RULES`]); [`validate`] walks every rule and reports every
//! violated field at once, never just the first.
//!
//! Violations are stored as [`ErrorKind`] values. The text shown to the user
//! is resolved at the presentation boundary via [`ErrorKind::message`].

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

/// Inquiry form fields, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Email,
    Phone,
    Subject,
    Message,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Name,
        Field::Email,
        Field::Phone,
        Field::Subject,
        Field::Message,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Your Name *",
            Field::Email => "Email *",
            Field::Phone => "Phone (Optional)",
            Field::Subject => "Subject *",
            Field::Message => "Your Message *",
        }
    }

    pub fn next(self) -> Field {
        let i = Field::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Field::ALL[(i + 1) % Field::ALL.len()]
    }

    pub fn prev(self) -> Field {
        let i = Field::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Field::ALL[(i + Field::ALL.len() - 1) % Field::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Required,
    InvalidFormat,
}

impl ErrorKind {
    /// User-facing text for this violation on `field`.
    pub fn message(self, field: Field) -> &'static str {
        match (self, field) {
            (ErrorKind::Required, Field::Name) => "Name is required",
            (ErrorKind::Required, Field::Email) => "Email is required",
            (ErrorKind::Required, Field::Phone) => "Phone is required",
            (ErrorKind::Required, Field::Subject) => "Subject is required",
            (ErrorKind::Required, Field::Message) => "Message is required",
            (ErrorKind::InvalidFormat, Field::Email) => "Invalid email address",
            (ErrorKind::InvalidFormat, _) => "Invalid value",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Non-empty after trimming whitespace.
    Required,
    /// Matches `^[^\s@]+@[^\s@]+\.[^\s@]+$`, case-insensitive.
    EmailAddress,
}

impl Constraint {
    fn check(self, value: &str) -> Result<(), ErrorKind> {
        match self {
            Constraint::Required if value.trim().is_empty() => Err(ErrorKind::Required),
            Constraint::EmailAddress
                if !value.trim().is_empty() && !EMAIL_PATTERN.is_match(value.trim()) =>
            {
                Err(ErrorKind::InvalidFormat)
            }
            _ => Ok(()),
        }
    }
}

pub struct FieldRule {
    pub field: Field,
    /// Checked in order; the first violation is the one reported for the field.
    pub constraints: &'static [Constraint],
}

pub const INQUIRY_RULES: &[FieldRule] = &[
    FieldRule {
        field: Field::Name,
        constraints: &[Constraint::Required],
    },
    FieldRule {
        field: Field::Email,
        constraints: &[Constraint::Required, Constraint::EmailAddress],
    },
    FieldRule {
        field: Field::Phone,
        constraints: &[],
    },
    FieldRule {
        field: Field::Subject,
        constraints: &[Constraint::Required],
    },
    FieldRule {
        field: Field::Message,
        constraints: &[Constraint::Required],
    },
];

/// Anything that can hand out a value per field.
pub trait FieldSource {
    fn value(&self, field: Field) -> &str;
}

/// Field-scoped violations, at most one per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, ErrorKind>);

impl FieldErrors {
    pub fn get(&self, field: Field) -> Option<ErrorKind> {
        self.0.get(&field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, ErrorKind)> + '_ {
        self.0.iter().map(|(f, k)| (*f, *k))
    }

    fn set(&mut self, field: Field, result: Result<(), ErrorKind>) {
        match result {
            Ok(()) => self.0.remove(&field),
            Err(kind) => self.0.insert(field, kind),
        };
    }
}

fn check_rule(rule: &FieldRule, value: &str) -> Result<(), ErrorKind> {
    rule.constraints.iter().try_for_each(|c| c.check(value))
}

/// Runs every rule against `source`.
pub fn validate(rules: &[FieldRule], source: &impl FieldSource) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();
    for rule in rules {
        errors.set(rule.field, check_rule(rule, source.value(rule.field)));
    }
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Re-checks a single field, updating `errors` in place.
pub fn revalidate_field(
    rules: &[FieldRule],
    source: &impl FieldSource,
    field: Field,
    errors: &mut FieldErrors,
) {
    if let Some(rule) = rules.iter().find(|r| r.field == field) {
        errors.set(field, check_rule(rule, source.value(field)));
    }
}
