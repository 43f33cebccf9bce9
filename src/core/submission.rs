//! # Submission Pipeline
//!
//! Validate → send → report, for one inquiry form instance.
//!
//! ```text
//!            submit() ok                resolve(Ok)
//!   Idle ───────────────► Submitting ─────────────► Succeeded ──(window)──► Idle
//!    ▲                        │
//!    │                        │ resolve(Err)
//!    │                        ▼
//!    └──── submit() ok ◄─── Failed(message)
//! ```
//!
//! `submit()` never touches the network. On a clean validation pass it moves
//! to `Submitting` and hands back the [`InquiryPayload`] to send; the caller
//! performs exactly one write and feeds the outcome into `resolve()`. While
//! `Submitting`, further submits are rejected and the fields are read-only.
//!
//! The pipeline doesn't own a timer. The success display window is scheduled
//! by the runtime and delivered through [`SubmissionPipeline::elapse_success_window`].

use std::time::Duration;

use log::{debug, info, warn};

use crate::catalog::{BackendError, InquiryPayload};
use crate::core::validation::{
    Field, FieldErrors, FieldSource, INQUIRY_RULES, revalidate_field, validate,
};

/// How long `Succeeded` stays visible before reverting to `Idle`.
pub const SUCCESS_DISPLAY_WINDOW: Duration = Duration::from_millis(5000);

/// Shown when a failed write carries no server message.
pub const SUBMIT_FALLBACK_MESSAGE: &str = "Failed to submit query. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Submitting,
    Succeeded,
    Failed(String),
}

/// Raw, user-editable form values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InquiryForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
}

impl InquiryForm {
    pub fn value_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Phone => &mut self.phone,
            Field::Subject => &mut self.subject,
            Field::Message => &mut self.message,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl FieldSource for InquiryForm {
    fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::Subject => &self.subject,
            Field::Message => &self.message,
        }
    }
}

/// Current user, if known. Only used to prefill name and email.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Why `submit()` refused to produce a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitRejection {
    /// A submission for this instance is already in flight.
    InFlight,
    /// Local validation failed; nothing was sent.
    Invalid(FieldErrors),
}

/// What `resolve()` did with a network outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Succeeded,
    Failed,
    /// Nothing was in flight.
    Ignored,
}

pub struct SubmissionPipeline {
    instance: u64,
    form: InquiryForm,
    linked_item: Option<String>,
    state: SubmissionState,
    errors: FieldErrors,
}

impl SubmissionPipeline {
    /// `instance` must be unique per opened form; late results are matched
    /// against it.
    pub fn new(instance: u64, form: InquiryForm, linked_item: Option<String>) -> Self {
        Self {
            instance,
            form,
            linked_item,
            state: SubmissionState::Idle,
            errors: FieldErrors::default(),
        }
    }

    pub fn instance(&self) -> u64 {
        self.instance
    }

    pub fn form(&self) -> &InquiryForm {
        &self.form
    }

    pub fn linked_item(&self) -> Option<&str> {
        self.linked_item.as_deref()
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn is_submitting(&self) -> bool {
        self.state == SubmissionState::Submitting
    }

    /// Validates everything and, if clean, moves to `Submitting`.
    pub fn submit(&mut self) -> Result<InquiryPayload, SubmitRejection> {
        if self.is_submitting() {
            debug!("Submit ignored: instance {} already in flight", self.instance);
            return Err(SubmitRejection::InFlight);
        }

        if let Err(errors) = validate(INQUIRY_RULES, &self.form) {
            debug!(
                "Inquiry {} rejected locally ({} field errors)",
                self.instance,
                errors.len()
            );
            self.errors = errors.clone();
            return Err(SubmitRejection::Invalid(errors));
        }

        self.errors.clear();
        self.state = SubmissionState::Submitting;
        Ok(self.payload())
    }

    fn payload(&self) -> InquiryPayload {
        let phone = self.form.phone.trim();
        InquiryPayload {
            name: self.form.name.trim().to_string(),
            email: self.form.email.trim().to_string(),
            subject: self.form.subject.trim().to_string(),
            message: self.form.message.trim().to_string(),
            phone: (!phone.is_empty()).then(|| phone.to_string()),
            course: self.linked_item.clone(),
        }
    }

    /// Applies the outcome of the single network write.
    pub fn resolve(&mut self, result: Result<(), BackendError>) -> Resolution {
        if !self.is_submitting() {
            warn!(
                "Submission result for instance {} arrived while {:?}",
                self.instance, self.state
            );
            return Resolution::Ignored;
        }

        match result {
            Ok(()) => {
                info!("Inquiry {} submitted", self.instance);
                self.form.clear();
                self.errors.clear();
                self.state = SubmissionState::Succeeded;
                Resolution::Succeeded
            }
            Err(e) => {
                warn!("Inquiry {} failed: {}", self.instance, e);
                let message = e
                    .server_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| SUBMIT_FALLBACK_MESSAGE.to_string());
                self.state = SubmissionState::Failed(message);
                Resolution::Failed
            }
        }
    }

    /// Display window over: `Succeeded` reverts to `Idle`. Returns whether
    /// anything changed.
    pub fn elapse_success_window(&mut self) -> bool {
        if self.state == SubmissionState::Succeeded {
            self.state = SubmissionState::Idle;
            true
        } else {
            false
        }
    }

    /// Appends text to `field`. No-op while submitting.
    pub fn input(&mut self, field: Field, text: &str) -> bool {
        if self.is_submitting() {
            return false;
        }
        self.form.value_mut(field).push_str(text);
        self.after_edit(field);
        true
    }

    pub fn backspace(&mut self, field: Field) -> bool {
        if self.is_submitting() {
            return false;
        }
        if self.form.value_mut(field).pop().is_none() {
            return false;
        }
        self.after_edit(field);
        true
    }

    // Once errors are on screen, keep the edited field's error current.
    fn after_edit(&mut self, field: Field) {
        if !self.errors.is_empty() {
            revalidate_field(INQUIRY_RULES, &self.form, field, &mut self.errors);
        }
    }
}
