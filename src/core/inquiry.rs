//! An open inquiry form: what it is about, its pipeline, and which field has
//! focus. Dropping a `FormSession` discards its pipeline.

use crate::catalog::CatalogItem;
use crate::core::submission::{Identity, InquiryForm, SubmissionPipeline};
use crate::core::validation::Field;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormContext {
    /// Asking about one catalog item.
    Item { id: String, title: String },
    /// Free-standing contact form.
    General,
}

pub struct FormSession {
    pub context: FormContext,
    pub pipeline: SubmissionPipeline,
    pub focus: Field,
}

impl FormSession {
    pub fn for_item(instance: u64, item: &CatalogItem, identity: &Identity) -> Self {
        let mut form = prefilled(identity);
        form.subject = item.default_subject();
        Self {
            context: FormContext::Item {
                id: item.id.clone(),
                title: item.title.clone(),
            },
            pipeline: SubmissionPipeline::new(instance, form, Some(item.id.clone())),
            focus: first_focus(identity),
        }
    }

    pub fn general(instance: u64, identity: &Identity) -> Self {
        Self {
            context: FormContext::General,
            pipeline: SubmissionPipeline::new(instance, prefilled(identity), None),
            focus: first_focus(identity),
        }
    }

    pub fn instance(&self) -> u64 {
        self.pipeline.instance()
    }

    pub fn title(&self) -> String {
        match &self.context {
            FormContext::Item { title, .. } => format!("Ask about {title}"),
            FormContext::General => "Contact us".to_string(),
        }
    }

    /// Item inquiries are dismissed by their success notification; the
    /// general form stays up and shows the success banner.
    pub fn closes_on_success(&self) -> bool {
        matches!(self.context, FormContext::Item { .. })
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn input(&mut self, text: &str) -> bool {
        self.pipeline.input(self.focus, text)
    }

    pub fn backspace(&mut self) -> bool {
        self.pipeline.backspace(self.focus)
    }
}

fn prefilled(identity: &Identity) -> InquiryForm {
    InquiryForm {
        name: identity.name.clone().unwrap_or_default(),
        email: identity.email.clone().unwrap_or_default(),
        ..InquiryForm::default()
    }
}

// Skip past what the identity already filled in.
fn first_focus(identity: &Identity) -> Field {
    match (&identity.name, &identity.email) {
        (Some(_), Some(_)) => Field::Phone,
        (Some(_), None) => Field::Email,
        _ => Field::Name,
    }
}
