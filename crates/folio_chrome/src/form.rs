//! Contact form
//!
//! Validation, inline error rendering, the live character counter and the
//! asynchronous hand-off to the email relay with its success and failure
//! banners.

use folio_animation::{AnimationScheduler, Easing, Tween};
use folio_core::style::props;
use folio_core::{Document, ElementId, Property, Selector};
use regex::Regex;

use crate::error::{RelayError, Result};
use crate::relay::{ContactConfig, EmailRelay, TemplateParams};
use crate::task::{ChromeTask, CompletionTasks, Deferred};

pub const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
pub const MIN_MESSAGE_LEN: usize = 10;
/// How long the success banner stays up
pub const SUCCESS_HIDE_MS: f64 = 5000.0;
pub const SENDING_LABEL: &str = "Sending...";

const ERROR_COLOR: &str = "var(--accent-color)";
const MUTED_COLOR: &str = "var(--text-muted)";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Subject,
    Message,
}

impl Field {
    /// Element id of the field's control
    pub fn id(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Subject => "subject",
            Field::Message => "message",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: &'static str,
}

/// Values read from the form at submit time
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub budget: String,
    pub message: String,
    pub newsletter: bool,
}

impl ContactSubmission {
    pub fn params(&self) -> TemplateParams {
        let budget = if self.budget.is_empty() {
            "Not specified".to_string()
        } else {
            self.budget.clone()
        };
        TemplateParams {
            from_name: self.name.clone(),
            from_email: self.email.clone(),
            subject: self.subject.clone(),
            budget,
            message: self.message.clone(),
            newsletter: if self.newsletter { "Yes" } else { "No" }.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Validator {
    email: Regex,
}

impl Validator {
    pub fn new() -> Result<Self> {
        Ok(Self {
            email: Regex::new(EMAIL_PATTERN)?,
        })
    }

    pub fn is_email(&self, value: &str) -> bool {
        self.email.is_match(value)
    }

    /// Every rule the submission breaks, in field order
    pub fn validate(&self, submission: &ContactSubmission) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if submission.name.trim().chars().count() < 2 {
            errors.push(FieldError {
                field: Field::Name,
                message: "Please enter your full name",
            });
        }
        if !self.is_email(&submission.email) {
            errors.push(FieldError {
                field: Field::Email,
                message: "Please enter a valid email address",
            });
        }
        if submission.subject.trim().chars().count() < 3 {
            errors.push(FieldError {
                field: Field::Subject,
                message: "Please enter a subject",
            });
        }
        if submission.message.trim().chars().count() < MIN_MESSAGE_LEN {
            errors.push(FieldError {
                field: Field::Message,
                message: "Please enter a message (at least 10 characters)",
            });
        }
        errors
    }
}

/// Text of the message character counter
pub fn counter_text(length: usize) -> String {
    if length < MIN_MESSAGE_LEN {
        format!("{} characters remaining", MIN_MESSAGE_LEN - length)
    } else {
        format!("{} characters", length)
    }
}

/// How a submit attempt ended
#[derive(Clone, Debug, PartialEq)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was sent
    Invalid(Vec<FieldError>),
    Sent,
    Failed(RelayError),
}

impl SubmitOutcome {
    /// Follow-up work the host must schedule
    pub fn deferred(&self) -> Option<Deferred> {
        match self {
            SubmitOutcome::Sent => Some(Deferred::after(
                SUCCESS_HIDE_MS,
                ChromeTask::HideSuccessBanner,
            )),
            _ => None,
        }
    }
}

pub struct ContactForm {
    form: ElementId,
    submit: Option<ElementId>,
    success: Option<ElementId>,
    failure: Option<ElementId>,
    fields: Vec<ElementId>,
    message: Option<ElementId>,
    counter: Option<ElementId>,
    error_selector: Selector,
    validator: Validator,
}

impl ContactForm {
    /// Bind to `#contactForm`; `None` on pages without one
    ///
    /// Adds the character counter below the message field.
    pub fn setup(doc: &mut Document) -> Result<Option<Self>> {
        let Some(form) = doc.by_id("contactForm") else {
            return Ok(None);
        };
        let submit = doc.query_within(form, "button[type=\"submit\"]")?;
        let fields = doc.query_selector_all(".form-input, .form-textarea")?;
        let message = doc.by_id(Field::Message.id());

        let counter = message.and_then(|message| doc.parent(message)).map(|group| {
            let counter = doc.create_element("div");
            doc.add_class(counter, "character-counter");
            doc.set_style(counter, "text-align", "right");
            doc.set_style(counter, "color", MUTED_COLOR);
            doc.append_child(group, counter);
            counter
        });

        Ok(Some(Self {
            form,
            submit,
            success: doc.by_id("successMessage"),
            failure: doc.by_id("errorMessage"),
            fields,
            message,
            counter,
            error_selector: Selector::parse(".error-message")?,
            validator: Validator::new()?,
        }))
    }

    pub fn form(&self) -> ElementId {
        self.form
    }

    pub fn is_field(&self, element: ElementId) -> bool {
        self.fields.contains(&element)
    }

    pub fn counter(&self) -> Option<ElementId> {
        self.counter
    }

    /// Current values of the form controls
    pub fn read(&self, doc: &Document) -> ContactSubmission {
        let value = |id: &str| {
            doc.by_id(id)
                .and_then(|el| doc.get(el))
                .map(|el| el.value.clone())
                .unwrap_or_default()
        };
        ContactSubmission {
            name: value(Field::Name.id()),
            email: value(Field::Email.id()),
            subject: value(Field::Subject.id()),
            budget: value("budget"),
            message: value(Field::Message.id()),
            newsletter: doc
                .by_id("newsletter")
                .and_then(|el| doc.get(el))
                .is_some_and(|el| el.checked),
        }
    }

    /// Validate and send the form
    ///
    /// The submit button reads [`SENDING_LABEL`] and is disabled while the
    /// relay call is in flight.
    pub async fn submit(
        &self,
        doc: &mut Document,
        scheduler: &mut AnimationScheduler,
        relay: &mut dyn EmailRelay,
        config: &ContactConfig,
    ) -> SubmitOutcome {
        for banner in [self.success, self.failure].into_iter().flatten() {
            doc.remove_class(banner, "show");
        }

        let submission = self.read(doc);
        let errors = self.validator.validate(&submission);
        self.clear_errors(doc);
        if !errors.is_empty() {
            for error in &errors {
                self.show_field_error(doc, scheduler, error.field.id(), error.message);
            }
            tracing::debug!(errors = errors.len(), "Contact form rejected");
            return SubmitOutcome::Invalid(errors);
        }

        let label = self.submit.map(|button| {
            let label = doc.text(button).to_string();
            if let Some(el) = doc.get_mut(button) {
                el.disabled = true;
            }
            doc.set_text(button, SENDING_LABEL);
            label
        });

        let result = if config.is_configured() {
            relay.send(config, &submission.params()).await
        } else {
            Err(RelayError::NotConfigured)
        };

        let outcome = match result {
            Ok(()) => {
                if let Some(banner) = self.success {
                    doc.add_class(banner, "show");
                    self.reveal_banner(doc, scheduler, banner);
                }
                self.reset(doc);
                SubmitOutcome::Sent
            }
            Err(error) => {
                tracing::error!(%error, "Error sending contact message");
                if let Some(banner) = self.failure {
                    doc.add_class(banner, "show");
                    self.reveal_banner(doc, scheduler, banner);
                }
                SubmitOutcome::Failed(error)
            }
        };

        if let (Some(button), Some(label)) = (self.submit, label) {
            if let Some(el) = doc.get_mut(button) {
                el.disabled = false;
            }
            doc.set_text(button, label);
        }
        outcome
    }

    pub fn hide_success(&self, doc: &mut Document) {
        if let Some(banner) = self.success {
            doc.remove_class(banner, "show");
        }
    }

    /// Empty every control inside the form
    pub fn reset(&self, doc: &mut Document) {
        for el_id in doc.descendants(self.form) {
            let Some(el) = doc.get_mut(el_id) else {
                continue;
            };
            if matches!(el.tag.as_str(), "input" | "textarea" | "select") {
                el.value.clear();
                el.checked = false;
            }
        }
    }

    /// Re-check a field when it loses focus (only e-mail has a format rule)
    pub fn on_blur(
        &self,
        doc: &mut Document,
        scheduler: &mut AnimationScheduler,
        field: ElementId,
    ) {
        if !self.is_field(field) {
            return;
        }
        if let Some(existing) = self.error_in_group(doc, field) {
            doc.remove(existing);
        }
        doc.set_style(field, "border-color", "");

        let Some(el) = doc.get(field) else {
            return;
        };
        let name = el.attr("name").or(el.id.as_deref()).unwrap_or_default();
        let value = el.value.trim();
        if name == Field::Email.id() && !value.is_empty() && !self.validator.is_email(value) {
            self.show_field_error(doc, scheduler, Field::Email.id(), "Invalid email format");
        }
    }

    /// Fade out the field's error when it regains focus
    pub fn on_focus(
        &self,
        doc: &mut Document,
        scheduler: &mut AnimationScheduler,
        completions: &mut CompletionTasks,
        field: ElementId,
    ) {
        if !self.is_field(field) {
            return;
        }
        if let Some(existing) = self.error_in_group(doc, field) {
            let fade = scheduler.play(
                doc,
                Tween::to(
                    existing,
                    props([(Property::Opacity, 0.0), (Property::Y, -10.0)]),
                )
                .duration(200.0)
                .ease(Easing::Power1Out),
            );
            completions.on_complete(fade, ChromeTask::RemoveElement(existing));
        }
        doc.set_style(field, "border-color", "");
    }

    pub fn on_input(&self, doc: &mut Document, field: ElementId) {
        let (Some(message), Some(counter)) = (self.message, self.counter) else {
            return;
        };
        if field != message {
            return;
        }
        let length = doc.get(message).map(|el| el.value.chars().count()).unwrap_or(0);
        doc.set_text(counter, counter_text(length));
        let color = if length < MIN_MESSAGE_LEN {
            ERROR_COLOR
        } else {
            MUTED_COLOR
        };
        doc.set_style(counter, "color", color);
    }

    fn error_in_group(&self, doc: &Document, field: ElementId) -> Option<ElementId> {
        let group = doc.parent(field)?;
        doc.query_all_within(group, &self.error_selector)
            .into_iter()
            .next()
    }

    fn clear_errors(&self, doc: &mut Document) {
        for error in doc.query_all(&self.error_selector) {
            doc.remove(error);
        }
        for &field in &self.fields {
            doc.set_style(field, "border-color", "");
        }
    }

    fn show_field_error(
        &self,
        doc: &mut Document,
        scheduler: &mut AnimationScheduler,
        field_id: &str,
        message: &str,
    ) {
        let Some(field) = doc.by_id(field_id) else {
            return;
        };
        let Some(group) = doc.parent(field) else {
            return;
        };

        let error = doc.create_element("div");
        doc.add_class(error, "error-message");
        doc.set_style(error, "color", ERROR_COLOR);
        doc.set_text(error, message);
        let icon = doc.create_element("i");
        doc.add_class(icon, "fas");
        doc.add_class(icon, "fa-exclamation-circle");
        doc.append_child(error, icon);
        doc.append_child(group, error);
        doc.set_style(field, "border-color", ERROR_COLOR);

        scheduler.play(
            doc,
            Tween::from_to(
                error,
                props([(Property::Opacity, 0.0), (Property::Y, -10.0)]),
                props([(Property::Opacity, 1.0), (Property::Y, 0.0)]),
            )
            .duration(300.0)
            .ease(Easing::Power2Out),
        );
    }

    fn reveal_banner(
        &self,
        doc: &mut Document,
        scheduler: &mut AnimationScheduler,
        banner: ElementId,
    ) {
        scheduler.play(
            doc,
            Tween::from_to(
                banner,
                props([(Property::Opacity, 0.0), (Property::Y, -20.0)]),
                props([(Property::Opacity, 1.0), (Property::Y, 0.0)]),
            )
            .duration(500.0)
            .ease(Easing::Power2Out),
        );
    }
}
