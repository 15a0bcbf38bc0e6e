//! Pure per-step validation.
//!
//! `validate_step` inspects only the draft, so the wizard reducer and any
//! UI binding share one source of truth for what "complete" means. Errors
//! are field-addressed for inline rendering next to the offending input.

use crate::types::{BookingDraft, Contact, WizardStep};
use serde::Serialize;

/// Minimum length for name fields.
pub const MIN_NAME_LEN: usize = 2;

/// A validation failure attached to a single field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Stable field key, e.g. `"email"`
    pub field: &'static str,
    /// Human-readable message
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validates the data a step owns.
///
/// # Errors
///
/// Returns every failing field for the step, so the caller can render all
/// of them at once.
pub fn validate_step(step: WizardStep, draft: &BookingDraft) -> Result<(), Vec<FieldError>> {
    let errors = match step {
        WizardStep::SelectingServices => validate_services(draft),
        WizardStep::SelectingDateTime => validate_schedule(draft),
        WizardStep::EnteringContact => contact_errors(&draft.contact),
        // review introduces no new input
        WizardStep::Confirming => Vec::new(),
    };

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Validates contact details before they are merged into the draft.
///
/// # Errors
///
/// Returns every failing contact field.
pub fn validate_contact(contact: &Contact) -> Result<(), Vec<FieldError>> {
    let errors = contact_errors(contact);
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn validate_services(draft: &BookingDraft) -> Vec<FieldError> {
    if draft.services.is_empty() {
        vec![FieldError::new(
            "services",
            "Please select at least one service",
        )]
    } else {
        Vec::new()
    }
}

fn validate_schedule(draft: &BookingDraft) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if draft.date.is_none() {
        errors.push(FieldError::new("date", "This field is required"));
    }
    if draft.time_slot.is_none() {
        errors.push(FieldError::new("timeSlot", "This field is required"));
    }
    errors
}

fn contact_errors(contact: &Contact) -> Vec<FieldError> {
    let mut errors = Vec::new();

    push_name_error(&mut errors, "name", &contact.name);
    push_name_error(&mut errors, "lastname", &contact.lastname);

    if contact.phone.trim().is_empty() {
        errors.push(FieldError::new("telephone", "This field is required"));
    } else if !is_valid_phone(&contact.phone) {
        errors.push(FieldError::new(
            "telephone",
            "Please enter a valid phone number",
        ));
    }

    if contact.email.trim().is_empty() {
        errors.push(FieldError::new("email", "This field is required"));
    } else if !is_valid_email(&contact.email) {
        errors.push(FieldError::new(
            "email",
            "Please enter a valid email address",
        ));
    }

    errors
}

fn push_name_error(errors: &mut Vec<FieldError>, field: &'static str, value: &str) {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(FieldError::new(field, "This field is required"));
    } else if trimmed.chars().count() < MIN_NAME_LEN {
        errors.push(FieldError::new(field, "Minimum 2 characters required"));
    }
}

/// Permissive phone shape: digits plus common separators only.
fn is_valid_phone(phone: &str) -> bool {
    phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '+' | '(' | ')'))
}

/// Syntactic email check: one `@`, non-empty local part, dotted domain.
fn is_valid_email(email: &str) -> bool {
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    domain.split('.').count() >= 2 && domain.split('.').all(|label| !label.is_empty())
}
