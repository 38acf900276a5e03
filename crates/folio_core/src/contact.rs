use std::collections::BTreeSet;

use shared::{
    domain::{ContactFields, FieldErrors, FieldName},
    error::{SubmissionFailure, ValidationFailure},
    protocol::{ContactMessage, ContactReceipt},
    validation::{validate_all, validate_field, MESSAGE_MAX_CHARS},
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::transport::MessageSender;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error(transparent)]
    Validation(#[from] ValidationFailure),
    #[error(transparent)]
    Submission(#[from] SubmissionFailure),
    #[error("a submission is already in flight")]
    AlreadySubmitting,
}

/// Identifies one call to [`ContactForm::begin_submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubmissionTicket(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmission {
    pub ticket: SubmissionTicket,
    pub message: ContactMessage,
}

/// Contact form state: values, touched fields and per-field errors.
///
/// Errors are stored for any field but only surfaced through
/// [`ContactForm::displayed_error`] once the field has been blurred, or
/// after a submit attempt marks every field touched.
#[derive(Debug, Default)]
pub struct ContactForm {
    fields: ContactFields,
    touched: BTreeSet<FieldName>,
    errors: FieldErrors,
    in_flight: Option<SubmissionTicket>,
    next_ticket: u64,
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields(&self) -> &ContactFields {
        &self.fields
    }

    pub fn value(&self, field: FieldName) -> &str {
        self.fields.get(field)
    }

    pub fn is_touched(&self, field: FieldName) -> bool {
        self.touched.contains(&field)
    }

    /// Stored errors, including ones not yet displayed.
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn on_field_change(&mut self, field: FieldName, value: impl Into<String>) {
        self.fields.set(field, value);
        if self.errors.remove(field).is_some() {
            debug!(%field, "contact: cleared error on edit");
        }
    }

    pub fn on_field_blur(&mut self, field: FieldName) {
        self.touched.insert(field);
        match validate_field(field, self.fields.get(field)) {
            Some(error) => self.errors.insert(field, error),
            None => {
                self.errors.remove(field);
            }
        }
    }

    pub fn displayed_error(&self, field: FieldName) -> Option<&str> {
        if self.is_touched(field) {
            self.errors.get(field)
        } else {
            None
        }
    }

    pub fn displayed_errors(&self) -> impl Iterator<Item = (FieldName, &str)> {
        self.errors
            .iter()
            .filter(|(field, _)| self.touched.contains(field))
    }

    /// Character counter for the message input: `(used, limit)`.
    pub fn message_length(&self) -> (usize, usize) {
        (self.fields.message.chars().count(), MESSAGE_MAX_CHARS)
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Validates every field and, when all pass, marks a submission in
    /// flight. The caller performs the send and reports back through
    /// [`ContactForm::finish_submit`].
    pub fn begin_submit(&mut self) -> Result<PendingSubmission, FormError> {
        if self.in_flight.is_some() {
            return Err(FormError::AlreadySubmitting);
        }

        let errors = validate_all(&self.fields);
        if !errors.is_empty() {
            self.touched.extend(FieldName::ALL);
            self.errors = errors.clone();
            info!(invalid_fields = errors.len(), "contact: submit blocked by validation");
            return Err(ValidationFailure::new(errors).into());
        }

        self.errors.clear();
        let ticket = SubmissionTicket(self.next_ticket);
        self.next_ticket += 1;
        self.in_flight = Some(ticket);
        info!(ticket = ticket.0, "contact: submission started");

        Ok(PendingSubmission {
            ticket,
            message: ContactMessage::from_fields(&self.fields),
        })
    }

    /// Applies the outcome of the send started with `ticket`.
    ///
    /// Returns `None` without touching state when the ticket is no longer
    /// in flight. On success the form is cleared; on failure all values
    /// are kept so the user can retry.
    pub fn finish_submit(
        &mut self,
        ticket: SubmissionTicket,
        result: Result<ContactReceipt, SubmissionFailure>,
    ) -> Option<Result<ContactReceipt, SubmissionFailure>> {
        if self.in_flight != Some(ticket) {
            debug!(ticket = ticket.0, "contact: ignoring stale submission result");
            return None;
        }
        self.in_flight = None;

        match &result {
            Ok(receipt) => {
                info!(
                    ticket = ticket.0,
                    message_id = %receipt.message_id,
                    "contact: message delivered"
                );
                self.clear_values();
            }
            Err(error) => warn!(ticket = ticket.0, %error, "contact: submission failed"),
        }
        Some(result)
    }

    /// Forgets the in-flight submission; a late result for it is ignored.
    pub fn abandon_submission(&mut self) -> bool {
        match self.in_flight.take() {
            Some(ticket) => {
                info!(ticket = ticket.0, "contact: submission abandoned");
                true
            }
            None => false,
        }
    }

    /// Validates, sends through `sender` and applies the result.
    ///
    /// Dropping the returned future cancels the send and leaves the form
    /// values as they were.
    pub async fn submit<S>(&mut self, sender: &S) -> Result<ContactReceipt, FormError>
    where
        S: MessageSender + ?Sized,
    {
        let pending = self.begin_submit()?;
        let guard = InFlightGuard {
            form: self,
            ticket: pending.ticket,
            armed: true,
        };
        let result = sender.send(&pending.message).await;
        guard.finish(result)
    }

    pub fn reset(&mut self) {
        self.abandon_submission();
        self.clear_values();
    }

    fn clear_values(&mut self) {
        self.fields = ContactFields::default();
        self.touched.clear();
        self.errors.clear();
    }
}

/// Releases the in-flight ticket if [`ContactForm::submit`] is dropped
/// before the send completes.
struct InFlightGuard<'a> {
    form: &'a mut ContactForm,
    ticket: SubmissionTicket,
    armed: bool,
}

impl InFlightGuard<'_> {
    fn finish(
        mut self,
        result: Result<ContactReceipt, SubmissionFailure>,
    ) -> Result<ContactReceipt, FormError> {
        self.armed = false;
        self.form
            .finish_submit(self.ticket, result)
            .unwrap_or(Err(SubmissionFailure::Cancelled))
            .map_err(FormError::from)
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if self.armed && self.form.in_flight == Some(self.ticket) {
            self.form.in_flight = None;
            warn!(ticket = self.ticket.0, "contact: submission cancelled mid-flight");
        }
    }
}

#[cfg(test)]
#[path = "tests/contact_tests.rs"]
mod tests;
