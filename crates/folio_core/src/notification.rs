//! Toast content for contact form outcomes. Rendering is left to the UI.

use shared::protocol::ContactReceipt;

use crate::contact::FormError;

pub const SENT_TEXT: &str = "Message sent successfully! I'll get back to you soon.";
pub const FIX_ERRORS_TEXT: &str = "Please fix the errors in the form";
pub const SEND_FAILED_TEXT: &str = "Failed to send message. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub text: &'static str,
}

impl Notification {
    /// `None` for outcomes that show no toast (a click ignored while a
    /// submission is already running).
    pub fn for_result(result: &Result<ContactReceipt, FormError>) -> Option<Self> {
        let (level, text) = match result {
            Ok(_) => (NotificationLevel::Success, SENT_TEXT),
            Err(FormError::Validation(_)) => (NotificationLevel::Error, FIX_ERRORS_TEXT),
            Err(FormError::Submission(_)) => (NotificationLevel::Error, SEND_FAILED_TEXT),
            Err(FormError::AlreadySubmitting) => return None,
        };
        Some(Self { level, text })
    }
}
