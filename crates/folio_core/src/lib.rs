//! Client-side state machines for the portfolio site: the typewriter
//! phrase cycler and the contact form.

pub mod contact;
pub mod driver;
pub mod notification;
pub mod transport;
pub mod typing;

pub use contact::{ContactForm, FormError, PendingSubmission, SubmissionTicket};
pub use driver::{TypingFrame, TypingHandle};
pub use notification::{Notification, NotificationLevel};
pub use transport::{HttpMessageSender, MessageSender, SenderError, DEFAULT_SEND_TIMEOUT};
pub use typing::{TypingCycler, TypingError, TypingMode, TypingTiming, DEFAULT_PHRASES};
