//! Outbound email: normalization, the mailer seam and the legacy entry point.

mod normalizer;
mod service;
mod test_email;

pub mod mailer;

pub use normalizer::normalize;
pub use service::MailService;
pub use test_email::{EmailKind, TestEmail, TestEmailError, DEFAULT_SUBJECT};
