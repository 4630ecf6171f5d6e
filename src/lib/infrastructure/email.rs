//! Mailgun email delivery

mod form;
mod html;
mod mailgun;
mod multipart;

pub use form::{FormFields, FormValue};
pub use html::strip_tags;
pub use mailgun::{encode_message, MailgunConfig, MailgunMailer, QUEUED_MESSAGE};
pub use multipart::{generate_boundary, EncodedForm, MultipartForm};
