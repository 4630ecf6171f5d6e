//! Infrastructure: the Mailgun transport and settings

pub mod email;
pub mod settings;
