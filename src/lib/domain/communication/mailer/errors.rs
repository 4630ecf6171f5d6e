//! Mailer errors

use std::path::PathBuf;

use thiserror::Error;

/// Mailer errors
#[derive(Debug, Error)]
pub enum MailerError {
    /// The API key or sending domain is missing
    #[error("Missing provider credentials")]
    MissingCredentials,

    /// An attachment could not be read
    #[error("Could not read attachment {}", path.display())]
    AttachmentUnreadable {
        /// The attachment's path
        path: PathBuf,

        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The request never reached the provider, or no response arrived
    #[error("Could not reach the email provider")]
    Transport(#[source] anyhow::Error),

    /// The provider answered with a status other than 200
    #[error("The email provider rejected the message with status {status}")]
    ProviderRejected {
        /// The HTTP status code
        status: u16,
    },

    /// The provider answered 200 but did not confirm the message was queued
    #[error("Unexpected response from the email provider")]
    UnexpectedResponse,
}

impl MailerError {
    /// The provider's HTTP status code, if it rejected the message
    pub fn status(&self) -> Option<u16> {
        match self {
            MailerError::ProviderRejected { status } => Some(*status),
            _ => None,
        }
    }
}

/// Outcome of a single send attempt
pub type SendResult = Result<(), MailerError>;
