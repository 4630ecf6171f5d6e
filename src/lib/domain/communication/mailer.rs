//! Email service module

use async_trait::async_trait;

#[cfg(test)]
use mockall::mock;

mod errors;
pub mod message;

pub use errors::{MailerError, SendResult};
pub use message::{
    AttachmentInput, HeaderInput, Message, MessageDefaults, ProviderCredentials, TEXT_HTML,
    TEXT_PLAIN,
};

/// Email service
#[async_trait]
pub trait Mailer: Send + Sync + 'static {
    /// Send an email
    ///
    /// # Arguments
    /// * `message` - The normalized [`Message`] to deliver.
    /// * `credentials` - The [`ProviderCredentials`] to authenticate with.
    ///
    /// # Returns
    /// A [`SendResult`] which is [`Ok`] once the provider has accepted the message,
    /// or an [`Err`] containing the [`MailerError`] that stopped it.
    async fn send(&self, message: &Message, credentials: &ProviderCredentials) -> SendResult;
}

#[cfg(test)]
mock! {
    pub Mailer {}

    #[async_trait]
    impl Mailer for Mailer {
        async fn send(&self, message: &Message, credentials: &ProviderCredentials) -> SendResult;
    }
}
