//! Mail service

use std::sync::Arc;

use tracing::{debug, error, info};

use super::{
    mailer::{
        AttachmentInput, HeaderInput, Mailer, MailerError, MessageDefaults, ProviderCredentials,
        SendResult,
    },
    normalizer::normalize,
};

/// Sends `wp_mail`-style calls through a [`Mailer`]
#[derive(Debug, Clone)]
pub struct MailService<M>
where
    M: Mailer,
{
    mailer: Arc<M>,
    credentials: ProviderCredentials,
    defaults: MessageDefaults,
}

impl<M> MailService<M>
where
    M: Mailer,
{
    /// Creates a new mail service.
    pub fn new(mailer: Arc<M>, credentials: ProviderCredentials, defaults: MessageDefaults) -> Self {
        Self {
            mailer,
            credentials,
            defaults,
        }
    }

    /// Sends an email, reporting why it failed.
    ///
    /// # Arguments
    /// * `to` - Recipient, or a comma-separated list of recipients.
    /// * `subject` - The subject of the email.
    /// * `body` - The body of the email.
    /// * `headers` - Additional headers.
    /// * `attachments` - Files to attach.
    ///
    /// # Returns
    /// A [`SendResult`] which is [`Ok`] once the provider confirmed the message was queued.
    pub async fn send(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        headers: &HeaderInput,
        attachments: &AttachmentInput,
    ) -> SendResult {
        if !self.credentials.is_complete() {
            return Err(MailerError::MissingCredentials);
        }

        let message = normalize(
            &[to.to_string()],
            subject,
            body,
            headers,
            attachments,
            &self.defaults,
        );

        debug!(
            content_type = %message.content_type,
            attachments = message.attachments.len(),
            "sending email"
        );

        self.mailer.send(&message, &self.credentials).await
    }

    /// Sends an email, returning `true` only if the provider accepted it.
    pub async fn send_mail(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        headers: &HeaderInput,
        attachments: &AttachmentInput,
    ) -> bool {
        match self.send(to, subject, body, headers, attachments).await {
            Ok(()) => {
                info!("email accepted by provider");

                true
            }
            Err(err) => {
                error!(status = ?err.status(), "email not sent: {err}");

                false
            }
        }
    }
}
