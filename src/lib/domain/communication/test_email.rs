//! Test email

use thiserror::Error;

use super::{
    mailer::{AttachmentInput, HeaderInput, Mailer, SendResult},
    service::MailService,
};

/// Subject used when none is given
pub const DEFAULT_SUBJECT: &str = "WP MailGun Test Email";

/// Errors that prevent a test email from being sent
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TestEmailError {
    /// No recipient was given
    #[error("Missing recipient email address.")]
    MissingRecipient,

    /// The subject is empty
    #[error("Missing subject.")]
    MissingSubject,
}

/// The body format of a test email
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EmailKind {
    /// Plain text
    #[default]
    Text,

    /// HTML
    Html,
}

/// A test email used to check the provider settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestEmail {
    /// The recipient
    pub to: String,

    /// The subject
    pub subject: String,

    /// The body
    pub message: String,

    /// The body format
    pub kind: EmailKind,
}

impl TestEmail {
    /// Create a new test email, defaulting the subject when none is given
    pub fn new(
        to: &str,
        subject: Option<&str>,
        message: &str,
        kind: EmailKind,
    ) -> Result<Self, TestEmailError> {
        let to = to.trim();

        if to.is_empty() {
            return Err(TestEmailError::MissingRecipient);
        }

        let subject = subject.unwrap_or(DEFAULT_SUBJECT).trim();

        if subject.is_empty() {
            return Err(TestEmailError::MissingSubject);
        }

        Ok(Self {
            to: to.to_string(),
            subject: subject.to_string(),
            message: message.to_string(),
            kind,
        })
    }

    /// Headers for the email's body format
    pub fn headers(&self) -> HeaderInput {
        match self.kind {
            EmailKind::Text => HeaderInput::default(),
            EmailKind::Html => vec!["Content-Type: text/html; charset=UTF-8"].into(),
        }
    }

    /// Send the email through `service`
    pub async fn send<M: Mailer>(&self, service: &MailService<M>) -> SendResult {
        service
            .send(
                &self.to,
                &self.subject,
                &self.message,
                &self.headers(),
                &AttachmentInput::default(),
            )
            .await
    }

    /// A status message describing the outcome of [`TestEmail::send`]
    pub fn status_message(&self, result: &SendResult) -> String {
        match result {
            Ok(()) => format!("Email sent successfully to: {}", self.to),
            Err(err) => format!("Email failed to send: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use testresult::TestResult;

    use crate::domain::communication::mailer::{
        tests::MockMailer, MailerError, Message, MessageDefaults, ProviderCredentials, TEXT_HTML,
    };

    use super::*;

    #[test]
    fn test_missing_recipient() {
        let result = TestEmail::new("  ", None, "hello", EmailKind::Text);

        assert_eq!(result, Err(TestEmailError::MissingRecipient));
    }

    #[test]
    fn test_empty_subject() {
        let result = TestEmail::new("jane@doe.com", Some(""), "hello", EmailKind::Text);

        assert_eq!(result, Err(TestEmailError::MissingSubject));
    }

    #[test]
    fn test_default_subject() -> TestResult {
        let email = TestEmail::new("jane@doe.com", None, "hello", EmailKind::Text)?;

        assert_eq!(email.subject, "WP MailGun Test Email");
        assert_eq!(email.headers(), HeaderInput::default());

        Ok(())
    }

    #[test]
    fn test_status_messages() -> TestResult {
        let email = TestEmail::new("jane@doe.com", Some("Hi"), "hello", EmailKind::Text)?;

        assert_eq!(
            email.status_message(&Ok(())),
            "Email sent successfully to: jane@doe.com"
        );
        assert_eq!(
            email.status_message(&Err(MailerError::ProviderRejected { status: 401 })),
            "Email failed to send: The email provider rejected the message with status 401"
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_html_email_is_sent_as_html() -> TestResult {
        let mut mailer = MockMailer::new();

        mailer
            .expect_send()
            .times(1)
            .withf(|message: &Message, _| {
                message.content_type == TEXT_HTML && message.charset == "UTF-8"
            })
            .returning(|_, _| Ok(()));

        let service = MailService::new(
            Arc::new(mailer),
            ProviderCredentials::new("key-123", "mg.example.com"),
            MessageDefaults {
                charset: "ISO-8859-1".to_string(),
                ..Default::default()
            },
        );

        let email = TestEmail::new("jane@doe.com", Some("Hi"), "<b>hello</b>", EmailKind::Html)?;

        email.send(&service).await?;

        Ok(())
    }
}
