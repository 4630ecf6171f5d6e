//! Mailgun HTTP API mailer implementation

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use clap::Parser;
use reqwest::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    Client, StatusCode,
};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::communication::mailer::{
    Mailer, MailerError, Message, ProviderCredentials, SendResult,
};

use super::{
    form::FormFields,
    multipart::{EncodedForm, MultipartForm},
};

/// The response message Mailgun returns once a message is queued
pub const QUEUED_MESSAGE: &str = "Queued. Thank you.";

/// Mailgun configuration
#[derive(Clone, Debug, PartialEq, Eq, Parser)]
pub struct MailgunConfig {
    /// The Mailgun API base URL
    #[clap(long, env = "MAILGUN_BASE_URL", default_value = "https://api.mailgun.net")]
    pub base_url: String,

    /// Request timeout in seconds
    #[clap(long, env = "MAILGUN_TIMEOUT_SECS", default_value = "30")]
    pub timeout_secs: u64,
}

impl Default for MailgunConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.mailgun.net".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Deserialize)]
struct MailgunResponse {
    message: Option<String>,
}

/// Mailgun mailer
#[derive(Debug, Clone)]
pub struct MailgunMailer {
    client: Client,
    config: MailgunConfig,
}

impl MailgunMailer {
    /// Create a new Mailgun mailer
    pub fn new(config: MailgunConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build the HTTP client")?;

        Ok(Self { client, config })
    }

    fn messages_url(&self, domain: &str) -> String {
        format!(
            "{}/v2/{}/messages",
            self.config.base_url.trim_end_matches('/'),
            domain
        )
    }
}

#[async_trait]
impl Mailer for MailgunMailer {
    async fn send(&self, message: &Message, credentials: &ProviderCredentials) -> SendResult {
        if !credentials.is_complete() {
            warn!("not sending email: Mailgun API key or domain missing");

            return Err(MailerError::MissingCredentials);
        }

        let form = encode_message(message).await?;
        let url = self.messages_url(&credentials.domain);

        debug!(%url, bytes = form.body.len(), "posting message to Mailgun");

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, basic_auth(&credentials.api_key))
            .header(CONTENT_TYPE, form.content_type())
            .body(form.body)
            .send()
            .await
            .map_err(|e| {
                warn!("Mailgun request failed: {e}");

                MailerError::Transport(e.into())
            })?;

        let status = response.status();

        if status != StatusCode::OK {
            warn!(status = status.as_u16(), "Mailgun rejected the message");

            return Err(MailerError::ProviderRejected {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| MailerError::Transport(e.into()))?;

        match serde_json::from_str::<MailgunResponse>(&body) {
            Ok(MailgunResponse {
                message: Some(status_text),
            }) if status_text == QUEUED_MESSAGE => {
                debug!("Mailgun queued the message");

                Ok(())
            }
            _ => {
                debug!(%body, "unexpected Mailgun response");

                Err(MailerError::UnexpectedResponse)
            }
        }
    }
}

/// Encode `message` and its attachments as a multipart payload
pub async fn encode_message(message: &Message) -> Result<EncodedForm, MailerError> {
    let mut form = MultipartForm::new();

    FormFields::from_message(message).write_to(&mut form);

    for (index, path) in message.attachments.iter().enumerate() {
        let content =
            tokio::fs::read(path)
                .await
                .map_err(|source| MailerError::AttachmentUnreadable {
                    path: path.clone(),
                    source,
                })?;

        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        form.file(format!("attachment[{index}]"), filename, content);
    }

    Ok(form.encode())
}

fn basic_auth(api_key: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("api:{api_key}")))
}
