#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Sends a test email through Mailgun using the configured settings

use std::{path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::Result;
use clap::Parser;
use mailgun_mail::{
    domain::communication::{EmailKind, MailService, TestEmail},
    infrastructure::{
        email::{MailgunConfig, MailgunMailer},
        settings::{CredentialOverrides, MailgunSettings, SiteConfig},
    },
};

/// Command-line arguments / environment variables
#[derive(Debug, Parser)]
pub struct Args {
    /// The recipient's email address
    #[arg(long)]
    pub to: String,

    /// The subject of the email
    #[arg(long)]
    pub subject: Option<String>,

    /// The body of the email
    #[arg(long, default_value = "This is a test email sent through Mailgun.")]
    pub message: String,

    /// Send the body as HTML
    #[arg(long)]
    pub html: bool,

    /// Path to the stored Mailgun settings
    #[arg(long, env = "MAILGUN_SETTINGS", default_value = "mailgun.json")]
    pub settings: PathBuf,

    /// Credentials overriding the stored settings
    #[clap(flatten)]
    pub overrides: CredentialOverrides,

    /// The site configuration
    #[clap(flatten)]
    pub site: SiteConfig,

    /// The Mailgun transport configuration
    #[clap(flatten)]
    pub mailgun: MailgunConfig,
}

#[mutants::skip]
#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let settings = MailgunSettings::load(&args.settings)?;

    let kind = if args.html {
        EmailKind::Html
    } else {
        EmailKind::Text
    };

    let email = match TestEmail::new(&args.to, args.subject.as_deref(), &args.message, kind) {
        Ok(email) => email,
        Err(e) => {
            eprintln!("{e}");

            return Ok(ExitCode::FAILURE);
        }
    };

    let service = MailService::new(
        Arc::new(MailgunMailer::new(args.mailgun)?),
        settings.credentials(&args.overrides),
        settings.defaults(&args.site),
    );

    let result = email.send(&service).await;

    println!("{}", email.status_message(&result));

    Ok(if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
