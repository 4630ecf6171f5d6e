//! Mailgun settings
//!
//! Stored settings are read from a JSON document with the same keys the settings screen
//! saves. Credentials given through the environment take precedence over stored values.

use std::{fmt, fs, io, path::Path};

use clap::Parser;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::domain::communication::mailer::{MessageDefaults, ProviderCredentials};

/// Errors raised while loading settings
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file exists but could not be read
    #[error("could not read settings file")]
    Read(#[from] io::Error),

    /// The settings file is not valid JSON
    #[error("settings file is not valid JSON")]
    Parse(#[from] serde_json::Error),
}

/// Stored Mailgun settings
#[derive(Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MailgunSettings {
    /// Mailgun API key
    pub api_key: String,

    /// Mailgun sending domain
    pub domain: String,

    /// Sender name
    pub from_name: String,

    /// Sender email address
    pub from_email: String,

    /// Comma-separated tags
    pub tag: String,

    /// Comma-separated campaign identifiers
    pub campaign_id: String,

    /// Enable click tracking
    #[serde(rename = "track-clicks")]
    pub track_clicks: bool,

    /// Enable open tracking
    #[serde(rename = "track-opens")]
    pub track_opens: bool,
}

impl fmt::Debug for MailgunSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailgunSettings")
            .field("api_key", &"<redacted>")
            .field("domain", &self.domain)
            .field("from_name", &self.from_name)
            .field("from_email", &self.from_email)
            .field("tag", &self.tag)
            .field("campaign_id", &self.campaign_id)
            .field("track_clicks", &self.track_clicks)
            .field("track_opens", &self.track_opens)
            .finish()
    }
}

impl MailgunSettings {
    /// Load settings from `path`. A missing file yields empty settings.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        match fs::read_to_string(path) {
            Ok(raw) => Self::parse(&raw),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("no settings file at {}, using defaults", path.display());

                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Parse settings from a JSON document
    pub fn parse(raw: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Resolve the provider credentials, preferring non-empty overrides
    pub fn credentials(&self, overrides: &CredentialOverrides) -> ProviderCredentials {
        ProviderCredentials::new(
            prefer(overrides.api_key.as_deref(), &self.api_key),
            prefer(overrides.domain.as_deref(), &self.domain),
        )
    }

    /// Build the normalization defaults for `site`
    pub fn defaults(&self, site: &SiteConfig) -> MessageDefaults {
        MessageDefaults {
            from_name: optional(&self.from_name),
            from_email: optional(&self.from_email),
            app_name: site.app_name.clone(),
            host: site.server_name.clone(),
            charset: site.charset.clone(),
            content_type: None,
            tag: optional(&self.tag),
            campaign_id: optional(&self.campaign_id),
            track_clicks: self.track_clicks,
            track_opens: self.track_opens,
        }
    }
}

/// Credentials supplied by the environment
#[derive(Clone, Default, PartialEq, Eq, Parser)]
pub struct CredentialOverrides {
    /// Mailgun API key
    #[clap(long = "api-key", env = "MAILGUN_APIKEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Mailgun sending domain
    #[clap(long = "domain", env = "MAILGUN_DOMAIN")]
    pub domain: Option<String>,
}

impl fmt::Debug for CredentialOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialOverrides")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("domain", &self.domain)
            .finish()
    }
}

/// Site configuration
#[derive(Clone, Debug, PartialEq, Eq, Parser)]
pub struct SiteConfig {
    /// Host name the site is served from
    #[clap(long, env = "SERVER_NAME", default_value = "localhost")]
    pub server_name: String,

    /// Site character set
    #[clap(long, env = "BLOG_CHARSET", default_value = "UTF-8")]
    pub charset: String,

    /// Application identity used as the fallback sender
    #[clap(long, env = "APP_NAME", default_value = "WordPress")]
    pub app_name: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            server_name: "localhost".to_string(),
            charset: "UTF-8".to_string(),
            app_name: "WordPress".to_string(),
        }
    }
}

fn prefer(value: Option<&str>, fallback: &str) -> String {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();

    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    const STORED: &str = r#"{
        "api_key": "key-stored",
        "domain": "mg.stored.test",
        "from_name": "Acme",
        "from_email": "",
        "tag": "news, weekly",
        "track-clicks": true
    }"#;

    #[test]
    fn test_parse_stored_settings() -> TestResult {
        let settings = MailgunSettings::parse(STORED)?;

        assert_eq!(settings.api_key, "key-stored");
        assert_eq!(settings.domain, "mg.stored.test");
        assert!(settings.track_clicks);
        assert!(!settings.track_opens);
        assert_eq!(settings.campaign_id, "");

        Ok(())
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let result = MailgunSettings::parse("{ not json");

        assert!(matches!(result, Err(SettingsError::Parse(_))));
    }

    #[test]
    fn test_missing_file_yields_defaults() -> TestResult {
        let dir = tempfile::tempdir()?;

        let settings = MailgunSettings::load(&dir.path().join("settings.json"))?;

        assert_eq!(settings, MailgunSettings::default());

        Ok(())
    }

    #[test]
    fn test_load_from_file() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("settings.json");
        fs::write(&path, STORED)?;

        let settings = MailgunSettings::load(&path)?;

        assert_eq!(settings.from_name, "Acme");

        Ok(())
    }

    #[test]
    fn test_overrides_take_precedence() -> TestResult {
        let settings = MailgunSettings::parse(STORED)?;
        let overrides = CredentialOverrides {
            api_key: Some("key-env".to_string()),
            domain: Some("  ".to_string()),
        };

        let credentials = settings.credentials(&overrides);

        assert_eq!(credentials, ProviderCredentials::new("key-env", "mg.stored.test"));

        Ok(())
    }

    #[test]
    fn test_defaults_from_settings() -> TestResult {
        let settings = MailgunSettings::parse(STORED)?;
        let site = SiteConfig {
            server_name: "www.acme.test".to_string(),
            ..Default::default()
        };

        let defaults = settings.defaults(&site);

        assert_eq!(defaults.from_name.as_deref(), Some("Acme"));
        assert_eq!(defaults.from_email, None);
        assert_eq!(defaults.tag.as_deref(), Some("news, weekly"));
        assert_eq!(defaults.campaign_id, None);
        assert_eq!(defaults.host, "www.acme.test");
        assert!(defaults.track_clicks);

        Ok(())
    }

    #[test]
    fn test_debug_hides_api_key() -> TestResult {
        let settings = MailgunSettings::parse(STORED)?;

        assert!(!format!("{:?}", settings).contains("key-stored"));

        Ok(())
    }
}
