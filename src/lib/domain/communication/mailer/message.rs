//! Email message

use std::{collections::BTreeMap, fmt, path::PathBuf};

/// Content type for plain text messages
pub const TEXT_PLAIN: &str = "text/plain";

/// Content type for HTML messages
pub const TEXT_HTML: &str = "text/html";

/// Raw header input, either a single block of `Name: Value` lines or a list of lines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HeaderInput {
    /// A header block separated by `\n` or `\r\n`
    Raw(String),

    /// Header lines which have already been split
    Lines(Vec<String>),
}

impl Default for HeaderInput {
    fn default() -> Self {
        Self::Lines(Vec::new())
    }
}

impl From<&str> for HeaderInput {
    fn from(raw: &str) -> Self {
        Self::Raw(raw.to_string())
    }
}

impl From<String> for HeaderInput {
    fn from(raw: String) -> Self {
        Self::Raw(raw)
    }
}

impl From<Vec<String>> for HeaderInput {
    fn from(lines: Vec<String>) -> Self {
        Self::Lines(lines)
    }
}

impl From<Vec<&str>> for HeaderInput {
    fn from(lines: Vec<&str>) -> Self {
        Self::Lines(lines.into_iter().map(String::from).collect())
    }
}

/// Raw attachment input, either newline separated paths or a list of paths.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttachmentInput {
    /// Paths separated by `\n` or `\r\n`
    Raw(String),

    /// Individual paths
    Paths(Vec<PathBuf>),
}

impl Default for AttachmentInput {
    fn default() -> Self {
        Self::Paths(Vec::new())
    }
}

impl From<&str> for AttachmentInput {
    fn from(raw: &str) -> Self {
        Self::Raw(raw.to_string())
    }
}

impl From<Vec<PathBuf>> for AttachmentInput {
    fn from(paths: Vec<PathBuf>) -> Self {
        Self::Paths(paths)
    }
}

/// A normalized outbound email, built once per send.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Message {
    /// The sender's display name
    pub from_name: String,

    /// The sender's email address
    pub from_email: String,

    /// Raw recipients, each possibly a comma-separated list
    pub to: Vec<String>,

    /// Carbon copy recipients
    pub cc: Vec<String>,

    /// Blind carbon copy recipients
    pub bcc: Vec<String>,

    /// Reply-To addresses
    pub reply_to: Vec<String>,

    /// The subject of the email
    pub subject: String,

    /// The body of the email
    pub body: String,

    /// Either [`TEXT_PLAIN`] or [`TEXT_HTML`]
    pub content_type: String,

    /// The character set of the body
    pub charset: String,

    /// Headers not otherwise understood, passed through to the provider
    pub custom_headers: BTreeMap<String, String>,

    /// Provider tags
    pub tags: Vec<String>,

    /// Provider campaign identifiers
    pub campaign_ids: Vec<String>,

    /// Enable click tracking
    pub track_clicks: bool,

    /// Enable open tracking
    pub track_opens: bool,

    /// Files to attach, read when the message is encoded
    pub attachments: Vec<PathBuf>,

    /// Boundary supplied by a legacy multipart header. Never used on the wire.
    pub legacy_boundary: Option<String>,
}

impl Message {
    /// Whether the body should be sent as HTML
    pub fn is_html(&self) -> bool {
        self.content_type.eq_ignore_ascii_case(TEXT_HTML)
    }

    /// The `Name <email>` sender string
    pub fn from(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }
}

/// Credentials for the email provider's API
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ProviderCredentials {
    /// The API key
    pub api_key: String,

    /// The sending domain
    pub domain: String,
}

impl ProviderCredentials {
    /// Create new provider credentials
    pub fn new(api_key: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            domain: domain.into(),
        }
    }

    /// Both the API key and the domain are present
    pub fn is_complete(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.domain.trim().is_empty()
    }
}

impl fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderCredentials")
            .field("api_key", &"<redacted>")
            .field("domain", &self.domain)
            .finish()
    }
}

/// Fallback values used while normalizing a message
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageDefaults {
    /// Configured sender name
    pub from_name: Option<String>,

    /// Configured sender email
    pub from_email: Option<String>,

    /// Application identity, used as the last-resort sender name and mailbox
    pub app_name: String,

    /// Host name the application is served from
    pub host: String,

    /// Site character set
    pub charset: String,

    /// Content type forced for every message, overriding headers
    pub content_type: Option<String>,

    /// Comma-separated provider tags
    pub tag: Option<String>,

    /// Comma-separated provider campaign identifiers
    pub campaign_id: Option<String>,

    /// Enable click tracking
    pub track_clicks: bool,

    /// Enable open tracking
    pub track_opens: bool,
}

impl Default for MessageDefaults {
    fn default() -> Self {
        Self {
            from_name: None,
            from_email: None,
            app_name: "WordPress".to_string(),
            host: "localhost".to_string(),
            charset: "UTF-8".to_string(),
            content_type: None,
            tag: None,
            campaign_id: None,
            track_clicks: false,
            track_opens: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_formats_name_and_address() {
        let message = Message {
            from_name: "Jane Doe".to_string(),
            from_email: "jane@example.com".to_string(),
            ..Default::default()
        };

        assert_eq!(message.from(), "Jane Doe <jane@example.com>");
    }

    #[test]
    fn test_is_html_ignores_case() {
        let message = Message {
            content_type: "TEXT/HTML".to_string(),
            ..Default::default()
        };

        assert!(message.is_html());
    }

    #[test]
    fn test_credentials_require_key_and_domain() {
        assert!(ProviderCredentials::new("key-123", "mg.example.com").is_complete());
        assert!(!ProviderCredentials::new("", "mg.example.com").is_complete());
        assert!(!ProviderCredentials::new("key-123", "  ").is_complete());
    }

    #[test]
    fn test_credentials_debug_hides_api_key() {
        let credentials = ProviderCredentials::new("key-123", "mg.example.com");

        let debug = format!("{:?}", credentials);

        assert!(!debug.contains("key-123"));
        assert!(debug.contains("mg.example.com"));
    }
}
