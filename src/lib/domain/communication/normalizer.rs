//! Turns raw `wp_mail`-style arguments into a [`Message`]
//!
//! Header parsing is lenient: lines that cannot be understood are dropped rather than
//! reported, so normalization never fails.

use std::{collections::BTreeMap, path::PathBuf};

use tracing::debug;

use super::mailer::{AttachmentInput, HeaderInput, Message, MessageDefaults, TEXT_PLAIN};

/// Values recovered from the header block
#[derive(Debug, Default)]
struct ParsedHeaders {
    from_name: Option<String>,
    from_email: Option<String>,
    content_type: Option<String>,
    charset: Option<String>,
    boundary: Option<String>,
    cc: Vec<String>,
    bcc: Vec<String>,
    reply_to: Vec<String>,
    custom: BTreeMap<String, String>,
}

/// Builds the canonical [`Message`] for a send.
///
/// # Arguments
/// * `to` - Raw recipients, each possibly comma-separated. Passed through unsplit.
/// * `subject` - The subject line.
/// * `body` - The message body.
/// * `headers` - Additional headers as a block or a list of lines.
/// * `attachments` - Attachment paths as a newline separated block or a list.
/// * `defaults` - Configured sender, site and provider options.
pub fn normalize(
    to: &[String],
    subject: &str,
    body: &str,
    headers: &HeaderInput,
    attachments: &AttachmentInput,
    defaults: &MessageDefaults,
) -> Message {
    let parsed = parse_headers(headers);

    let from_name = parsed
        .from_name
        .or_else(|| non_empty(defaults.from_name.as_deref()))
        .unwrap_or_else(|| defaults.app_name.clone());

    let from_email = parsed
        .from_email
        .or_else(|| non_empty(defaults.from_email.as_deref()))
        .unwrap_or_else(|| fallback_sender(&defaults.app_name, &defaults.host));

    let content_type = non_empty(defaults.content_type.as_deref())
        .or(parsed.content_type)
        .unwrap_or_else(|| TEXT_PLAIN.to_string());

    let charset = parsed.charset.unwrap_or_else(|| defaults.charset.clone());

    Message {
        from_name,
        from_email,
        to: to.to_vec(),
        cc: parsed.cc,
        bcc: parsed.bcc,
        reply_to: parsed.reply_to,
        subject: subject.to_string(),
        body: body.to_string(),
        content_type,
        charset,
        custom_headers: parsed.custom,
        tags: split_list(defaults.tag.as_deref()),
        campaign_ids: split_list(defaults.campaign_id.as_deref()),
        track_clicks: defaults.track_clicks,
        track_opens: defaults.track_opens,
        attachments: attachment_paths(attachments),
        legacy_boundary: parsed.boundary,
    }
}

fn parse_headers(headers: &HeaderInput) -> ParsedHeaders {
    let mut parsed = ParsedHeaders::default();

    for line in header_lines(headers) {
        let Some((name, content)) = line.trim().split_once(':') else {
            if let Some(boundary) = value_after(&line, "boundary=") {
                parsed.boundary = Some(boundary);
            } else if !line.trim().is_empty() {
                debug!("dropping malformed header line");
            }

            continue;
        };

        let name = name.trim();
        let content = content.trim();

        match name.to_ascii_lowercase().as_str() {
            "from" => parse_from(content, &mut parsed),
            "content-type" => parse_content_type(content, &mut parsed),
            "cc" => parsed.cc.extend(split_addresses(content)),
            "bcc" => parsed.bcc.extend(split_addresses(content)),
            "reply-to" => parsed.reply_to.extend(split_addresses(content)),
            "" => debug!("dropping header line without a name"),
            _ => {
                parsed.custom.insert(name.to_string(), content.to_string());
            }
        }
    }

    parsed
}

fn header_lines(headers: &HeaderInput) -> Vec<String> {
    let lines: Vec<&str> = match headers {
        HeaderInput::Raw(raw) => vec![raw.as_str()],
        HeaderInput::Lines(lines) => lines.iter().map(String::as_str).collect(),
    };

    lines
        .into_iter()
        .flat_map(|block| {
            block
                .replace("\r\n", "\n")
                .replace('\r', "\n")
                .split('\n')
                .map(String::from)
                .collect::<Vec<_>>()
        })
        .collect()
}

fn parse_from(content: &str, parsed: &mut ParsedHeaders) {
    match content.find('<') {
        Some(bracket) => {
            let name = content[..bracket].replace('"', "");
            let name = name.trim();

            if !name.is_empty() {
                parsed.from_name = Some(name.to_string());
            }

            let rest = &content[bracket + 1..];
            let email = rest.split_once('>').map_or(rest, |(email, _)| email).trim();

            if !email.is_empty() {
                parsed.from_email = Some(email.to_string());
            }
        }
        None if !content.is_empty() => parsed.from_email = Some(content.to_string()),
        None => {}
    }
}

fn parse_content_type(content: &str, parsed: &mut ParsedHeaders) {
    if !content.contains(';') {
        if !content.is_empty() {
            parsed.content_type = Some(content.to_string());
        }

        return;
    }

    let mut parts = content.split(';');
    let kind = parts.next().unwrap_or_default().trim();
    let parameter = parts.next().unwrap_or_default();

    if !kind.is_empty() {
        parsed.content_type = Some(kind.to_string());
    }

    if let Some(charset) = value_after(parameter, "charset=") {
        if !charset.is_empty() {
            parsed.charset = Some(charset);
        }
    } else if let Some(boundary) = value_after(parameter, "boundary=") {
        parsed.boundary = Some(boundary);
    }
}

/// The unquoted, trimmed text following a case-insensitive `key`
fn value_after(text: &str, key: &str) -> Option<String> {
    let index = text.to_ascii_lowercase().find(key)?;

    Some(
        text[index + key.len()..]
            .replace(['"', '\''], "")
            .trim()
            .to_string(),
    )
}

fn split_addresses(content: &str) -> impl Iterator<Item = String> + '_ {
    content
        .split(',')
        .map(str::trim)
        .filter(|address| !address.is_empty())
        .map(String::from)
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|raw| {
        raw.chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .split(',')
            .filter(|item| !item.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}

fn attachment_paths(attachments: &AttachmentInput) -> Vec<PathBuf> {
    match attachments {
        AttachmentInput::Raw(raw) => raw
            .replace("\r\n", "\n")
            .split('\n')
            .filter(|line| !line.trim().is_empty())
            .map(PathBuf::from)
            .collect(),
        AttachmentInput::Paths(paths) => paths
            .iter()
            .filter(|path| !path.as_os_str().is_empty())
            .cloned()
            .collect(),
    }
}

fn fallback_sender(app_name: &str, host: &str) -> String {
    let host = host.trim().to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    let mailbox: String = app_name
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    format!("{mailbox}@{host}")
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(String::from)
}
