//! Mailgun form fields for a [`Message`]

use crate::domain::communication::mailer::Message;

use super::{html::strip_tags, multipart::MultipartForm};

/// A form field's value
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormValue {
    /// Sent as a single part
    Scalar(String),

    /// Sent as one `name[i]` part per element
    List(Vec<String>),
}

/// Ordered top-level form fields
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormFields(Vec<(String, FormValue)>);

impl FormFields {
    /// Assemble the fields for `message`
    pub fn from_message(message: &Message) -> Self {
        let mut fields = Self::default();

        fields.set("from", message.from());
        fields.set("to", message.to.join(", "));
        fields.set("subject", message.subject.clone());
        fields.set("text", message.body.clone());
        fields.set("o:tracking-clicks", yes_no(message.track_clicks));
        fields.set("o:tracking-opens", yes_no(message.track_opens));

        if !message.tags.is_empty() {
            fields.set_list("o:tag", message.tags.clone());
        }

        if !message.campaign_ids.is_empty() {
            fields.set_list("o:campaign", message.campaign_ids.clone());
        }

        if !message.cc.is_empty() {
            fields.set("cc", message.cc.join(", "));
        }

        if !message.bcc.is_empty() {
            fields.set("bcc", message.bcc.join(", "));
        }

        if message.is_html() {
            fields.set("html", message.body.clone());
            fields.set("text", strip_tags(&message.body));
        }

        let has_reply_to = message
            .custom_headers
            .keys()
            .any(|name| name.eq_ignore_ascii_case("reply-to"));

        if !message.reply_to.is_empty() && !has_reply_to {
            fields.set("h:Reply-To", message.reply_to.join(", "));
        }

        for (name, value) in &message.custom_headers {
            let value = if name.eq_ignore_ascii_case("content-type") {
                with_charset(value, &message.charset)
            } else {
                value.clone()
            };

            fields.set(format!("h:{name}"), value);
        }

        fields
    }

    /// Set a scalar field, replacing any existing value in place
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.insert(name.into(), FormValue::Scalar(value.into()));
    }

    /// Set a list field, replacing any existing value in place
    pub fn set_list(&mut self, name: impl Into<String>, values: Vec<String>) {
        self.insert(name.into(), FormValue::List(values));
    }

    /// Look up a field
    pub fn get(&self, name: &str) -> Option<&FormValue> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Field names in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    /// Write every field into `form`, one part per scalar and per list element
    pub fn write_to(self, form: &mut MultipartForm) {
        for (name, value) in self.0 {
            match value {
                FormValue::Scalar(value) => form.text(name, value),
                FormValue::List(values) => {
                    for (index, value) in values.into_iter().enumerate() {
                        form.text(format!("{name}[{index}]"), value);
                    }
                }
            }
        }
    }

    fn insert(&mut self, name: String, value: FormValue) {
        match self.0.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value,
            None => self.0.push((name, value)),
        }
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

/// Appends `charset` unless the content type already names one
fn with_charset(content_type: &str, charset: &str) -> String {
    if content_type.to_ascii_lowercase().contains("charset") {
        return content_type.to_string();
    }

    format!(
        "{}; charset={}",
        content_type.trim_end_matches([';', ' ']),
        charset
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::communication::mailer::{TEXT_HTML, TEXT_PLAIN};

    fn message() -> Message {
        Message {
            from_name: "Acme".to_string(),
            from_email: "hello@acme.test".to_string(),
            to: vec!["jane@doe.com".to_string()],
            subject: "Hi".to_string(),
            body: "hello".to_string(),
            content_type: TEXT_PLAIN.to_string(),
            charset: "UTF-8".to_string(),
            ..Default::default()
        }
    }

    fn scalar(fields: &FormFields, name: &str) -> Option<String> {
        match fields.get(name) {
            Some(FormValue::Scalar(value)) => Some(value.clone()),
            _ => None,
        }
    }

    #[test]
    fn test_plain_message_fields() {
        let fields = FormFields::from_message(&message());

        assert_eq!(
            fields.names().collect::<Vec<_>>(),
            vec![
                "from",
                "to",
                "subject",
                "text",
                "o:tracking-clicks",
                "o:tracking-opens"
            ]
        );
        assert_eq!(scalar(&fields, "from").as_deref(), Some("Acme <hello@acme.test>"));
        assert_eq!(scalar(&fields, "to").as_deref(), Some("jane@doe.com"));
        assert_eq!(scalar(&fields, "text").as_deref(), Some("hello"));
        assert_eq!(scalar(&fields, "o:tracking-clicks").as_deref(), Some("no"));
        assert_eq!(scalar(&fields, "html"), None);
    }

    #[test]
    fn test_html_message_gets_stripped_text() {
        let fields = FormFields::from_message(&Message {
            body: "<p>Hello <em>there</em></p>".to_string(),
            content_type: TEXT_HTML.to_string(),
            ..message()
        });

        assert_eq!(
            scalar(&fields, "html").as_deref(),
            Some("<p>Hello <em>there</em></p>")
        );
        assert_eq!(scalar(&fields, "text").as_deref(), Some("Hello there"));
        assert_eq!(fields.names().nth(3), Some("text"));
    }

    #[test]
    fn test_options_and_copies() {
        let fields = FormFields::from_message(&Message {
            tags: vec!["news".to_string(), "weekly".to_string()],
            campaign_ids: vec!["c1".to_string()],
            cc: vec!["a@x.com".to_string(), "b@x.com".to_string()],
            bcc: vec!["c@x.com".to_string()],
            reply_to: vec!["help@x.com".to_string()],
            track_opens: true,
            ..message()
        });

        assert_eq!(
            fields.get("o:tag"),
            Some(&FormValue::List(vec!["news".to_string(), "weekly".to_string()]))
        );
        assert_eq!(
            fields.get("o:campaign"),
            Some(&FormValue::List(vec!["c1".to_string()]))
        );
        assert_eq!(scalar(&fields, "cc").as_deref(), Some("a@x.com, b@x.com"));
        assert_eq!(scalar(&fields, "bcc").as_deref(), Some("c@x.com"));
        assert_eq!(scalar(&fields, "h:Reply-To").as_deref(), Some("help@x.com"));
        assert_eq!(scalar(&fields, "o:tracking-opens").as_deref(), Some("yes"));
    }

    #[test]
    fn test_custom_headers_are_prefixed() {
        let mut message = message();
        message
            .custom_headers
            .insert("X-Mailer".to_string(), "acme".to_string());
        message
            .custom_headers
            .insert("Reply-To".to_string(), "explicit@x.com".to_string());
        message.reply_to = vec!["ignored@x.com".to_string()];

        let fields = FormFields::from_message(&message);

        assert_eq!(scalar(&fields, "h:X-Mailer").as_deref(), Some("acme"));
        assert_eq!(scalar(&fields, "h:Reply-To").as_deref(), Some("explicit@x.com"));
    }

    #[test]
    fn test_content_type_header_gets_single_charset() {
        let mut message = message();
        message
            .custom_headers
            .insert("Content-Type".to_string(), "text/plain; ".to_string());

        let fields = FormFields::from_message(&message);

        assert_eq!(
            scalar(&fields, "h:Content-Type").as_deref(),
            Some("text/plain; charset=UTF-8")
        );
    }

    #[test]
    fn test_content_type_header_keeps_existing_charset() {
        assert_eq!(
            with_charset("text/plain; Charset=latin1", "UTF-8"),
            "text/plain; Charset=latin1"
        );
    }

    #[test]
    fn test_write_to_expands_lists() {
        let mut fields = FormFields::default();
        fields.set("to", "jane@doe.com");
        fields.set_list("o:tag", vec!["a".to_string(), "b".to_string()]);

        let mut form = MultipartForm::new();
        fields.write_to(&mut form);

        assert_eq!(form.len(), 3);
    }
}
