//! `multipart/form-data` encoding
//!
//! Parts are written in the order they were added. The boundary is random and is
//! regenerated until it does not occur anywhere in the payload.

use rand::{distributions::Alphanumeric, Rng};

const BOUNDARY_LENGTH: usize = 32;

#[derive(Debug)]
struct Part {
    name: String,
    filename: Option<String>,
    content: Vec<u8>,
}

/// A form waiting to be encoded
#[derive(Debug, Default)]
pub struct MultipartForm {
    parts: Vec<Part>,
}

/// An encoded form body and the boundary separating its parts
#[derive(Debug)]
pub struct EncodedForm {
    /// The boundary token
    pub boundary: String,

    /// The encoded payload
    pub body: Vec<u8>,
}

impl EncodedForm {
    /// The `Content-Type` header value for this body
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }
}

impl MultipartForm {
    /// Create an empty form
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text field
    pub fn text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.parts.push(Part {
            name: name.into(),
            filename: None,
            content: value.into().into_bytes(),
        });
    }

    /// Add a file field
    pub fn file(&mut self, name: impl Into<String>, filename: impl Into<String>, content: Vec<u8>) {
        self.parts.push(Part {
            name: name.into(),
            filename: Some(filename.into()),
            content,
        });
    }

    /// Number of parts added so far
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// The form has no parts
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Encode the form with a freshly generated boundary
    pub fn encode(self) -> EncodedForm {
        let boundary = loop {
            let candidate = generate_boundary();

            if !self.contains(candidate.as_bytes()) {
                break candidate;
            }
        };

        self.encode_with(boundary)
    }

    fn contains(&self, needle: &[u8]) -> bool {
        self.parts.iter().any(|part| {
            contains_bytes(part.name.as_bytes(), needle)
                || part
                    .filename
                    .as_ref()
                    .is_some_and(|filename| contains_bytes(filename.as_bytes(), needle))
                || contains_bytes(&part.content, needle)
        })
    }

    fn encode_with(self, boundary: String) -> EncodedForm {
        let mut body = Vec::new();

        for part in self.parts {
            body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());

            let disposition = match part.filename {
                Some(filename) => format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\r\n",
                    escape_quoted(&part.name),
                    escape_quoted(&filename)
                ),
                None => format!(
                    "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                    escape_quoted(&part.name)
                ),
            };

            body.extend_from_slice(disposition.as_bytes());
            body.extend_from_slice(&part.content);
            body.extend_from_slice(b"\r\n");
        }

        body.extend_from_slice(format!("--{boundary}--").as_bytes());

        EncodedForm { boundary, body }
    }
}

/// A random alphanumeric boundary token
pub fn generate_boundary() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(BOUNDARY_LENGTH)
        .map(char::from)
        .collect()
}

/// Percent-encodes characters that would end a quoted `Content-Disposition` parameter
fn escape_quoted(value: &str) -> String {
    value
        .replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    !needle.is_empty()
        && haystack.len() >= needle.len()
        && haystack.windows(needle.len()).any(|window| window == needle)
}
