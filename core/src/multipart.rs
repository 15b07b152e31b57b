//! `multipart/form-data` body encoding (RFC 7578).
//!
//! Only what the upload endpoint needs: file parts, each with a field name,
//! file name and content type. The body is produced as bytes so it can travel
//! inside a plain `HttpRequest`.

use uuid::Uuid;

const CRLF: &[u8] = b"\r\n";

#[derive(Debug, Clone)]
struct Part {
    name: String,
    file_name: String,
    content_type: String,
    data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct MultipartForm {
    boundary: String,
    parts: Vec<Part>,
}

impl MultipartForm {
    /// A form with a random boundary.
    pub fn new() -> Self {
        Self::with_boundary(format!("diary-boundary-{}", Uuid::new_v4().simple()))
    }

    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            parts: Vec::new(),
        }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, data: Vec<u8>) -> Self {
        self.parts.push(Part {
            name: name.to_string(),
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            data,
        });
        self
    }

    /// Value for the request's `content-type` header.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for part in &self.parts {
            out.extend_from_slice(b"--");
            out.extend_from_slice(self.boundary.as_bytes());
            out.extend_from_slice(CRLF);

            let disposition = format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"",
                escape(&part.name),
                escape(&part.file_name)
            );
            out.extend_from_slice(disposition.as_bytes());
            out.extend_from_slice(CRLF);
            out.extend_from_slice(format!("Content-Type: {}", part.content_type).as_bytes());
            out.extend_from_slice(CRLF);
            out.extend_from_slice(CRLF);
            out.extend_from_slice(&part.data);
            out.extend_from_slice(CRLF);
        }
        out.extend_from_slice(b"--");
        out.extend_from_slice(self.boundary.as_bytes());
        out.extend_from_slice(b"--");
        out.extend_from_slice(CRLF);
        out
    }
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}

// Quotes and line breaks would terminate the header parameter early.
fn escape(value: &str) -> String {
    value
        .replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
