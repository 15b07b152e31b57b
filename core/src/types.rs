//! Diaries, comments and the payloads that create them.
//!
//! Ids and timestamps come from the backend; the client never makes them up.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// A reply attached to a single diary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Comment {
    pub id: i64,
    pub author: String,
    pub content: String,
    /// Backend-formatted timestamp. Newer backends call this `create_time`.
    #[serde(alias = "create_time")]
    pub created_at: String,
}

/// A diary entry together with its comments, oldest first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Diary {
    pub id: i64,
    pub author: String,
    pub content: String,
    #[serde(alias = "create_time")]
    pub created_at: String,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// Request payload for submitting a diary to the exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDiary {
    pub author: String,
    pub content: String,
}

/// Request payload for commenting on an existing diary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewComment {
    pub author: String,
    pub content: String,
    pub diary_id: i64,
}

/// Response of an image upload: the path under which the backend serves it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadedImage {
    pub url: String,
}

/// A file to upload. Size and type are not checked; the backend decides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = mime_guess::from_path(&file_name).first_or_octet_stream().to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    /// Read a file from disk, keeping only its final path component as the name.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ApiError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| ApiError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("image")
            .to_string();
        Ok(Self::new(file_name, bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diary_without_comments_field_defaults_to_empty() {
        let diary: Diary = serde_json::from_str(
            r#"{"id":3,"author":"alice","content":"hi","created_at":"2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert!(diary.comments.is_empty());
    }

    #[test]
    fn create_time_is_accepted_as_created_at() {
        let comment: Comment = serde_json::from_str(
            r#"{"id":1,"author":"bob","content":"nice","create_time":"2024-05-06T07:08:09"}"#,
        )
        .unwrap();
        assert_eq!(comment.created_at, "2024-05-06T07:08:09");

        let json = serde_json::to_value(&comment).unwrap();
        assert_eq!(json["created_at"], "2024-05-06T07:08:09");
        assert!(json.get("create_time").is_none());
    }

    #[test]
    fn new_comment_uses_backend_field_name() {
        let input = NewComment {
            author: "bob".to_string(),
            content: "nice entry".to_string(),
            diary_id: 1,
        };
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["diary_id"], 1);
    }

    #[test]
    fn content_type_is_guessed_from_extension() {
        assert_eq!(ImageFile::new("cat.PNG", Vec::new()).content_type, "image/png");
        assert_eq!(ImageFile::new("a.b.jpeg", Vec::new()).content_type, "image/jpeg");
        assert_eq!(ImageFile::new("scan.tiff", Vec::new()).content_type, "image/tiff");
        assert_eq!(
            ImageFile::new("no-extension", Vec::new()).content_type,
            "application/octet-stream"
        );
    }

    #[test]
    fn open_missing_file_is_io_error() {
        let err = ImageFile::open("/definitely/not/here.png").unwrap_err();
        assert!(matches!(err, ApiError::Io { .. }));
    }
}
