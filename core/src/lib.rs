//! Client for the diary exchange service.
//!
//! Users upload images, hand in a diary entry and get a stranger's entry back,
//! and comment on the entries they receive. Uploaded images are read back by
//! the path the upload returned.
//!
//! `DiaryClient` turns each call into an `HttpRequest` and each `HttpResponse`
//! into a typed result, with no IO of its own. `DiaryApi` owns one client and
//! one `Transport` and exposes the calls as async methods. It is built once
//! from a `ClientConfig` and passed around by the caller. With the default
//! `ureq` feature, `UreqTransport` talks to a real backend.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod multipart;
pub mod transport;
pub mod types;

pub use api::DiaryApi;
pub use client::DiaryClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use multipart::MultipartForm;
pub use transport::Transport;
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use types::{Comment, Diary, ImageFile, NewComment, NewDiary, UploadedImage};
