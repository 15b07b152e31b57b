//! Request construction and response interpretation for the diary backend.
//!
//! `DiaryClient` owns the validated origin and the JSON content-type applied
//! to every call except the upload, which swaps in its multipart type for
//! that one request. Every target is joined onto the origin with `Url::join`.
//! Nothing here performs I/O: `build_*` returns an `HttpRequest`, `parse_*`
//! consumes an `HttpResponse`, and `build_redirect` turns a 307/308 into the
//! same request re-aimed at its `Location`.

use serde::de::DeserializeOwned;
use url::Url;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::multipart::MultipartForm;
use crate::types::{Comment, Diary, ImageFile, NewComment, NewDiary, UploadedImage};

pub const UPLOAD_IMAGE_PATH: &str = "/upload/image";
pub const EXCHANGE_DIARY_PATH: &str = "/diary/exchange";
pub const ADD_COMMENT_PATH: &str = "/diary/add-comments/";

const CONTENT_TYPE: &str = "content-type";
const JSON: &str = "application/json";

#[derive(Debug, Clone)]
pub struct DiaryClient {
    config: ClientConfig,
    default_headers: Vec<(String, String)>,
}

impl DiaryClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            config: config.clone(),
            default_headers: vec![(CONTENT_TYPE.to_string(), JSON.to_string())],
        }
    }

    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }

    pub fn default_headers(&self) -> &[(String, String)] {
        &self.default_headers
    }

    /// Upload request: one multipart field named `file`. The multipart
    /// content type replaces the default JSON one for this request only.
    pub fn build_upload_image(&self, file: &ImageFile) -> Result<HttpRequest, ApiError> {
        self.build_upload_image_with(MultipartForm::new(), file)
    }

    /// Same as `build_upload_image`, with a caller-chosen boundary.
    pub fn build_upload_image_with(&self, form: MultipartForm, file: &ImageFile) -> Result<HttpRequest, ApiError> {
        let form = form.file("file", &file.file_name, &file.content_type, file.bytes.clone());
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: self.resolve(UPLOAD_IMAGE_PATH)?,
            headers: self.headers_with(CONTENT_TYPE, &form.content_type()),
            body: Some(form.encode()),
        })
    }

    pub fn build_exchange_diary(&self, input: &NewDiary) -> Result<HttpRequest, ApiError> {
        self.json_post(EXCHANGE_DIARY_PATH, input)
    }

    pub fn build_post_comment(&self, input: &NewComment) -> Result<HttpRequest, ApiError> {
        self.json_post(ADD_COMMENT_PATH, input)
    }

    /// GET an uploaded resource. Relative paths resolve against the origin;
    /// absolute URLs are used unchanged.
    pub fn build_fetch_image(&self, url: &str) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: self.resolve(url)?,
            headers: Vec::new(),
            body: None,
        })
    }

    /// The follow-up for a 307/308: same method, headers and body, sent to
    /// the `Location` target. `None` for any other response.
    pub fn build_redirect(&self, request: &HttpRequest, response: &HttpResponse) -> Result<Option<HttpRequest>, ApiError> {
        if !matches!(response.status, 307 | 308) {
            return Ok(None);
        }
        let Some(location) = response.header("location") else {
            return Ok(None);
        };
        let current = Url::parse(&request.url).map_err(|e| invalid_url(&request.url, e))?;
        let target = current.join(location).map_err(|e| invalid_url(location, e))?;
        Ok(Some(HttpRequest {
            url: target.into(),
            ..request.clone()
        }))
    }

    pub fn parse_upload_image(&self, response: HttpResponse) -> Result<UploadedImage, ApiError> {
        parse_json(response)
    }

    pub fn parse_exchange_diary(&self, response: HttpResponse) -> Result<Diary, ApiError> {
        parse_json(response)
    }

    pub fn parse_post_comment(&self, response: HttpResponse) -> Result<Comment, ApiError> {
        parse_json(response)
    }

    pub fn parse_fetch_image(&self, response: HttpResponse) -> Result<Vec<u8>, ApiError> {
        check_status(&response)?;
        Ok(response.body)
    }

    fn resolve(&self, target: &str) -> Result<String, ApiError> {
        self.config
            .base()
            .join(target)
            .map(String::from)
            .map_err(|e| invalid_url(target, e))
    }

    fn json_post<T: serde::Serialize>(&self, path: &str, input: &T) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_vec(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: self.resolve(path)?,
            headers: self.default_headers.clone(),
            body: Some(body),
        })
    }

    /// Default headers with `name` overridden (or added).
    fn headers_with(&self, name: &str, value: &str) -> Vec<(String, String)> {
        let mut headers: Vec<(String, String)> = self
            .default_headers
            .iter()
            .filter(|(key, _)| !key.eq_ignore_ascii_case(name))
            .cloned()
            .collect();
        headers.push((name.to_string(), value.to_string()));
        headers
    }
}

fn invalid_url(url: &str, error: url::ParseError) -> ApiError {
    ApiError::InvalidUrl {
        url: url.to_string(),
        reason: error.to_string(),
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound { body: response.text() });
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.text(),
    })
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_slice(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}
