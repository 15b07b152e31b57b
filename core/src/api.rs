//! Async facade pairing a `DiaryClient` with a `Transport`.
//!
//! Each call builds its own request, awaits the round trip, and parses the
//! response. A 307/308 is followed by resending the same request to its
//! `Location` (the backend answers `/diary/add-comments/` that way), at most
//! `MAX_REDIRECTS` times. Failures are returned unchanged: no retries, no
//! fallbacks, no caching. Concurrent calls share nothing mutable and complete
//! in no particular order.

use log::debug;

use crate::client::DiaryClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::types::{Comment, Diary, ImageFile, NewComment, NewDiary, UploadedImage};

pub const MAX_REDIRECTS: usize = 5;

#[derive(Debug, Clone)]
pub struct DiaryApi<T> {
    client: DiaryClient,
    transport: T,
}

#[cfg(feature = "ureq")]
impl DiaryApi<crate::transport::UreqTransport> {
    /// API backed by the default `ureq` transport.
    pub fn connect(config: &ClientConfig) -> Self {
        Self::new(config, crate::transport::UreqTransport::new())
    }
}

impl<T: Transport> DiaryApi<T> {
    pub fn new(config: &ClientConfig, transport: T) -> Self {
        Self {
            client: DiaryClient::new(config),
            transport,
        }
    }

    pub fn client(&self) -> &DiaryClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn upload_image(&self, file: &ImageFile) -> Result<UploadedImage, ApiError> {
        debug!("uploading {} ({} bytes)", file.file_name, file.bytes.len());
        let request = self.client.build_upload_image(file)?;
        let response = self.send(request).await?;
        self.client.parse_upload_image(response)
    }

    pub async fn exchange_diary(&self, author: &str, content: &str) -> Result<Diary, ApiError> {
        debug!("exchanging diary by {author}");
        let request = self.client.build_exchange_diary(&NewDiary {
            author: author.to_string(),
            content: content.to_string(),
        })?;
        let response = self.send(request).await?;
        self.client.parse_exchange_diary(response)
    }

    pub async fn post_comment(&self, diary_id: i64, author: &str, content: &str) -> Result<Comment, ApiError> {
        debug!("commenting on diary {diary_id} as {author}");
        let request = self.client.build_post_comment(&NewComment {
            author: author.to_string(),
            content: content.to_string(),
            diary_id,
        })?;
        let response = self.send(request).await?;
        self.client.parse_post_comment(response)
    }

    pub async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let request = self.client.build_fetch_image(url)?;
        debug!("fetching {}", request.url);
        let response = self.send(request).await?;
        self.client.parse_fetch_image(response)
    }

    async fn send(&self, mut request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut response = self.transport.execute(request.clone()).await?;
        for _ in 0..MAX_REDIRECTS {
            let Some(next) = self.client.build_redirect(&request, &response)? else {
                break;
            };
            debug!("{} redirected to {}", request.url, next.url);
            request = next;
            response = self.transport.execute(request.clone()).await?;
        }
        Ok(response)
    }
}
