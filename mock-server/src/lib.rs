use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use log::info;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Comment {
    pub id: i64,
    pub author: String,
    pub content: String,
    pub created_at: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Diary {
    pub id: i64,
    pub author: String,
    pub content: String,
    pub created_at: String,
    pub comments: Vec<Comment>,
}

#[derive(Deserialize)]
pub struct DiaryCreate {
    pub author: String,
    pub content: String,
}

#[derive(Deserialize)]
pub struct CommentCreate {
    pub author: String,
    pub content: String,
    pub diary_id: i64,
}

#[derive(Clone, Debug)]
pub struct StoredImage {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Default)]
pub struct Store {
    diaries: Vec<Diary>,
    next_diary_id: i64,
    next_comment_id: i64,
    images: HashMap<String, StoredImage>,
}

impl Store {
    fn insert_diary(&mut self, input: DiaryCreate) -> i64 {
        self.next_diary_id += 1;
        let id = self.next_diary_id;
        self.diaries.push(Diary {
            id,
            author: input.author,
            content: input.content,
            created_at: now(),
            comments: Vec::new(),
        });
        id
    }
}

pub type Db = Arc<RwLock<Store>>;

pub const IMAGE_ROUTE_PREFIX: &str = "/resources/images";

pub const ADD_COMMENT_ROUTE: &str = "/diary/add-comments";

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        // Uploads are not size-checked.
        .route("/upload/image", post(upload_image).layer(DefaultBodyLimit::disable()))
        .route("/resources/images/{name}", get(get_image))
        .route("/diary/exchange", post(exchange_diary))
        .route(ADD_COMMENT_ROUTE, post(add_comment))
        .route("/diary/add-comments/", post(redirect_to_add_comment))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!("diary backend listening on http://{addr}");
    }
    axum::serve(listener, app()).await
}

// Naive UTC, microsecond precision, matching the backend's ISO output.
fn now() -> String {
    chrono::Utc::now().naive_utc().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

async fn upload_image(State(db): State<Db>, mut multipart: Multipart) -> Response {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return detail(StatusCode::BAD_REQUEST, &e.body_text()),
        };
        if field.name() != Some("file") {
            continue;
        }
        let ext = field
            .file_name()
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| format!(".{ext}"))
            .unwrap_or_default();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = match field.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(e) => return detail(StatusCode::BAD_REQUEST, &e.body_text()),
        };
        let name = format!("{}{ext}", Uuid::new_v4().simple());
        info!("stored image {name} ({} bytes)", bytes.len());
        db.write()
            .await
            .images
            .insert(name.clone(), StoredImage { content_type, bytes });
        return Json(json!({ "url": format!("{IMAGE_ROUTE_PREFIX}/{name}") })).into_response();
    }
    detail(StatusCode::UNPROCESSABLE_ENTITY, "field required: file")
}

async fn get_image(State(db): State<Db>, Path(name): Path<String>) -> Response {
    match db.read().await.images.get(&name) {
        Some(image) => ([(header::CONTENT_TYPE, image.content_type.clone())], image.bytes.clone()).into_response(),
        None => detail(StatusCode::NOT_FOUND, "image not found"),
    }
}

/// Store the submitted diary, then hand back a random different one.
async fn exchange_diary(State(db): State<Db>, Json(input): Json<DiaryCreate>) -> Response {
    let mut store = db.write().await;
    let submitted = store.insert_diary(input);
    let others: Vec<&Diary> = store.diaries.iter().filter(|d| d.id != submitted).collect();
    match others.choose(&mut rand::thread_rng()) {
        Some(diary) => Json((*diary).clone()).into_response(),
        None => detail(StatusCode::NOT_FOUND, "no other diary available for exchange yet"),
    }
}

/// The slash spelling is answered the way the backend's router does it: a 307,
/// which tells the client to resend the same POST.
async fn redirect_to_add_comment() -> Redirect {
    Redirect::temporary(ADD_COMMENT_ROUTE)
}

async fn add_comment(State(db): State<Db>, Json(input): Json<CommentCreate>) -> Response {
    let mut guard = db.write().await;
    let store = &mut *guard;
    let Some(diary) = store.diaries.iter_mut().find(|d| d.id == input.diary_id) else {
        return detail(StatusCode::NOT_FOUND, "diary does not exist");
    };
    store.next_comment_id += 1;
    let comment = Comment {
        id: store.next_comment_id,
        author: input.author,
        content: input.content,
        created_at: now(),
    };
    diary.comments.push(comment.clone());
    Json(comment).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diary_serializes_with_created_at_and_comments() {
        let diary = Diary {
            id: 1,
            author: "alice".to_string(),
            content: "hello".to_string(),
            created_at: "2024-01-01T00:00:00".to_string(),
            comments: Vec::new(),
        };
        let json = serde_json::to_value(&diary).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["created_at"], "2024-01-01T00:00:00");
        assert_eq!(json["comments"], serde_json::json!([]));
    }

    #[test]
    fn comment_create_requires_diary_id() {
        let result: Result<CommentCreate, _> = serde_json::from_str(r#"{"author":"a","content":"b"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn diary_ids_are_sequential() {
        let mut store = Store::default();
        let first = store.insert_diary(DiaryCreate {
            author: "a".to_string(),
            content: "1".to_string(),
        });
        let second = store.insert_diary(DiaryCreate {
            author: "b".to_string(),
            content: "2".to_string(),
        });
        assert_eq!((first, second), (1, 2));
    }

    #[test]
    fn timestamp_has_no_offset() {
        let ts = now();
        assert!(chrono::NaiveDateTime::parse_from_str(&ts, "%Y-%m-%dT%H:%M:%S%.f").is_ok());
    }
}
