use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

/// Items returned per page by every paginated route.
pub const PAGE_SIZE: usize = 2;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub pk: u64,
    pub username: String,
    pub full_name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Comment {
    pub pk: u64,
    pub text: String,
    pub created_at: i64,
    pub comment_like_count: u64,
    pub has_liked_comment: bool,
    pub user: User,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrayItem {
    pub id: String,
    pub media_count: u64,
    pub latest_reel_media: i64,
}

#[derive(Clone, Debug)]
pub struct MediaRecord {
    pub id: String,
    pub code: String,
    pub caption: String,
    pub owner: User,
    pub likers: Vec<User>,
    pub comments: Vec<Comment>,
    pub viewers: Vec<User>,
    pub saved: bool,
}

#[derive(Debug, Default)]
pub struct Store {
    pub media: HashMap<String, MediaRecord>,
    pub archive: Vec<TrayItem>,
}

impl Store {
    /// One post (`123`) with five likers and five comments, one story (`555`)
    /// with three viewers, and three archived days.
    pub fn seeded() -> Self {
        let owner = user(1, "owner");
        let likers: Vec<User> = (10..15).map(|pk| user(pk, &format!("liker{pk}"))).collect();
        let comments = (100..105)
            .map(|pk| Comment {
                pk,
                text: format!("comment {pk}"),
                created_at: 1_600_000_000 + pk as i64,
                comment_like_count: 0,
                has_liked_comment: false,
                user: likers[(pk as usize) % likers.len()].clone(),
            })
            .collect();
        let post = MediaRecord {
            id: "123".to_string(),
            code: "B123abc".to_string(),
            caption: "hello world".to_string(),
            owner: owner.clone(),
            likers,
            comments,
            viewers: Vec::new(),
            saved: false,
        };
        let story = MediaRecord {
            id: "555".to_string(),
            code: "S555xyz".to_string(),
            caption: String::new(),
            owner,
            likers: Vec::new(),
            comments: Vec::new(),
            viewers: (20..23).map(|pk| user(pk, &format!("viewer{pk}"))).collect(),
            saved: false,
        };
        let archive = (1..=3)
            .map(|day| TrayItem {
                id: format!("archiveDay:2020-01-0{day}"),
                media_count: day,
                latest_reel_media: 1_577_836_800 + day as i64 * 86_400,
            })
            .collect();

        Self {
            media: HashMap::from([(post.id.clone(), post), (story.id.clone(), story)]),
            archive,
        }
    }

    fn comment_mut(&mut self, pk: u64) -> Option<&mut Comment> {
        self.media
            .values_mut()
            .flat_map(|m| m.comments.iter_mut())
            .find(|c| c.pk == pk)
    }
}

fn user(pk: u64, username: &str) -> User {
    User {
        pk,
        username: username.to_string(),
        full_name: username.to_uppercase(),
    }
}

pub type Db = Arc<RwLock<Store>>;

type Failure = (StatusCode, Json<Value>);
type Reply = Result<Json<Value>, Failure>;

#[derive(Deserialize)]
struct PageQuery {
    max_id: Option<String>,
}

pub fn app() -> Router {
    app_with(Store::seeded())
}

pub fn app_with(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    Router::new()
        .route("/api/v1/media/{id}/info", get(media_info))
        .route("/api/v1/media/{id}/permalink", get(permalink))
        .route("/api/v1/media/{id}/likers", get(likers))
        .route("/api/v1/media/{id}/comments", get(comments))
        .route("/api/v1/media/{id}/save/", post(save))
        .route("/api/v1/media/{id}/unsave/", post(unsave))
        .route("/api/v1/media/{id}/comment_like/", post(comment_like))
        .route("/api/v1/media/{id}/comment_unlike/", post(comment_unlike))
        .route("/api/v1/media/{id}/list_reel_media_viewer", get(viewers))
        .route("/api/v1/archive/reel/day_shells", get(archived))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn fail(status: StatusCode, message: &str) -> Failure {
    (status, Json(json!({ "message": message, "status": "fail" })))
}

/// Rejects requests whose `Cookie` header carries no `sessionid`.
fn authorize(headers: &HeaderMap) -> Result<(), Failure> {
    let has_session = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(|cookies| {
            cookies.split(';').any(|pair| {
                matches!(pair.trim().split_once('='), Some(("sessionid", value)) if !value.is_empty())
            })
        })
        .unwrap_or(false);
    if has_session {
        Ok(())
    } else {
        tracing::debug!("rejecting unauthenticated request");
        Err(fail(StatusCode::FORBIDDEN, "login_required"))
    }
}

fn media_not_found() -> Failure {
    fail(StatusCode::NOT_FOUND, "Media not found or unavailable")
}

/// Slices `items` at the offset encoded in `max_id`.
fn page<T: Clone>(items: &[T], max_id: Option<&str>) -> Result<(Vec<T>, Option<String>), Failure> {
    let start = match max_id {
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|_| fail(StatusCode::BAD_REQUEST, "invalid max_id"))?,
        None => 0,
    };
    let start = start.min(items.len());
    let end = (start + PAGE_SIZE).min(items.len());
    let next = (end < items.len()).then(|| end.to_string());
    Ok((items[start..end].to_vec(), next))
}

async fn media_info(State(db): State<Db>, Path(id): Path<String>, headers: HeaderMap) -> Reply {
    authorize(&headers)?;
    let store = db.read().await;
    let media = store.media.get(&id).ok_or_else(media_not_found)?;
    Ok(Json(json!({
        "items": [{
            "id": format!("{}_{}", media.id, media.owner.pk),
            "pk": media.id.parse::<u64>().unwrap_or_default(),
            "code": media.code,
            "media_type": 1,
            "taken_at": 1_600_000_000,
            "caption": { "text": media.caption },
            "like_count": media.likers.len(),
            "comment_count": media.comments.len(),
            "has_viewer_saved": media.saved,
            "user": media.owner,
        }],
        "num_results": 1,
        "status": "ok",
    })))
}

async fn permalink(State(db): State<Db>, Path(id): Path<String>, headers: HeaderMap) -> Reply {
    authorize(&headers)?;
    let store = db.read().await;
    let media = store.media.get(&id).ok_or_else(media_not_found)?;
    Ok(Json(json!({
        "permalink": format!("https://www.instagram.com/p/{}/", media.code),
        "status": "ok",
    })))
}

async fn likers(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(query): Query<PageQuery>,
    headers: HeaderMap,
) -> Reply {
    authorize(&headers)?;
    let store = db.read().await;
    let media = store.media.get(&id).ok_or_else(media_not_found)?;
    let (users, next) = page(&media.likers, query.max_id.as_deref())?;
    Ok(Json(json!({
        "users": users,
        "user_count": media.likers.len(),
        "next_max_id": next,
        "status": "ok",
    })))
}

async fn comments(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(query): Query<PageQuery>,
    headers: HeaderMap,
) -> Reply {
    authorize(&headers)?;
    let store = db.read().await;
    let media = store.media.get(&id).ok_or_else(media_not_found)?;
    let (comments, next) = page(&media.comments, query.max_id.as_deref())?;
    // The live API reports comment cursors as numbers.
    let next = next.and_then(|n| n.parse::<u64>().ok());
    Ok(Json(json!({
        "comments": comments,
        "comment_count": media.comments.len(),
        "next_max_id": next,
        "status": "ok",
    })))
}

async fn viewers(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(query): Query<PageQuery>,
    headers: HeaderMap,
) -> Reply {
    authorize(&headers)?;
    let store = db.read().await;
    let media = store.media.get(&id).ok_or_else(media_not_found)?;
    let (users, next) = page(&media.viewers, query.max_id.as_deref())?;
    Ok(Json(json!({
        "users": users,
        "total_viewer_count": media.viewers.len(),
        "next_max_id": next,
        "status": "ok",
    })))
}

async fn archived(State(db): State<Db>, Query(query): Query<PageQuery>, headers: HeaderMap) -> Reply {
    authorize(&headers)?;
    let store = db.read().await;
    let (items, next) = page(&store.archive, query.max_id.as_deref())?;
    Ok(Json(json!({
        "items": items,
        "num_results": items.len(),
        "next_max_id": next,
        "status": "ok",
    })))
}

async fn save(State(db): State<Db>, Path(id): Path<String>, headers: HeaderMap) -> Reply {
    set_saved(db, id, headers, true).await
}

async fn unsave(State(db): State<Db>, Path(id): Path<String>, headers: HeaderMap) -> Reply {
    set_saved(db, id, headers, false).await
}

async fn set_saved(db: Db, id: String, headers: HeaderMap, saved: bool) -> Reply {
    authorize(&headers)?;
    let mut store = db.write().await;
    let media = store.media.get_mut(&id).ok_or_else(media_not_found)?;
    media.saved = saved;
    tracing::info!(media = %id, saved, "updated saved state");
    Ok(Json(json!({ "status": "ok" })))
}

async fn comment_like(State(db): State<Db>, Path(id): Path<String>, headers: HeaderMap) -> Reply {
    set_comment_liked(db, id, headers, true).await
}

async fn comment_unlike(State(db): State<Db>, Path(id): Path<String>, headers: HeaderMap) -> Reply {
    set_comment_liked(db, id, headers, false).await
}

async fn set_comment_liked(db: Db, id: String, headers: HeaderMap, liked: bool) -> Reply {
    authorize(&headers)?;
    let pk: u64 = id
        .parse()
        .map_err(|_| fail(StatusCode::BAD_REQUEST, "invalid comment id"))?;
    let mut store = db.write().await;
    let comment = store
        .comment_mut(pk)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Comment not found"))?;
    if comment.has_liked_comment != liked {
        comment.has_liked_comment = liked;
        if liked {
            comment.comment_like_count += 1;
        } else {
            comment.comment_like_count = comment.comment_like_count.saturating_sub(1);
        }
    }
    tracing::info!(comment = pk, liked, "updated comment like");
    Ok(Json(json!({ "status": "ok" })))
}
