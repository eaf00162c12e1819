use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
    },
    time::Duration,
};

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode, Uri},
    routing::get,
    Json, Router,
};
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Entry {
    pub id: u64,
    pub author: String,
    pub body: String,
}

#[derive(Clone, Debug)]
pub struct MockConfig {
    pub app_key: String,
    pub app_secret: String,
    pub page_size: usize,
    /// Number of initial requests held for `stall_for` before being answered.
    pub stall_first: u32,
    pub stall_for: Duration,
}

impl MockConfig {
    pub fn new(app_key: &str, app_secret: &str) -> Self {
        Self {
            app_key: app_key.to_string(),
            app_secret: app_secret.to_string(),
            page_size: 2,
            stall_first: 0,
            stall_for: Duration::ZERO,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    config: Arc<MockConfig>,
    entries: Arc<RwLock<HashMap<String, Vec<Entry>>>>,
    hits: Arc<AtomicU32>,
}

impl AppState {
    pub fn new(config: MockConfig) -> Self {
        Self {
            config: Arc::new(config),
            entries: Arc::new(RwLock::new(HashMap::new())),
            hits: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Add `count` generated entries under `tag`.
    pub fn seed(self, tag: &str, count: u64) -> Self {
        let entries = (1..=count)
            .map(|id| Entry {
                id,
                author: format!("user{id}"),
                body: format!("#{tag} entry {id}"),
            })
            .collect();
        self.entries
            .try_write()
            .expect("seed must run before the state is shared with a server")
            .insert(tag.to_string(), entries);
        self
    }

    /// Requests received so far, including rejected ones.
    pub fn hits(&self) -> u32 {
        self.hits.load(Ordering::SeqCst)
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/Tags/Entries/{tag}/page/{page}/appkey/{appkey}", get(tag_entries))
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}

/// Signature the API expects: md5 of the secret followed by the full URL.
pub fn expected_sign(secret: &str, url: &str) -> String {
    format!("{:x}", Md5::digest(format!("{secret}{url}").as_bytes()))
}

fn api_error(status: StatusCode, code: u32, message: &str) -> (StatusCode, Json<Value>) {
    (
        status,
        Json(json!({ "error": { "code": code, "message_en": message } })),
    )
}

async fn tag_entries(
    State(state): State<AppState>,
    Path((tag, page, appkey)): Path<(String, u32, String)>,
    headers: HeaderMap,
    uri: Uri,
) -> (StatusCode, Json<Value>) {
    let hit = state.hits.fetch_add(1, Ordering::SeqCst) + 1;
    if hit <= state.config.stall_first {
        tokio::time::sleep(state.config.stall_for).await;
    }

    let host = headers
        .get("host")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost");
    let path = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    let url = format!("http://{host}{path}");

    if appkey != state.config.app_key {
        return api_error(StatusCode::FORBIDDEN, 1, "Invalid application key");
    }
    let sign = headers.get("apisign").and_then(|h| h.to_str().ok());
    if sign != Some(expected_sign(&state.config.app_secret, &url).as_str()) {
        return api_error(StatusCode::UNAUTHORIZED, 11, "Invalid API sign");
    }
    if page == 0 {
        return api_error(StatusCode::BAD_REQUEST, 13, "Invalid page");
    }

    let entries = state.entries.read().await;
    let all = entries.get(&tag).map(Vec::as_slice).unwrap_or(&[]);
    let size = state.config.page_size.max(1);
    let start = (page as usize - 1).saturating_mul(size);
    let data: Vec<Entry> = all.iter().skip(start).take(size).cloned().collect();

    let tag_segment = uri.path().split('/').nth(3).unwrap_or(tag.as_str());
    let link = |p: u32| format!("http://{host}/Tags/Entries/{tag_segment}/page/{p}/appkey/{appkey}");
    let next = (start + size < all.len()).then(|| link(page + 1));
    let prev = (page > 1).then(|| link(page - 1));

    (
        StatusCode::OK,
        Json(json!({ "data": data, "pagination": { "next": next, "prev": prev } })),
    )
}
