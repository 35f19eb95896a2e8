//! Fake HTTP services
//!
//! Each test spawns its own servers on random ports. Servers shut down
//! gracefully when their handle is dropped.

use super::constants::*;
use super::fixtures::test_catalog;
use axum::extract::{Path, Query, State};
use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Bind a random port and serve `app` until the returned sender is dropped.
async fn serve(app: Router) -> (String, oneshot::Sender<()>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let port = listener
        .local_addr()
        .expect("Failed to get local address")
        .port();

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .expect("Server failed");
    });

    (format!("http://127.0.0.1:{}", port), shutdown_tx)
}

// ============================================================================
// Streaming service
// ============================================================================

#[derive(Default)]
struct ServiceState {
    base_url: String,
    catalog: Vec<Value>,
    playlists: HashMap<String, Vec<Value>>,
    liked: Vec<Value>,
    searches: usize,
    adds: usize,
    removes: usize,
}

type SharedState = Arc<Mutex<ServiceState>>;

/// In-memory imitation of the streaming service's web API.
///
/// Every endpoint requires `Authorization: Bearer <TEST_TOKEN>`. Playlist
/// listings are paginated by [`PAGE_SIZE`].
pub struct FakeStreamingService {
    /// API root, e.g. "http://127.0.0.1:12345/v1"
    pub api_url: String,
    state: SharedState,
    _shutdown_tx: oneshot::Sender<()>,
}

impl FakeStreamingService {
    pub async fn spawn() -> Self {
        let state: SharedState = Arc::new(Mutex::new(ServiceState {
            catalog: test_catalog(),
            ..Default::default()
        }));

        let app = Router::new()
            .route(
                "/v1/playlists/{id}/tracks",
                get(list_playlist).post(add_track).delete(remove_track),
            )
            .route("/v1/me/tracks", get(list_liked))
            .route("/v1/search", get(search))
            .with_state(state.clone());

        let (base_url, shutdown_tx) = serve(app).await;
        state.lock().unwrap().base_url = base_url.clone();

        Self {
            api_url: format!("{}/v1", base_url),
            state,
            _shutdown_tx: shutdown_tx,
        }
    }

    /// Replace a playlist with catalog tracks, in order. Ids may repeat.
    pub fn set_playlist(&self, playlist_id: &str, track_ids: &[&str]) {
        let mut state = self.state.lock().unwrap();
        let tracks = track_ids
            .iter()
            .map(|id| find_in_catalog(&state.catalog, id).expect("Unknown fixture track"))
            .collect();
        state.playlists.insert(playlist_id.to_string(), tracks);
    }

    pub fn set_liked(&self, track_ids: &[&str]) {
        let mut state = self.state.lock().unwrap();
        state.liked = track_ids
            .iter()
            .map(|id| find_in_catalog(&state.catalog, id).expect("Unknown fixture track"))
            .collect();
    }

    /// Track ids of a playlist as the service sees them.
    pub fn playlist(&self, playlist_id: &str) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .playlists
            .get(playlist_id)
            .map(|tracks| {
                tracks
                    .iter()
                    .map(|t| t["id"].as_str().unwrap_or_default().to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn searches(&self) -> usize {
        self.state.lock().unwrap().searches
    }

    pub fn adds(&self) -> usize {
        self.state.lock().unwrap().adds
    }

    pub fn removes(&self) -> usize {
        self.state.lock().unwrap().removes
    }
}

fn find_in_catalog(catalog: &[Value], id: &str) -> Option<Value> {
    catalog.iter().find(|t| t["id"] == id).cloned()
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", TEST_TOKEN))
        .unwrap_or(false)
}

fn track_id_from_uri(uri: &str) -> Option<&str> {
    uri.strip_prefix("spotify:track:")
}

fn page(tracks: &[Value], offset: usize, next_base: &str) -> Value {
    let end = (offset + PAGE_SIZE).min(tracks.len());
    let items: Vec<Value> = tracks
        .get(offset..end)
        .unwrap_or_default()
        .iter()
        .map(|t| json!({ "track": t }))
        .collect();
    let next = if end < tracks.len() {
        json!(format!("{}offset={}", next_base, end))
    } else {
        Value::Null
    };
    json!({ "items": items, "next": next })
}

fn offset(query: &HashMap<String, String>) -> usize {
    query
        .get("offset")
        .and_then(|o| o.parse().ok())
        .unwrap_or(0)
}

async fn list_playlist(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let state = state.lock().unwrap();
    let Some(tracks) = state.playlists.get(&id) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let next_base = format!("{}/v1/playlists/{}/tracks?", state.base_url, id);
    Json(page(tracks, offset(&query), &next_base)).into_response()
}

async fn list_liked(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let state = state.lock().unwrap();
    let next_base = format!("{}/v1/me/tracks?limit=50&", state.base_url);
    Json(page(&state.liked, offset(&query), &next_base)).into_response()
}

async fn add_track(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let mut state = state.lock().unwrap();
    let Some(track) = query
        .get("uris")
        .and_then(|uri| track_id_from_uri(uri))
        .and_then(|track_id| find_in_catalog(&state.catalog, track_id))
    else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    state.adds += 1;
    state.playlists.entry(id).or_default().push(track);
    (StatusCode::CREATED, Json(json!({ "snapshot_id": "s" }))).into_response()
}

async fn remove_track(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let ids: Vec<String> = body["tracks"]
        .as_array()
        .map(|tracks| {
            tracks
                .iter()
                .filter_map(|t| t["uri"].as_str())
                .filter_map(track_id_from_uri)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let mut state = state.lock().unwrap();
    state.removes += 1;
    if let Some(tracks) = state.playlists.get_mut(&id) {
        tracks.retain(|t| !ids.iter().any(|id| t["id"] == id.as_str()));
    }
    Json(json!({ "snapshot_id": "s" })).into_response()
}

/// Matches catalog tracks whose name appears in the query.
async fn search(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let q = query.get("q").cloned().unwrap_or_default().to_lowercase();
    let mut state = state.lock().unwrap();
    state.searches += 1;
    let items: Vec<Value> = state
        .catalog
        .iter()
        .filter(|t| {
            t["name"]
                .as_str()
                .map(|name| q.contains(&name.to_lowercase()))
                .unwrap_or(false)
        })
        .cloned()
        .collect();
    Json(json!({ "tracks": { "items": items } })).into_response()
}

// ============================================================================
// Web pages and radio streams
// ============================================================================

/// Serves fixed bodies by path; anything else is a 404.
pub struct FakeWebServer {
    pub base_url: String,
    _shutdown_tx: oneshot::Sender<()>,
}

impl FakeWebServer {
    pub async fn spawn(pages: Vec<(&str, Vec<u8>)>) -> Self {
        let pages: Arc<HashMap<String, Vec<u8>>> = Arc::new(
            pages
                .into_iter()
                .map(|(path, body)| (path.to_string(), body))
                .collect(),
        );
        let app = Router::new().fallback(serve_page).with_state(pages);
        let (base_url, shutdown_tx) = serve(app).await;
        Self {
            base_url,
            _shutdown_tx: shutdown_tx,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn serve_page(State(pages): State<Arc<HashMap<String, Vec<u8>>>>, uri: Uri) -> Response {
    match pages.get(uri.path()) {
        Some(body) => body.clone().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
