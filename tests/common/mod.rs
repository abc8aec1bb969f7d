//! In-process stand-in for the Spotify accounts/catalog services and the
//! Canvas page host, bound to an ephemeral local port.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use rcanvas::service::{CanvasService, ConfigBuilder};
use rcanvas::settings::Settings;
use serde_json::{Value, json};

pub const TRACK_ID: &str = "4cOdK2wGLETKBW3PvgPWqT";
pub const ARTIST_ID: &str = "0gxyHStUsqpMadRV0Di1Qt";
pub const CANVAS_URL: &str = "https://canvaz.scdn.co/upload/artist/0gxy/video/abc123.cnvs.mp4";
pub const ARTIST_IMAGE: &str = "https://i.scdn.co/image/ab6761610000e5eb0a1b2c3d";
pub const ALBUM_ART: &str = "https://i.scdn.co/image/ab67616d0000b273big";

#[derive(Clone)]
pub struct Upstream {
    pub credentials_status: u16,
    pub anonymous_status: u16,
    pub track_status: u16,
    pub artist_status: u16,
    pub top_tracks_status: u16,
    pub search_status: u16,
    pub canvas_status: u16,
    pub canvas_html: String,
    pub hits: Arc<Mutex<Vec<String>>>,
}

impl Default for Upstream {
    fn default() -> Self {
        Upstream {
            credentials_status: 200,
            anonymous_status: 200,
            track_status: 200,
            artist_status: 200,
            top_tracks_status: 200,
            search_status: 200,
            canvas_status: 200,
            canvas_html: canvas_page(),
            hits: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl Upstream {
    fn record(&self, hit: String) {
        self.hits.lock().unwrap().push(hit);
    }

    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }

    pub fn was_hit(&self, prefix: &str) -> bool {
        self.hits().iter().any(|h| h.starts_with(prefix))
    }
}

pub fn canvas_page() -> String {
    format!(
        r#"<!DOCTYPE html><html><head><title>Canvas by Never Gonna Give You Up · Canvas Downloader</title></head>
        <body>
          <img class="cover" src="{ALBUM_ART}">
          <video src="{CANVAS_URL}" loop muted></video>
          <img class="artist" src="{ARTIST_IMAGE}">
          <p><a href="https://open.spotify.com/artist/{ARTIST_ID}"><b>Rick Astley</b></a></p>
        </body></html>"#
    )
}

fn status(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap()
}

fn bearer(headers: &HeaderMap) -> String {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or("none")
        .to_string()
}

fn track_json(id: &str) -> Value {
    json!({
        "id": id,
        "name": "Never Gonna Give You Up",
        "artists": [{ "name": "Rick Astley", "id": ARTIST_ID }],
        "album": {
            "name": "Whenever You Need Somebody",
            "images": [
                { "url": ALBUM_ART, "height": 640, "width": 640 },
                { "url": "https://i.scdn.co/image/ab67616d00001e02small", "height": 300, "width": 300 }
            ]
        },
        "external_urls": { "spotify": format!("https://open.spotify.com/track/{id}") },
        "preview_url": "https://p.scdn.co/mp3-preview/abc"
    })
}

fn artist_json() -> Value {
    json!({
        "id": ARTIST_ID,
        "name": "Rick Astley",
        "images": [{ "url": ARTIST_IMAGE, "height": 640, "width": 640 }],
        "followers": { "href": null, "total": 4_200_000 },
        "genres": ["dance rock", "new wave pop"],
        "external_urls": { "spotify": format!("https://open.spotify.com/artist/{ARTIST_ID}") }
    })
}

async fn token(State(up): State<Upstream>, headers: HeaderMap, body: String) -> Response {
    let basic = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Basic "));
    up.record(format!("token basic={basic} body={body}"));
    if up.credentials_status != 200 {
        return (status(up.credentials_status), Json(json!({ "error": "invalid_client" }))).into_response();
    }
    Json(json!({ "access_token": "cc-token", "token_type": "Bearer", "expires_in": 3600 })).into_response()
}

async fn anonymous(State(up): State<Upstream>, headers: HeaderMap) -> Response {
    let agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    up.record(format!("anonymous agent={agent}"));
    if up.anonymous_status != 200 {
        return status(up.anonymous_status).into_response();
    }
    Json(json!({ "accessToken": "anon-token", "isAnonymous": true })).into_response()
}

async fn track(State(up): State<Upstream>, Path(id): Path<String>, headers: HeaderMap) -> Response {
    up.record(format!("track {id} bearer={}", bearer(&headers)));
    if up.track_status != 200 {
        return (status(up.track_status), Json(json!({ "error": { "status": up.track_status } }))).into_response();
    }
    Json(track_json(&id)).into_response()
}

async fn artist(State(up): State<Upstream>, Path(id): Path<String>, headers: HeaderMap) -> Response {
    up.record(format!("artist {id} bearer={}", bearer(&headers)));
    if up.artist_status != 200 {
        return status(up.artist_status).into_response();
    }
    Json(artist_json()).into_response()
}

async fn top_tracks(
    State(up): State<Upstream>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    up.record(format!(
        "top-tracks {id} market={}",
        query.get("market").cloned().unwrap_or_default()
    ));
    if up.top_tracks_status != 200 {
        return status(up.top_tracks_status).into_response();
    }
    Json(json!({ "tracks": [track_json(TRACK_ID), track_json("7GhIk7Il098yCjg4BQjzvb")] })).into_response()
}

async fn search(State(up): State<Upstream>, Query(query): Query<HashMap<String, String>>) -> Response {
    up.record(format!(
        "search q={} type={} limit={}",
        query.get("q").cloned().unwrap_or_default(),
        query.get("type").cloned().unwrap_or_default(),
        query.get("limit").cloned().unwrap_or_default()
    ));
    if up.search_status != 200 {
        return status(up.search_status).into_response();
    }
    let mut body = json!({});
    let kinds = query.get("type").cloned().unwrap_or_default();
    if kinds.contains("artist") {
        body["artists"] = json!({ "items": [artist_json()] });
    }
    if kinds.contains("track") {
        body["tracks"] = json!({ "items": [track_json(TRACK_ID), null] });
    }
    Json(body).into_response()
}

async fn canvas(State(up): State<Upstream>, Query(query): Query<HashMap<String, String>>) -> Response {
    up.record(format!(
        "canvas link={}",
        query.get("link").cloned().unwrap_or_default()
    ));
    if up.canvas_status != 200 {
        return status(up.canvas_status).into_response();
    }
    Html(up.canvas_html.clone()).into_response()
}

/// Start the fake upstream and return its base url
pub async fn spawn(upstream: Upstream) -> String {
    let app = Router::new()
        .route("/api/token", post(token))
        .route("/get_access_token", get(anonymous))
        .route("/v1/tracks/{id}", get(track))
        .route("/v1/artists/{id}", get(artist))
        .route("/v1/artists/{id}/top-tracks", get(top_tracks))
        .route("/v1/search", get(search))
        .route("/canvas", get(canvas))
        .with_state(upstream);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

pub fn settings(base: &str, with_credentials: bool) -> Settings {
    Settings {
        client_id: with_credentials.then(|| "app-id".to_string()),
        client_secret: with_credentials.then(|| "app-secret".to_string()),
        accounts_url: base.to_string(),
        api_url: format!("{base}/v1"),
        web_player_url: base.to_string(),
        canvas_page_url: base.to_string(),
        market: "SE".to_string(),
        timeout_secs: 5,
    }
}

pub async fn service(upstream: &Upstream, with_credentials: bool) -> CanvasService {
    let base = spawn(upstream.clone()).await;
    let config = ConfigBuilder::new()
        .settings(settings(&base, with_credentials))
        .build()
        .unwrap();
    CanvasService::new(config)
}
