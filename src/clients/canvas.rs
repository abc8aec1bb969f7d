use std::sync::LazyLock;

use log::debug;
use regex::Regex;
use reqwest::Client;

use crate::clients::{
    auth::BROWSER_USER_AGENT,
    entities::{ScrapedCanvas, TrackIdentifier},
    errors::{Error, Result},
};

/// Field-by-field extraction from a Canvas page. Each method stands alone so
/// a markup change only breaks the field it touches.
pub trait CanvasExtractor: Send + Sync {
    fn canvas_url(&self, html: &str) -> Option<String>;
    fn artist_name(&self, html: &str) -> Option<String>;
    fn artist_image(&self, html: &str) -> Option<String>;
    fn track_name(&self, html: &str) -> Option<String>;
    fn album_art(&self, html: &str) -> Option<String>;

    fn extract(&self, html: &str) -> ScrapedCanvas {
        ScrapedCanvas {
            canvas_url: self.canvas_url(html),
            artist_name: self.artist_name(html),
            artist_image: self.artist_image(html),
            track_name: self.track_name(html),
            album_art: self.album_art(html),
        }
    }
}

fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("canvas page pattern is a valid regex")
}

static CANVAS_VIDEO: LazyLock<Regex> =
    LazyLock::new(|| pattern(r#"https://canvaz\.scdn\.co/[^"'\s]+\.mp4"#));
static ARTIST_NAME: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"<b>([^<]+)</b>\s*</a>\s*</p>"));
static ARTIST_IMAGE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r#"https://i\.scdn\.co/image/ab6761610000[^"'\s]+"#));
static TITLE: LazyLock<Regex> = LazyLock::new(|| pattern(r"<title>\s*Canvas by ([^Â·<]+)"));
static ALBUM_ART: LazyLock<Regex> =
    LazyLock::new(|| pattern(r#"https://i\.scdn\.co/image/ab67616d[^"'\s]+"#));

fn first_match(re: &Regex, html: &str) -> Option<String> {
    re.find(html).map(|m| m.as_str().to_string())
}

fn first_group(re: &Regex, html: &str) -> Option<String> {
    re.captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extractor for canvasdownloader.com result pages
#[derive(Debug, Default, Clone, Copy)]
pub struct CanvasDownloaderExtractor;

impl CanvasExtractor for CanvasDownloaderExtractor {
    fn canvas_url(&self, html: &str) -> Option<String> {
        first_match(&CANVAS_VIDEO, html)
    }

    fn artist_name(&self, html: &str) -> Option<String> {
        first_group(&ARTIST_NAME, html)
    }

    fn artist_image(&self, html: &str) -> Option<String> {
        first_match(&ARTIST_IMAGE, html)
    }

    fn track_name(&self, html: &str) -> Option<String> {
        first_group(&TITLE, html)
    }

    fn album_art(&self, html: &str) -> Option<String> {
        first_match(&ALBUM_ART, html)
    }
}

/// Fetches the third-party page that exposes the Canvas video for a track
pub struct CanvasPageClient {
    http: Client,
    page_url: String,
}

impl CanvasPageClient {
    pub fn new(http: Client, base_url: &str) -> Self {
        CanvasPageClient {
            http,
            page_url: format!("{}/canvas", base_url.trim_end_matches('/')),
        }
    }

    pub async fn fetch_page(&self, id: &TrackIdentifier) -> Result<String> {
        let link = id.canonical_url();
        debug!("Fetching Canvas page for {link}");
        let response = self
            .http
            .get(&self.page_url)
            .query(&[("link", link.as_str())])
            .header(reqwest::header::USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::UpstreamUnavailable(format!(
                "Canvas page answered {status} for track {id}"
            )));
        }
        Ok(response.text().await?)
    }
}
