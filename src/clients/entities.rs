use std::fmt;
use std::str::FromStr;

use rspotify::model::TrackId;
use rspotify::prelude::*;
use serde::Serialize;

use crate::clients::errors::Error;

pub const UNKNOWN_TRACK: &str = "Unknown Track";
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
pub const UNKNOWN_ALBUM: &str = "Unknown Album";

/// Where an access token came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    ClientCredentials,
    AnonymousSession,
}

/// Bearer token for the catalog API. Lives for a single request.
#[derive(Clone)]
pub struct AccessToken {
    value: String,
    pub source: TokenSource,
}

impl AccessToken {
    pub fn new(value: impl Into<String>, source: TokenSource) -> Self {
        AccessToken {
            value: value.into(),
            source,
        }
    }

    pub fn bearer(&self) -> &str {
        &self.value
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

/// Catalog track id, only obtainable through the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackIdentifier(TrackId<'static>);

impl TrackIdentifier {
    pub(crate) fn new(id: TrackId<'static>) -> Self {
        TrackIdentifier(id)
    }

    pub fn as_str(&self) -> &str {
        self.0.id()
    }

    /// Public `open.spotify.com` link for this track
    pub fn canonical_url(&self) -> String {
        self.0.url()
    }
}

impl fmt::Display for TrackIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Track as returned by the official catalog API, before composition.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackMetadata {
    pub id: String,
    pub name: String,
    pub artists: Vec<String>,
    pub album: String,
    pub album_art: Option<String>,
    pub external_url: String,
    pub preview_url: Option<String>,
}

/// Best-effort fields pulled out of a Canvas page. Any of them may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapedCanvas {
    pub canvas_url: Option<String>,
    pub artist_name: Option<String>,
    pub artist_image: Option<String>,
    pub track_name: Option<String>,
    pub album_art: Option<String>,
}

impl ScrapedCanvas {
    /// True when the page gave us something worth showing on its own
    pub fn has_display_data(&self) -> bool {
        self.canvas_url.is_some() || self.artist_name.is_some() || self.track_name.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackRecord {
    pub id: String,
    pub name: String,
    pub artists: Vec<String>,
    pub album: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album_art: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canvas_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist_image: Option<String>,
    pub spotify_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub network_error: bool,
}

impl From<TrackMetadata> for TrackRecord {
    fn from(track: TrackMetadata) -> TrackRecord {
        TrackRecord {
            id: track.id,
            name: track.name,
            artists: track.artists,
            album: track.album,
            album_art: track.album_art,
            canvas_url: None,
            artist_image: None,
            spotify_url: track.external_url,
            preview_url: track.preview_url,
            network_error: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistRecord {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub followers: u64,
    pub genres: Vec<String>,
    pub spotify_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistPage {
    pub artist: ArtistRecord,
    pub tracks: Vec<TrackRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResults {
    pub artists: Vec<ArtistRecord>,
    pub tracks: Vec<TrackRecord>,
}

/// Entity kinds the search endpoint can be asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SearchType {
    Artist,
    Track,
}

impl SearchType {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchType::Artist => "artist",
            SearchType::Track => "track",
        }
    }
}

impl FromStr for SearchType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "artist" => Ok(SearchType::Artist),
            "track" => Ok(SearchType::Track),
            other => Err(Error::InvalidInput(format!("unsupported search type {other:?}"))),
        }
    }
}

/// Record built purely from a caller-supplied Canvas page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedPageRecord {
    pub track_id: Option<String>,
    pub name: String,
    pub artists: Vec<String>,
    pub album: String,
    pub album_art: Option<String>,
    pub canvas_url: Option<String>,
    pub artist_image: Option<String>,
    pub spotify_url: Option<String>,
}
