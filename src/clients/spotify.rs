use std::collections::BTreeSet;

use log::{debug, warn};
use reqwest::{Client, StatusCode};
use rspotify::model::ArtistId;
use rspotify::prelude::*;
use serde::{Deserialize, de::DeserializeOwned};

use crate::clients::{
    entities::{
        AccessToken, ArtistPage, ArtistRecord, SearchResults, SearchType, TrackIdentifier,
        TrackMetadata, TrackRecord, UNKNOWN_ALBUM, UNKNOWN_ARTIST, UNKNOWN_TRACK,
    },
    errors::{Error, Result},
};

#[derive(Deserialize, Debug)]
struct ApiImage {
    url: String,
}

#[derive(Deserialize, Debug, Default)]
struct ApiExternalUrls {
    spotify: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ApiArtistRef {
    name: String,
}

#[derive(Deserialize, Debug, Default)]
struct ApiAlbum {
    #[serde(default)]
    name: String,
    #[serde(default)]
    images: Vec<ApiImage>,
}

#[derive(Deserialize, Debug)]
struct ApiTrack {
    id: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    artists: Vec<ApiArtistRef>,
    #[serde(default)]
    album: ApiAlbum,
    #[serde(default)]
    external_urls: ApiExternalUrls,
    preview_url: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
struct ApiFollowers {
    #[serde(default)]
    total: u64,
}

#[derive(Deserialize, Debug)]
struct ApiArtist {
    id: String,
    name: String,
    #[serde(default)]
    images: Vec<ApiImage>,
    #[serde(default)]
    followers: ApiFollowers,
    #[serde(default)]
    genres: Vec<String>,
    #[serde(default)]
    external_urls: ApiExternalUrls,
}

#[derive(Deserialize, Debug)]
struct TopTracksResponse {
    tracks: Vec<ApiTrack>,
}

#[derive(Deserialize, Debug)]
struct Paging<T> {
    items: Vec<Option<T>>,
}

#[derive(Deserialize, Debug)]
struct SearchResponse {
    artists: Option<Paging<ApiArtist>>,
    tracks: Option<Paging<ApiTrack>>,
}

fn or_sentinel(value: String, sentinel: &str) -> String {
    if value.trim().is_empty() {
        sentinel.to_string()
    } else {
        value
    }
}

impl From<ApiTrack> for TrackMetadata {
    fn from(t: ApiTrack) -> TrackMetadata {
        let id = t.id.unwrap_or_default();
        let mut artists: Vec<String> = t
            .artists
            .into_iter()
            .map(|a| a.name)
            .filter(|name| !name.is_empty())
            .collect();
        if artists.is_empty() {
            artists.push(UNKNOWN_ARTIST.to_string());
        }
        let external_url = t
            .external_urls
            .spotify
            .unwrap_or_else(|| format!("https://open.spotify.com/track/{id}"));
        TrackMetadata {
            name: or_sentinel(t.name, UNKNOWN_TRACK),
            artists,
            album: or_sentinel(t.album.name, UNKNOWN_ALBUM),
            // images come largest first
            album_art: t.album.images.into_iter().next().map(|i| i.url),
            external_url,
            preview_url: t.preview_url,
            id,
        }
    }
}

impl From<ApiArtist> for ArtistRecord {
    fn from(a: ApiArtist) -> ArtistRecord {
        let spotify_url = a
            .external_urls
            .spotify
            .unwrap_or_else(|| format!("https://open.spotify.com/artist/{}", a.id));
        ArtistRecord {
            name: or_sentinel(a.name, UNKNOWN_ARTIST),
            image: a.images.into_iter().next().map(|i| i.url),
            followers: a.followers.total,
            genres: a.genres,
            spotify_url,
            id: a.id,
        }
    }
}

/// Thin client over the official catalog API
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    market: String,
}

impl SpotifyClient {
    pub fn new(http: Client, api_url: &str, market: &str) -> Self {
        SpotifyClient {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            market: market.to_string(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        token: &AccessToken,
        entity: &str,
    ) -> Result<T> {
        let url = format!("{}{path}", self.api_url);
        debug!("GET {url}");
        let response = self
            .http
            .get(&url)
            .bearer_auth(token.bearer())
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(entity.to_string()));
        }
        if !status.is_success() {
            return Err(Error::UpstreamUnavailable(format!(
                "catalog API answered {status} for {entity}"
            )));
        }
        Ok(response.json().await?)
    }

    pub async fn fetch_track(
        &self,
        id: &TrackIdentifier,
        token: &AccessToken,
    ) -> Result<TrackMetadata> {
        let track: ApiTrack = self
            .get_json(
                &format!("/tracks/{id}"),
                &[],
                token,
                &format!("track {id}"),
            )
            .await?;
        let mut metadata = TrackMetadata::from(track);
        if metadata.id.is_empty() {
            metadata.id = id.to_string();
        }
        Ok(metadata)
    }

    // A failing top-tracks call still yields the artist, with no tracks
    pub async fn fetch_artist(&self, artist_id: &str, token: &AccessToken) -> Result<ArtistPage> {
        if artist_id.is_empty() {
            return Err(Error::InvalidInput("artist id is empty".into()));
        }
        let artist_id = ArtistId::from_id(artist_id)
            .map_err(|e| Error::InvalidInput(format!("artist id {artist_id:?}: {e}")))?;
        let id = artist_id.id();

        let artist: ApiArtist = self
            .get_json(&format!("/artists/{id}"), &[], token, &format!("artist {id}"))
            .await?;

        let tracks = match self
            .get_json::<TopTracksResponse>(
                &format!("/artists/{id}/top-tracks"),
                &[("market", self.market.as_str())],
                token,
                &format!("top tracks of {id}"),
            )
            .await
        {
            Ok(top) => top
                .tracks
                .into_iter()
                .map(|t| TrackRecord::from(TrackMetadata::from(t)))
                .collect(),
            Err(e) => {
                warn!("Top tracks unavailable for artist {id}: {e}");
                Vec::new()
            }
        };

        Ok(ArtistPage {
            artist: artist.into(),
            tracks,
        })
    }

    pub async fn search(
        &self,
        query: &str,
        types: &BTreeSet<SearchType>,
        limit: u32,
        token: &AccessToken,
    ) -> Result<SearchResults> {
        let types = types
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(",");
        let limit = limit.to_string();
        let response: SearchResponse = self
            .get_json(
                "/search",
                &[("q", query), ("type", types.as_str()), ("limit", limit.as_str())],
                token,
                "search",
            )
            .await?;

        Ok(SearchResults {
            artists: response
                .artists
                .map(|page| page.items.into_iter().flatten().map(Into::into).collect())
                .unwrap_or_default(),
            tracks: response
                .tracks
                .map(|page| {
                    page.items
                        .into_iter()
                        .flatten()
                        .map(|t| TrackRecord::from(TrackMetadata::from(t)))
                        .collect()
                })
                .unwrap_or_default(),
        })
    }
}
