use std::collections::BTreeSet;
use std::time::Duration;

use log::{debug, info, warn};
use reqwest::Client;

use crate::clients::{
    CanvasDownloaderExtractor, CanvasExtractor, CanvasPageClient, SpotifyClient, TokenAcquirer,
    entities::{
        ArtistPage, ParsedPageRecord, ScrapedCanvas, SearchResults, SearchType, TrackIdentifier,
        TrackMetadata, TrackRecord,
    },
    errors::{Error, Result},
    resolve_track_id,
};
use crate::composer::{compose, compose_scraped};
use crate::settings::Settings;

pub const DEFAULT_SEARCH_LIMIT: u32 = 20;
pub const MAX_SEARCH_LIMIT: u32 = 50;

// Clients the service works with
pub struct Config {
    pub tokens: TokenAcquirer,
    pub spotify: SpotifyClient,
    pub canvas: CanvasPageClient,
    pub extractor: Box<dyn CanvasExtractor>,
}

pub struct ConfigBuilder {
    settings: Settings,
    tokens: Option<TokenAcquirer>,
    extractor: Option<Box<dyn CanvasExtractor>>,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            settings: Settings::default(),
            tokens: None,
            extractor: None, // canvasdownloader.com markup unless overridden
        }
    }

    #[must_use]
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn tokens(mut self, tokens: TokenAcquirer) -> Self {
        self.tokens = Some(tokens);
        self
    }

    #[must_use]
    pub fn extractor(mut self, extractor: Box<dyn CanvasExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    pub fn build(self) -> Result<Config> {
        let settings = self.settings;
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| Error::ConfigurationError(format!("HTTP client: {e}")))?;

        let tokens = match self.tokens {
            Some(t) => t,
            None => {
                let credentials = settings.credentials();
                if credentials.is_none() {
                    info!(
                        "No Spotify application credentials configured, using anonymous sessions"
                    );
                }
                TokenAcquirer::with_default_strategies(
                    http.clone(),
                    credentials,
                    &settings.accounts_url,
                    &settings.web_player_url,
                )
            }
        };

        Ok(Config {
            tokens,
            spotify: SpotifyClient::new(http.clone(), &settings.api_url, &settings.market),
            canvas: CanvasPageClient::new(http, &settings.canvas_page_url),
            extractor: self
                .extractor
                .unwrap_or_else(|| Box::new(CanvasDownloaderExtractor)),
        })
    }
}

/// Parse a comma separated `artist,track` list. Empty means both.
pub fn parse_search_types(raw: &str) -> Result<BTreeSet<SearchType>> {
    let types = raw
        .split(',')
        .filter(|t| !t.trim().is_empty())
        .map(str::parse)
        .collect::<Result<BTreeSet<SearchType>>>()?;
    if types.is_empty() {
        Ok(BTreeSet::from([SearchType::Artist, SearchType::Track]))
    } else {
        Ok(types)
    }
}

/// Request handlers behind both the CLI and the HTTP API. Every call runs
/// its own fetch chain; nothing is shared between calls except the clients.
pub struct CanvasService {
    config: Config,
}

impl CanvasService {
    pub fn new(config: Config) -> Self {
        CanvasService { config }
    }

    async fn track_metadata(&self, id: &TrackIdentifier) -> Result<TrackMetadata> {
        let token = self.config.tokens.acquire().await?;
        self.config.spotify.fetch_track(id, &token).await
    }

    async fn scrape(&self, id: &TrackIdentifier) -> ScrapedCanvas {
        match self.config.canvas.fetch_page(id).await {
            Ok(html) => self.config.extractor.extract(&html),
            Err(e) => {
                warn!("Canvas page unavailable for {id}: {e}");
                ScrapedCanvas::default()
            }
        }
    }

    /// Resolve a pasted link or id and build its record from the catalog and
    /// the Canvas page, fetched concurrently.
    ///
    /// Unresolvable input and tracks the catalog does not know are errors.
    /// Auth or transport failures give a degraded record instead.
    pub async fn resolve_and_fetch_track(&self, link_or_id: &str) -> Result<TrackRecord> {
        let id = resolve_track_id(link_or_id).ok_or_else(|| {
            Error::InvalidInput(format!("could not find a track id in {link_or_id:?}"))
        })?;
        info!("Fetching track {id}");

        let (metadata, scraped) = futures::join!(self.track_metadata(&id), self.scrape(&id));
        let metadata = match metadata {
            Ok(m) => Some(m),
            Err(e @ Error::NotFound(_)) => return Err(e),
            Err(e) => {
                warn!("Catalog metadata unavailable for {id}: {e}");
                None
            }
        };

        let record = compose(&id, metadata.as_ref(), &scraped);
        debug!(
            "Composed track {id}: canvas={} network_error={}",
            record.canvas_url.is_some(),
            record.network_error
        );
        Ok(record)
    }

    pub async fn fetch_artist(&self, artist_id: &str) -> Result<ArtistPage> {
        let artist_id = artist_id.trim();
        info!("Fetching artist {artist_id}");
        let token = self.config.tokens.acquire().await?;
        self.config.spotify.fetch_artist(artist_id, &token).await
    }

    /// Advisory search: upstream trouble yields empty lists, not errors
    pub async fn search(
        &self,
        query: &str,
        types: &BTreeSet<SearchType>,
        limit: u32,
    ) -> Result<SearchResults> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::InvalidInput("search query is empty".into()));
        }
        let all = BTreeSet::from([SearchType::Artist, SearchType::Track]);
        let types = if types.is_empty() { &all } else { types };
        let limit = limit.clamp(1, MAX_SEARCH_LIMIT);

        let token = match self.config.tokens.acquire().await {
            Ok(token) => token,
            Err(e) => {
                warn!("Search for {query:?} skipped: {e}");
                return Ok(SearchResults::default());
            }
        };

        match self.config.spotify.search(query, types, limit, &token).await {
            Ok(results) => {
                debug!(
                    "Search {query:?}: {} artists, {} tracks",
                    results.artists.len(),
                    results.tracks.len()
                );
                Ok(results)
            }
            Err(e) => {
                warn!("Search for {query:?} failed: {e}");
                Ok(SearchResults::default())
            }
        }
    }

    /// Build a record from a Canvas page body the caller already fetched
    pub fn parse_scraped_page(
        &self,
        html: &str,
        original_link: Option<&str>,
    ) -> Result<ParsedPageRecord> {
        if html.trim().is_empty() {
            return Err(Error::InvalidInput("missing HTML content".into()));
        }
        let id = original_link.and_then(resolve_track_id);
        let scraped = self.config.extractor.extract(html);
        Ok(compose_scraped(id.as_ref(), &scraped))
    }
}
