//! Rcanvas - Spotify track lookup with Canvas loop videos
//!
//! This library resolves pasted Spotify links, fetches track and artist
//! metadata from the catalog API and scrapes a third-party page for the
//! track's Canvas video.

/// Client modules for interacting with external services
pub mod clients;
/// Merging of catalog metadata and scraped page data
pub mod composer;
/// HTTP API exposing the service
pub mod http_api;
/// Client wiring and request handlers
pub mod service;
/// Upstream endpoints and credentials
pub mod settings;
