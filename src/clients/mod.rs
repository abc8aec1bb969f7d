/// Catalog token acquisition strategies
pub mod auth;
/// Canvas page fetching and field extraction
pub mod canvas;
/// Data entities for tracks, artists and scraped pages
pub mod entities;
/// Error types and result aliases
pub mod errors;
/// Track identifier resolution from user input
pub mod resolver;
/// Spotify catalog API client
pub mod spotify;

pub use auth::TokenAcquirer;
pub use canvas::{CanvasDownloaderExtractor, CanvasExtractor, CanvasPageClient};
pub use resolver::resolve_track_id;
pub use spotify::SpotifyClient;
