use clap::Args;
use rspotify::Credentials;

pub const DEFAULT_ACCOUNTS_URL: &str = "https://accounts.spotify.com";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_WEB_PLAYER_URL: &str = "https://open.spotify.com";
pub const DEFAULT_CANVAS_PAGE_URL: &str = "https://www.canvasdownloader.com";
pub const DEFAULT_MARKET: &str = "US";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Upstream endpoints and credentials. Read once at startup and handed to
/// the clients; nothing looks at the environment afterwards.
#[derive(Args, Debug, Clone)]
pub struct Settings {
    /// Spotify application client id
    #[arg(long, env = "SPOTIFY_CLIENT_ID")]
    pub client_id: Option<String>,

    /// Spotify application client secret
    #[arg(long, env = "SPOTIFY_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    #[arg(long, env = "RCANVAS_ACCOUNTS_URL", default_value = DEFAULT_ACCOUNTS_URL)]
    pub accounts_url: String,

    #[arg(long, env = "RCANVAS_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    #[arg(long, env = "RCANVAS_WEB_PLAYER_URL", default_value = DEFAULT_WEB_PLAYER_URL)]
    pub web_player_url: String,

    #[arg(long, env = "RCANVAS_CANVAS_PAGE_URL", default_value = DEFAULT_CANVAS_PAGE_URL)]
    pub canvas_page_url: String,

    /// Market used for artist top tracks
    #[arg(long, env = "RCANVAS_MARKET", default_value = DEFAULT_MARKET)]
    pub market: String,

    /// Timeout for every outbound request, in seconds
    #[arg(long, env = "RCANVAS_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            client_id: None,
            client_secret: None,
            accounts_url: DEFAULT_ACCOUNTS_URL.into(),
            api_url: DEFAULT_API_URL.into(),
            web_player_url: DEFAULT_WEB_PLAYER_URL.into(),
            canvas_page_url: DEFAULT_CANVAS_PAGE_URL.into(),
            market: DEFAULT_MARKET.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// Application credentials, only when both halves are present
    pub fn credentials(&self) -> Option<Credentials> {
        match (self.client_id.as_deref(), self.client_secret.as_deref()) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => {
                Some(Credentials::new(id, secret))
            }
            _ => None,
        }
    }
}
