use std::sync::LazyLock;

use log::debug;
use regex::Regex;
use rspotify::model::TrackId;

use crate::clients::entities::TrackIdentifier;

const TRACK_URI_PREFIX: &str = "spotify:track:";
const BARE_ID_LEN: usize = 22;

// Ordered from most to least specific; the first hit wins.
static TRACK_URL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"spotify\.com/track/([a-zA-Z0-9]+)",
        r"spotify\.com/intl-[a-z]+/track/([a-zA-Z0-9]+)",
        r"open\.spotify\.com/track/([a-zA-Z0-9]+)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("track url pattern is a valid regex"))
    .collect()
});

/// Pull a track id out of whatever the user pasted.
///
/// Accepts `spotify:track:<id>` URIs, `open.spotify.com` links (with or
/// without an `intl-xx` locale segment and query string) and bare 22
/// character ids. Returns `None` when nothing matches.
pub fn resolve_track_id(input: &str) -> Option<TrackIdentifier> {
    let input = input.trim();

    let candidate = if input.starts_with(TRACK_URI_PREFIX) {
        input.split(':').nth(2)
    } else if let Some(id) = TRACK_URL_PATTERNS
        .iter()
        .find_map(|re| re.captures(input).and_then(|c| c.get(1)))
    {
        Some(id.as_str())
    } else if input.len() == BARE_ID_LEN && input.chars().all(|c| c.is_ascii_alphanumeric()) {
        Some(input)
    } else {
        None
    };

    let id = candidate.filter(|id| !id.is_empty())?;
    match TrackId::from_id(id.to_owned()) {
        Ok(track_id) => Some(TrackIdentifier::new(track_id.into_static())),
        Err(e) => {
            debug!("Rejected track id candidate {id:?}: {e}");
            None
        }
    }
}
