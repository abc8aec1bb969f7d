//! Merges official catalog metadata with scraped Canvas page data.
//!
//! Display fields (artist names, canvas video) come from the scrape when it
//! has them. Album and link fields come from the catalog.

use crate::clients::entities::{
    ParsedPageRecord, ScrapedCanvas, TrackIdentifier, TrackMetadata, TrackRecord, UNKNOWN_ALBUM,
    UNKNOWN_ARTIST, UNKNOWN_TRACK,
};

fn display_artists(scraped: &ScrapedCanvas, fallback: Option<&[String]>) -> Vec<String> {
    // The scraped name wins even when the catalog disagrees.
    if let Some(name) = &scraped.artist_name {
        return vec![name.clone()];
    }
    match fallback {
        Some(artists) if !artists.is_empty() => artists.to_vec(),
        _ => vec![UNKNOWN_ARTIST.to_string()],
    }
}

/// Build the outward record for `id`. `metadata` is `None` when the catalog
/// call failed; the record is then flagged as a network error unless the
/// scrape alone carries something to display.
pub fn compose(
    id: &TrackIdentifier,
    metadata: Option<&TrackMetadata>,
    scraped: &ScrapedCanvas,
) -> TrackRecord {
    let name = metadata
        .map(|m| m.name.clone())
        .or_else(|| scraped.track_name.clone())
        .unwrap_or_else(|| UNKNOWN_TRACK.to_string());

    TrackRecord {
        id: id.to_string(),
        name,
        artists: display_artists(scraped, metadata.map(|m| m.artists.as_slice())),
        album: metadata.map_or_else(|| UNKNOWN_ALBUM.to_string(), |m| m.album.clone()),
        album_art: metadata
            .and_then(|m| m.album_art.clone())
            .or_else(|| scraped.album_art.clone())
            .or_else(|| scraped.artist_image.clone()),
        canvas_url: scraped.canvas_url.clone(),
        artist_image: scraped.artist_image.clone(),
        spotify_url: metadata.map_or_else(|| id.canonical_url(), |m| m.external_url.clone()),
        preview_url: metadata.and_then(|m| m.preview_url.clone()),
        network_error: metadata.is_none() && !scraped.has_display_data(),
    }
}

/// Record for a page body handed in by the caller, with no catalog lookup
pub fn compose_scraped(link_id: Option<&TrackIdentifier>, scraped: &ScrapedCanvas) -> ParsedPageRecord {
    ParsedPageRecord {
        track_id: link_id.map(ToString::to_string),
        // The page shows the artist where a title would be expected
        name: scraped
            .artist_name
            .clone()
            .unwrap_or_else(|| UNKNOWN_TRACK.to_string()),
        artists: display_artists(scraped, None),
        album: UNKNOWN_ALBUM.to_string(),
        album_art: scraped.album_art.clone().or_else(|| scraped.artist_image.clone()),
        canvas_url: scraped.canvas_url.clone(),
        artist_image: scraped.artist_image.clone(),
        spotify_url: link_id.map(TrackIdentifier::canonical_url),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::resolve_track_id;

    fn id() -> TrackIdentifier {
        resolve_track_id("4cOdK2wGLETKBW3PvgPWqT").unwrap()
    }

    fn metadata() -> TrackMetadata {
        TrackMetadata {
            id: "4cOdK2wGLETKBW3PvgPWqT".into(),
            name: "Never Gonna Give You Up".into(),
            artists: vec!["Rick Astley".into()],
            album: "Whenever You Need Somebody".into(),
            album_art: Some("https://i.scdn.co/image/ab67616d0000b273aaaa".into()),
            external_url: "https://open.spotify.com/track/4cOdK2wGLETKBW3PvgPWqT".into(),
            preview_url: None,
        }
    }

    fn scraped() -> ScrapedCanvas {
        ScrapedCanvas {
            canvas_url: Some("https://canvaz.scdn.co/upload/x.cnvs.mp4".into()),
            artist_name: Some("Rick Astley (Official)".into()),
            artist_image: Some("https://i.scdn.co/image/ab6761610000e5ebbbbb".into()),
            track_name: None,
            album_art: None,
        }
    }

    #[test]
    fn scrape_wins_display_fields_catalog_wins_album_fields() {
        let record = compose(&id(), Some(&metadata()), &scraped());
        assert_eq!(record.name, "Never Gonna Give You Up");
        assert_eq!(record.artists, vec!["Rick Astley (Official)"]);
        assert_eq!(record.album, "Whenever You Need Somebody");
        assert_eq!(
            record.album_art.as_deref(),
            Some("https://i.scdn.co/image/ab67616d0000b273aaaa")
        );
        assert_eq!(
            record.canvas_url.as_deref(),
            Some("https://canvaz.scdn.co/upload/x.cnvs.mp4")
        );
        assert!(!record.network_error);
    }

    #[test]
    fn catalog_artists_used_when_scrape_has_none() {
        let record = compose(&id(), Some(&metadata()), &ScrapedCanvas::default());
        assert_eq!(record.artists, vec!["Rick Astley"]);
        assert_eq!(record.canvas_url, None);
        assert!(!record.network_error);
    }

    #[test]
    fn missing_catalog_with_useful_scrape_is_not_a_network_error() {
        let record = compose(&id(), None, &scraped());
        assert!(!record.network_error);
        assert_eq!(record.name, UNKNOWN_TRACK);
        assert_eq!(record.album, UNKNOWN_ALBUM);
        assert_eq!(
            record.album_art.as_deref(),
            Some("https://i.scdn.co/image/ab6761610000e5ebbbbb")
        );
        assert_eq!(
            record.spotify_url,
            "https://open.spotify.com/track/4cOdK2wGLETKBW3PvgPWqT"
        );
    }

    #[test]
    fn nothing_at_all_is_flagged_but_still_linkable() {
        let record = compose(&id(), None, &ScrapedCanvas::default());
        assert!(record.network_error);
        assert_eq!(record.name, UNKNOWN_TRACK);
        assert_eq!(record.artists, vec![UNKNOWN_ARTIST]);
        assert_eq!(
            record.spotify_url,
            "https://open.spotify.com/track/4cOdK2wGLETKBW3PvgPWqT"
        );
    }

    #[test]
    fn composing_twice_gives_the_same_record() {
        let (m, s) = (metadata(), scraped());
        assert_eq!(compose(&id(), Some(&m), &s), compose(&id(), Some(&m), &s));
        assert_eq!(compose(&id(), None, &s), compose(&id(), None, &s));
    }

    #[test]
    fn scraped_page_record_uses_sentinels() {
        let record = compose_scraped(None, &ScrapedCanvas::default());
        assert_eq!(record.track_id, None);
        assert_eq!(record.name, UNKNOWN_TRACK);
        assert_eq!(record.artists, vec![UNKNOWN_ARTIST]);
        assert_eq!(record.album, UNKNOWN_ALBUM);
        assert_eq!(record.spotify_url, None);
    }

    #[test]
    fn scraped_page_record_links_back_when_link_resolves() {
        let record = compose_scraped(Some(&id()), &scraped());
        assert_eq!(record.track_id.as_deref(), Some("4cOdK2wGLETKBW3PvgPWqT"));
        assert_eq!(record.name, "Rick Astley (Official)");
        assert_eq!(
            record.spotify_url.as_deref(),
            Some("https://open.spotify.com/track/4cOdK2wGLETKBW3PvgPWqT")
        );
    }

    #[test]
    fn scraped_page_record_names_after_artist_not_title() {
        let page = ScrapedCanvas {
            track_name: Some("Never Gonna Give You Up".into()),
            album_art: None,
            ..scraped()
        };
        let record = compose_scraped(None, &page);
        assert_eq!(record.name, "Rick Astley (Official)");
        assert_eq!(
            record.album_art.as_deref(),
            Some("https://i.scdn.co/image/ab6761610000e5ebbbbb")
        );
    }

    #[test]
    fn scraped_page_record_ignores_title_without_artist() {
        let page = ScrapedCanvas {
            track_name: Some("Never Gonna Give You Up".into()),
            ..ScrapedCanvas::default()
        };
        assert_eq!(compose_scraped(None, &page).name, UNKNOWN_TRACK);
    }
}
