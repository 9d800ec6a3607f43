use serde::{Deserialize, Serialize};

/// One playable entry of a playlist manifest.
///
/// Navigation identity is the decoded filename, so an encoded spelling
/// (`Some%20Song.mp3`) and a plain one (`Some Song.mp3`) refer to the same
/// track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub file: String,
}

impl Track {
    pub fn new(file: impl Into<String>) -> Self {
        Self { file: file.into() }
    }

    /// Filename with the extension stripped and percent-encoding decoded,
    /// as shown in the now-playing line and the track rows.
    pub fn display_name(&self) -> String {
        let stem = self
            .file
            .rsplit_once('.')
            .map_or(self.file.as_str(), |(stem, _)| stem);
        decode_component(stem)
    }

    /// Decoded last path segment, the spelling used to find this track
    /// inside a playlist.
    pub fn canonical_name(&self) -> String {
        canonical_name(&self.file)
    }

    /// Playable URL for this track inside `folder`.
    pub fn resolve_url(&self, folder: &str) -> String {
        join_url(folder, &self.file)
    }
}

/// Wire shape of a folder's `info.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaylistManifest {
    #[serde(default, deserialize_with = "songs_or_empty")]
    pub songs: Vec<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// A `songs` field that is missing or not an array of strings is an empty
/// track list, not a parse failure.
fn songs_or_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// The active ordered track list. Selecting a folder replaces it wholesale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Playlist {
    /// Folder path the tracks resolve against, e.g. `songs/road trip`.
    pub folder: String,
    pub tracks: Vec<Track>,
}

impl Playlist {
    pub fn from_manifest(folder: impl Into<String>, manifest: &PlaylistManifest) -> Self {
        Self {
            folder: folder.into(),
            tracks: manifest.songs.iter().map(Track::new).collect(),
        }
    }

    /// The degraded form a folder falls back to when its manifest cannot be
    /// read: no tracks, but the folder path still updated.
    pub fn empty(folder: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            tracks: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn first(&self) -> Option<&Track> {
        self.tracks.first()
    }

    /// Index of the track whose canonical name matches `reference`, itself a
    /// filename or a full URL.
    pub fn position_of(&self, reference: &str) -> Option<usize> {
        let wanted = canonical_name(reference);
        self.tracks
            .iter()
            .position(|track| track.canonical_name() == wanted)
    }

    /// Track after `current`. With no current (or an unknown) track playback
    /// enters at the first; the last track has no successor.
    pub fn next_after(&self, current: Option<&str>) -> Option<&Track> {
        if self.tracks.is_empty() {
            return None;
        }
        match current.and_then(|reference| self.position_of(reference)) {
            None => self.tracks.first(),
            Some(index) if index + 1 < self.tracks.len() => self.tracks.get(index + 1),
            Some(_) => None,
        }
    }

    /// Track before `current`, entering at the last when there is no current
    /// track. The first track has no predecessor.
    pub fn previous_before(&self, current: Option<&str>) -> Option<&Track> {
        if self.tracks.is_empty() {
            return None;
        }
        match current.and_then(|reference| self.position_of(reference)) {
            None => self.tracks.last(),
            Some(index) if index > 0 => self.tracks.get(index - 1),
            Some(_) => None,
        }
    }
}

/// One discovered playlist folder, rendered as a selectable card.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    /// Bare folder name under the songs root, already decoded.
    pub folder: String,
    pub title: String,
    pub description: String,
    pub cover: String,
}

/// Decoded last `/`-segment of a filename or URL.
pub fn canonical_name(reference: &str) -> String {
    let segment = reference.rsplit('/').next().unwrap_or("");
    decode_component(segment)
}

/// Percent-decode, falling back to the raw text on invalid sequences.
pub(crate) fn decode_component(text: &str) -> String {
    urlencoding::decode(text).map_or_else(|_| text.to_string(), |decoded| decoded.into_owned())
}

/// Join URL pieces with exactly one slash at the boundary.
pub fn join_url(base: &str, part: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        part.trim_start_matches('/')
    )
}

/// Render a position in seconds as `M:SS`. Zero, negative and non-finite
/// values (a duration the element has not reported yet) render as `00:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "00:00".to_string();
    }
    let whole = seconds as u64;
    format!("{}:{:02}", whole / 60, whole % 60)
}

/// Map a fractional seek-bar position onto the track duration.
pub fn seek_position(duration: f64, fraction: f64) -> f64 {
    duration * fraction.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playlist(files: &[&str]) -> Playlist {
        Playlist {
            folder: "songs/demo".to_string(),
            tracks: files.iter().map(|file| Track::new(*file)).collect(),
        }
    }

    #[test]
    fn format_time_pads_seconds_but_not_minutes() {
        assert_eq!(format_time(65.0), "1:05");
        assert_eq!(format_time(600.0), "10:00");
        assert_eq!(format_time(59.9), "0:59");
        assert_eq!(format_time(0.4), "0:00");
    }

    #[test]
    fn format_time_renders_invalid_input_as_zero() {
        assert_eq!(format_time(0.0), "00:00");
        assert_eq!(format_time(-5.0), "00:00");
        assert_eq!(format_time(f64::NAN), "00:00");
        assert_eq!(format_time(f64::INFINITY), "00:00");
    }

    #[test]
    fn display_name_strips_extension_and_decodes() {
        assert_eq!(Track::new("Some%20Song.mp3").display_name(), "Some Song");
        assert_eq!(Track::new("plain.mp3").display_name(), "plain");
        assert_eq!(Track::new("no extension").display_name(), "no extension");
    }

    #[test]
    fn canonical_name_is_the_decoded_last_segment() {
        assert_eq!(
            canonical_name("http://localhost:8000/songs/mix/Some%20Song.mp3"),
            "Some Song.mp3"
        );
        assert_eq!(canonical_name("Some Song.mp3"), "Some Song.mp3");
        assert_eq!(canonical_name("songs/mix/a.mp3"), "a.mp3");
    }

    #[test]
    fn position_matches_encoded_and_plain_spellings() {
        let playlist = playlist(&["One.mp3", "Some%20Song.mp3", "Three.mp3"]);
        assert_eq!(playlist.position_of("Some Song.mp3"), Some(1));
        assert_eq!(
            playlist.position_of("http://h/songs/demo/Some%20Song.mp3"),
            Some(1)
        );
        assert_eq!(playlist.position_of("missing.mp3"), None);
    }

    #[test]
    fn next_walks_forward_and_stops_at_the_end() {
        let playlist = playlist(&["1.mp3", "2.mp3", "3.mp3"]);
        assert_eq!(
            playlist.next_after(Some("1.mp3")).map(|t| t.file.as_str()),
            Some("2.mp3")
        );
        assert_eq!(
            playlist.next_after(Some("2.mp3")).map(|t| t.file.as_str()),
            Some("3.mp3")
        );
        assert!(playlist.next_after(Some("3.mp3")).is_none());
    }

    #[test]
    fn previous_walks_backward_and_stops_at_the_start() {
        let playlist = playlist(&["1.mp3", "2.mp3", "3.mp3"]);
        assert_eq!(
            playlist
                .previous_before(Some("3.mp3"))
                .map(|t| t.file.as_str()),
            Some("2.mp3")
        );
        assert_eq!(
            playlist
                .previous_before(Some("2.mp3"))
                .map(|t| t.file.as_str()),
            Some("1.mp3")
        );
        assert!(playlist.previous_before(Some("1.mp3")).is_none());
    }

    #[test]
    fn navigation_without_a_current_track_enters_at_the_edges() {
        let playlist = playlist(&["1.mp3", "2.mp3", "3.mp3"]);
        assert_eq!(
            playlist.next_after(None).map(|t| t.file.as_str()),
            Some("1.mp3")
        );
        assert_eq!(
            playlist.previous_before(None).map(|t| t.file.as_str()),
            Some("3.mp3")
        );
        assert_eq!(
            playlist
                .next_after(Some("unknown.mp3"))
                .map(|t| t.file.as_str()),
            Some("1.mp3")
        );
        assert_eq!(
            playlist
                .previous_before(Some("unknown.mp3"))
                .map(|t| t.file.as_str()),
            Some("3.mp3")
        );
    }

    #[test]
    fn navigation_on_an_empty_playlist_is_inert() {
        let playlist = playlist(&[]);
        assert!(playlist.next_after(None).is_none());
        assert!(playlist.previous_before(None).is_none());
        assert!(playlist.next_after(Some("1.mp3")).is_none());
    }

    #[test]
    fn completion_walk_advances_then_parks_on_the_last_track() {
        let playlist = playlist(&["1.mp3", "2.mp3", "3.mp3"]);
        let mut current = playlist.first().cloned();

        for expected in ["2.mp3", "3.mp3"] {
            let reference = current.as_ref().map(|track| track.file.clone());
            current = playlist.next_after(reference.as_deref()).cloned();
            assert_eq!(current.as_ref().map(|t| t.file.as_str()), Some(expected));
        }

        let reference = current.as_ref().map(|track| track.file.clone());
        assert!(playlist.next_after(reference.as_deref()).is_none());
        assert_eq!(current.map(|t| t.file), Some("3.mp3".to_string()));
    }

    #[test]
    fn manifest_parses_songs_in_order() {
        let manifest: PlaylistManifest = serde_json::from_str(
            r#"{"title": "Road Trip", "description": "Windows down", "songs": ["a.mp3", "b.mp3"]}"#,
        )
        .unwrap();
        assert_eq!(manifest.title, "Road Trip");
        assert_eq!(manifest.description, "Windows down");
        assert_eq!(manifest.songs, vec!["a.mp3", "b.mp3"]);
    }

    #[test]
    fn manifest_tolerates_missing_or_malformed_songs() {
        let missing: PlaylistManifest = serde_json::from_str(r#"{"title": "T"}"#).unwrap();
        assert!(missing.songs.is_empty());

        let wrong_type: PlaylistManifest =
            serde_json::from_str(r#"{"songs": "not an array"}"#).unwrap();
        assert!(wrong_type.songs.is_empty());

        let mixed: PlaylistManifest = serde_json::from_str(r#"{"songs": [1, 2]}"#).unwrap();
        assert!(mixed.songs.is_empty());

        assert!(serde_json::from_str::<PlaylistManifest>("{not json").is_err());
    }

    #[test]
    fn playlist_from_manifest_keeps_folder_and_order() {
        let manifest: PlaylistManifest =
            serde_json::from_str(r#"{"songs": ["x.mp3", "y.mp3"]}"#).unwrap();
        let playlist = Playlist::from_manifest("songs/mix", &manifest);
        assert_eq!(playlist.folder, "songs/mix");
        assert_eq!(playlist.tracks.len(), 2);
        assert_eq!(playlist.first().map(|t| t.file.as_str()), Some("x.mp3"));
    }

    #[test]
    fn track_urls_join_with_a_single_slash() {
        let track = Track::new("a.mp3");
        assert_eq!(track.resolve_url("songs/mix"), "songs/mix/a.mp3");
        assert_eq!(track.resolve_url("songs/mix/"), "songs/mix/a.mp3");
        assert_eq!(join_url("songs", ""), "songs/");
    }

    #[test]
    fn seek_position_maps_the_fraction_onto_the_duration() {
        assert_eq!(seek_position(200.0, 0.25), 50.0);
        assert_eq!(seek_position(200.0, 1.5), 200.0);
        assert_eq!(seek_position(200.0, -0.5), 0.0);
        assert_eq!(seek_position(0.0, 0.5), 0.0);
    }
}
