//! Discovery and loading of playlist folders served as a static file tree.
//!
//! The songs root is expected to answer a plain directory-listing page; each
//! subfolder holds an `info.json` manifest, a cover image and the audio
//! files themselves.

use futures_util::future::join_all;
use once_cell::sync::Lazy;

use crate::api::models::{decode_component, join_url, CatalogEntry, Playlist, PlaylistManifest};
use crate::diagnostics::{log_error, log_warn};

/// Folder under the site root that holds one subfolder per playlist.
pub const SONGS_ROOT: &str = "songs";
/// Manifest filename looked up inside every playlist folder.
pub const MANIFEST_FILE: &str = "info.json";
/// Cover image convention inside every playlist folder.
pub const COVER_FILE: &str = "cover.jpg";

/// Listing anchors ending in one of these are audio files, not folders.
const AUDIO_EXTENSIONS: [&str; 5] = [".mp3", ".m4a", ".ogg", ".flac", ".wav"];

static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

/// Fetch-side companion of the widget: lists playlist folders under a root
/// path and loads their manifests.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    root: String,
}

impl CatalogClient {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: resolve_root(&root.into(), document_base_uri().as_deref()),
        }
    }

    /// `<root>/<folder>`, the path a playlist's tracks resolve against.
    pub fn folder_path(&self, folder: &str) -> String {
        join_url(&self.root, folder)
    }

    pub fn cover_url(&self, folder: &str) -> String {
        join_url(&self.folder_path(folder), COVER_FILE)
    }

    async fn fetch_text(&self, url: &str) -> Result<String, String> {
        let response = HTTP_CLIENT
            .get(url)
            .send()
            .await
            .map_err(|err| format!("request to {url} failed: {err}"))?;
        if !response.status().is_success() {
            return Err(format!("request to {url} returned {}", response.status()));
        }
        response
            .text()
            .await
            .map_err(|err| format!("reading {url} failed: {err}"))
    }

    /// The songs root's directory-listing page, as served HTML.
    pub async fn fetch_listing(&self) -> Result<String, String> {
        self.fetch_text(&join_url(&self.root, "")).await
    }

    /// Folder names referenced by the root listing, in listing order.
    pub async fn discover_folders(&self) -> Result<Vec<String>, String> {
        let listing = self.fetch_listing().await?;
        Ok(playlist_folders(&listing))
    }

    /// `<root>/<folder>/info.json`, parsed. An unreachable or malformed
    /// manifest makes the folder unavailable.
    pub async fn fetch_manifest(&self, folder: &str) -> Result<PlaylistManifest, String> {
        let url = join_url(&self.folder_path(folder), MANIFEST_FILE);
        let body = self.fetch_text(&url).await?;
        serde_json::from_str(&body).map_err(|err| format!("manifest {url} is not valid JSON: {err}"))
    }

    /// Discover folders and fetch every manifest concurrently. Folders whose
    /// manifest cannot be read (including stray listing anchors like the
    /// parent-directory link) are logged and skipped; a failed listing
    /// yields an empty catalog.
    pub async fn load_catalog(&self) -> Vec<CatalogEntry> {
        let folders = match self.discover_folders().await {
            Ok(folders) => folders,
            Err(err) => {
                log_error(&format!("catalog discovery failed: {err}"));
                return Vec::new();
            }
        };

        let fetches = folders.iter().map(|folder| self.fetch_manifest(folder));
        let manifests = join_all(fetches).await;

        folders
            .into_iter()
            .zip(manifests)
            .filter_map(|(folder, manifest)| match manifest {
                Ok(manifest) => Some(CatalogEntry {
                    cover: self.cover_url(&folder),
                    title: manifest.title,
                    description: manifest.description,
                    folder,
                }),
                Err(err) => {
                    log_warn(&format!("skipping playlist folder {folder}: {err}"));
                    None
                }
            })
            .collect()
    }

    /// Load one folder's playlist. A fetch or parse failure logs and
    /// degrades to an empty playlist with the folder path still updated.
    pub async fn load_playlist(&self, folder: &str) -> Playlist {
        let path = self.folder_path(folder);
        match self.fetch_manifest(folder).await {
            Ok(manifest) => Playlist::from_manifest(path, &manifest),
            Err(err) => {
                log_error(&format!("loading songs from {path} failed: {err}"));
                Playlist::empty(path)
            }
        }
    }
}

/// reqwest takes absolute request URLs only; a bare root like `songs` is
/// resolved against the document base at client construction.
fn resolve_root(root: &str, base: Option<&str>) -> String {
    if reqwest::Url::parse(root).is_ok() {
        return root.trim_end_matches('/').to_string();
    }
    let resolved = base
        .and_then(|base| reqwest::Url::parse(base).ok())
        .and_then(|base| base.join(root).ok());
    match resolved {
        Some(url) => url.as_str().trim_end_matches('/').to_string(),
        None => root.trim_end_matches('/').to_string(),
    }
}

#[cfg(target_arch = "wasm32")]
fn document_base_uri() -> Option<String> {
    web_sys::window()?.document()?.base_uri().ok()?
}

#[cfg(not(target_arch = "wasm32"))]
fn document_base_uri() -> Option<String> {
    None
}

/// Anchor targets of a directory-listing page, in document order.
///
/// Listing pages from static file servers are simple enough that a full
/// HTML parser is not needed: every link of interest is an `<a>` tag with a
/// quoted `href`.
pub fn anchor_hrefs(html: &str) -> Vec<String> {
    let lower = html.to_ascii_lowercase();
    let mut hrefs = Vec::new();
    let mut cursor = 0;

    while let Some(found) = lower[cursor..].find("<a") {
        let after = cursor + found + 2;
        // `<a>` or `<a ...`, not `<abbr>` and friends.
        let boundary = lower.as_bytes().get(after);
        if !matches!(boundary, Some(b) if b.is_ascii_whitespace() || *b == b'>') {
            cursor = after;
            continue;
        }
        let Some(close) = lower[after..].find('>') else {
            break;
        };
        if let Some(href) = attribute_value(&html[after..after + close], &lower[after..after + close])
        {
            hrefs.push(href);
        }
        cursor = after + close + 1;
    }
    hrefs
}

/// `href="..."` value inside one tag's attribute text. Single-quoted and
/// unquoted values are accepted; lookalike attribute names (`data-href`,
/// `hreflang`) are not. A match counts only when it starts the attribute
/// name and an `=` follows.
fn attribute_value(tag: &str, tag_lower: &str) -> Option<String> {
    let mut from = 0;
    while let Some(found) = tag_lower[from..].find("href") {
        let at = from + found;
        from = at + 4;
        if at == 0 || !tag.as_bytes()[at - 1].is_ascii_whitespace() {
            continue;
        }
        let rest = tag[at + 4..].trim_start();
        let Some(rest) = rest.strip_prefix('=') else {
            continue;
        };
        let rest = rest.trim_start();
        let quote = rest.chars().next()?;
        return if quote == '"' || quote == '\'' {
            let inner = &rest[1..];
            let end = inner.find(quote)?;
            Some(inner[..end].to_string())
        } else {
            let end = rest
                .find(|c: char| c.is_ascii_whitespace())
                .unwrap_or(rest.len());
            Some(rest[..end].to_string())
        };
    }
    None
}

/// Whether an anchor target names a file that lives inside a playlist
/// folder (audio, manifest, cover) rather than a folder itself.
pub fn is_playlist_file(href: &str) -> bool {
    let lowered = href.to_ascii_lowercase();
    AUDIO_EXTENSIONS.iter().any(|ext| lowered.ends_with(ext))
        || lowered.contains(".json")
        || lowered.contains(".jpg")
}

/// Folder name carried by a listing anchor: the last non-empty path
/// segment, percent-decoded, with backslashes normalized. Works for both
/// relative (`My%20Mix/`) and absolute (`http://host/songs/lofi/`) targets.
pub fn folder_from_href(href: &str) -> Option<String> {
    if is_playlist_file(href) {
        return None;
    }
    let path = href.trim_end_matches('/');
    let segment = path.rsplit('/').next().unwrap_or("");
    if segment.is_empty() {
        return None;
    }
    let name = decode_component(segment).replace('\\', "/");
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// All playlist folder names referenced by a listing document.
pub fn playlist_folders(listing: &str) -> Vec<String> {
    anchor_hrefs(listing)
        .iter()
        .filter_map(|href| folder_from_href(href))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
        <html><head><title>Index of /songs/</title></head><body>
        <h1>Index of /songs/</h1><hr>
        <a href="../">../</a>
        <a href="My%20Mix/">My%20Mix/</a>
        <A HREF='road trip/'>road trip/</A>
        <a href="http://localhost:8000/songs/lofi/">lofi/</a>
        <a href="cover.jpg">cover.jpg</a>
        <a href="info.json">info.json</a>
        <a href="Some%20Song.mp3">Some%20Song.mp3</a>
        </body></html>"#;

    #[test]
    fn listing_anchors_come_back_in_document_order() {
        let hrefs = anchor_hrefs(LISTING);
        assert_eq!(hrefs.len(), 7);
        assert_eq!(hrefs[0], "../");
        assert_eq!(hrefs[1], "My%20Mix/");
        assert_eq!(hrefs[2], "road trip/");
    }

    #[test]
    fn anchor_scan_skips_other_tags_and_unclosed_markup() {
        assert!(anchor_hrefs("<abbr href=\"x\">nope</abbr>").is_empty());
        assert!(anchor_hrefs("<a href=\"x").is_empty());
        assert_eq!(anchor_hrefs("<a\nhref=unquoted/ >x</a>"), vec!["unquoted/"]);
    }

    #[test]
    fn href_lookalike_attributes_are_passed_over() {
        assert_eq!(
            anchor_hrefs(r#"<a data-href="decoy/" href="mix/">m</a>"#),
            vec!["mix/"]
        );
        assert_eq!(
            anchor_hrefs(r#"<a hreflang="en" href="road%20trip/">r</a>"#),
            vec!["road%20trip/"]
        );
    }

    #[test]
    fn audio_manifest_and_cover_links_are_not_folders() {
        assert!(folder_from_href("track.mp3").is_none());
        assert!(folder_from_href("loop.WAV").is_none());
        assert!(folder_from_href("songs/mix/info.json").is_none());
        assert!(folder_from_href("songs/mix/cover.jpg").is_none());
    }

    #[test]
    fn folder_names_are_decoded_last_segments() {
        assert_eq!(folder_from_href("My%20Mix/").as_deref(), Some("My Mix"));
        assert_eq!(
            folder_from_href("http://localhost:8000/songs/lofi/").as_deref(),
            Some("lofi")
        );
        assert_eq!(folder_from_href("plain").as_deref(), Some("plain"));
        assert_eq!(
            folder_from_href("My%5CStuff/").as_deref(),
            Some("My/Stuff")
        );
        assert!(folder_from_href("/").is_none());
        assert!(folder_from_href("").is_none());
    }

    #[test]
    fn discovered_folders_keep_listing_order() {
        let folders = playlist_folders(LISTING);
        assert_eq!(folders, vec!["..", "My Mix", "road trip", "lofi"]);
    }

    #[test]
    fn client_builds_rooted_paths() {
        let client = CatalogClient::new(SONGS_ROOT);
        assert_eq!(client.folder_path("My Mix"), "songs/My Mix");
        assert_eq!(client.cover_url("My Mix"), "songs/My Mix/cover.jpg");
    }

    #[test]
    fn bare_root_resolves_against_the_document_base() {
        assert!(reqwest::Url::parse(SONGS_ROOT).is_err());

        let resolved = resolve_root(SONGS_ROOT, Some("http://localhost:8000/index.html"));
        assert_eq!(resolved, "http://localhost:8000/songs");
        assert!(reqwest::Url::parse(&resolved).is_ok());

        assert_eq!(
            resolve_root(SONGS_ROOT, Some("http://localhost:8000/app/")),
            "http://localhost:8000/app/songs"
        );
    }

    #[test]
    fn absolute_and_baseless_roots_pass_through() {
        assert_eq!(
            resolve_root("https://media.example/songs/", Some("http://localhost:8000/")),
            "https://media.example/songs"
        );
        assert_eq!(resolve_root(SONGS_ROOT, None), SONGS_ROOT);
    }

    #[test]
    fn client_paths_parse_as_request_urls() {
        let client = CatalogClient::new("http://localhost:8000/songs/");
        assert_eq!(
            client.folder_path("My Mix"),
            "http://localhost:8000/songs/My Mix"
        );
        assert!(reqwest::Url::parse(&client.cover_url("lofi")).is_ok());
    }
}
