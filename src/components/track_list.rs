use dioxus::prelude::*;

use crate::api::models::{Playlist, Track};
use crate::components::{play_track, Icon};

/// Rows for the active playlist. Clicking a row starts that track.
#[component]
pub fn TrackList() -> Element {
    let playlist = use_context::<Signal<Playlist>>();
    let now_playing = use_context::<Signal<Option<Track>>>();
    let is_playing = use_context::<Signal<bool>>();

    let playlist_snapshot = playlist();
    let current_name = now_playing().map(|track| track.canonical_name());

    rsx! {
        section { class: "songlist",
            h2 { class: "section-title", "Songs" }

            if playlist_snapshot.tracks.is_empty() {
                div { class: "songlist-placeholder",
                    Icon { name: "music".to_string(), class: "icon-lg".to_string() }
                    p { "Pick a playlist to see its songs" }
                }
            } else {
                ul { class: "songlist-rows",
                    for track in playlist_snapshot.tracks {
                        TrackRow {
                            track: track.clone(),
                            active: Some(track.canonical_name()) == current_name,
                            onclick: move |_| {
                                play_track(Some(track.clone()), now_playing, is_playing, true);
                            },
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn TrackRow(track: Track, active: bool, onclick: EventHandler<MouseEvent>) -> Element {
    let name = track.display_name();

    rsx! {
        li {
            button {
                class: if active { "song-row song-row-active" } else { "song-row" },
                onclick: move |e| onclick.call(e),
                Icon { name: "music".to_string(), class: "icon-sm song-row-glyph".to_string() }
                div { class: "song-row-info",
                    span { class: "song-row-name", "{name}" }
                    span { class: "song-row-artist", "Unknown artist" }
                }
                span { class: "song-row-play",
                    Icon { name: "play".to_string(), class: "icon-sm".to_string() }
                }
            }
        }
    }
}
