use crate::api::catalog::{CatalogClient, SONGS_ROOT};
use crate::api::models::{CatalogEntry, Playlist, Track};
use crate::components::{
    play_track, AudioController, AudioState, CatalogGrid, CatalogLoadingSignal, Player, TrackList,
};
use dioxus::prelude::*;

/// Root layout. Owns every shared signal, runs the startup catalog
/// discovery, and mounts the widget's sections.
#[component]
pub fn AppShell() -> Element {
    let mut catalog = use_signal(Vec::<CatalogEntry>::new);
    let mut catalog_loading = use_signal(|| true);
    let mut playlist = use_signal(Playlist::default);
    let now_playing = use_signal(|| None::<Track>);
    let is_playing = use_signal(|| false);
    let audio_state = use_signal(AudioState::default);

    use_context_provider(|| catalog);
    use_context_provider(|| CatalogLoadingSignal(catalog_loading));
    use_context_provider(|| playlist);
    use_context_provider(|| now_playing);
    use_context_provider(|| is_playing);
    use_context_provider(|| audio_state);

    // Discover playlist folders once at startup, then preload the first
    // folder with its opening track staged paused.
    use_effect(move || {
        spawn(async move {
            let client = CatalogClient::new(SONGS_ROOT);
            let entries = client.load_catalog().await;
            let default_folder = entries.first().map(|entry| entry.folder.clone());
            catalog.set(entries);
            catalog_loading.set(false);

            if let Some(folder) = default_folder {
                let loaded = client.load_playlist(&folder).await;
                let first = loaded.first().cloned();
                playlist.set(loaded);
                play_track(first, now_playing, is_playing, false);
            }
        });
    });

    let on_select = move |entry: CatalogEntry| {
        spawn(async move {
            let client = CatalogClient::new(SONGS_ROOT);
            let loaded = client.load_playlist(&entry.folder).await;
            let first = loaded.first().cloned();
            playlist.set(loaded);
            play_track(first, now_playing, is_playing, false);
        });
    };

    rsx! {
        div { class: "app-shell",
            header { class: "app-header",
                span { class: "app-brand", "Playshelf" }
            }

            main { class: "app-main",
                CatalogGrid { on_select: on_select }
                TrackList {}
            }

            // Fixed bottom player
            Player {}
        }

        // Audio controller - manages playback separately from UI
        AudioController {}
    }
}
