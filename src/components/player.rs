use dioxus::prelude::*;

use crate::api::models::{format_time, seek_position, Playlist, Track};
use crate::components::{play_track, seek_to, toggle_playback, AudioState, Icon};
use crate::diagnostics::log_info;

/// Fixed bottom playback bar: now-playing line, transport buttons, seek bar
/// and the elapsed/total clock.
#[component]
pub fn Player() -> Element {
    let now_playing = use_context::<Signal<Option<Track>>>();
    let audio_state = use_context::<Signal<AudioState>>();

    let current_track = now_playing();

    // Get time from audio state (Signal fields need to be read with ())
    let current_time = (audio_state().current_time)();
    let duration = (audio_state().duration)();

    let on_seek_input = {
        let mut audio_state = audio_state.clone();
        move |e: Event<FormData>| {
            if let Ok(percent) = e.value().parse::<f64>() {
                if duration > 0.0 {
                    let new_time = seek_position(duration, percent.clamp(0.0, 100.0) / 100.0);
                    audio_state.write().current_time.set(new_time);
                    seek_to(new_time);
                }
            }
        }
    };

    let on_seek_commit = {
        let mut audio_state = audio_state.clone();
        move |e: Event<FormData>| {
            if let Ok(percent) = e.value().parse::<f64>() {
                if duration > 0.0 {
                    let new_time = seek_position(duration, percent.clamp(0.0, 100.0) / 100.0);
                    audio_state.write().current_time.set(new_time);
                    seek_to(new_time);
                }
            }
        }
    };

    rsx! {
        footer { class: "player",
            div { class: "player-info",
                div { class: "player-glyph",
                    Icon { name: "music".to_string(), class: "icon-md".to_string() }
                }
                {match &current_track {
                    Some(track) => {
                        let name = track.display_name();
                        rsx! {
                            div { class: "player-titles",
                                p { class: "player-track-name", "{name}" }
                                p { class: "player-track-sub", "Now playing" }
                            }
                        }
                    }
                    None => rsx! {
                        div { class: "player-titles",
                            p { class: "player-track-name player-track-name-idle", "No track playing" }
                            p { class: "player-track-sub", "Pick a playlist to start" }
                        }
                    },
                }}
            }

            div { class: "player-center",
                div { class: "player-controls",
                    PrevButton {}
                    PlayPauseButton {}
                    NextButton {}
                }
                div { class: "player-progress",
                    span { class: "player-time", {format_time(current_time)} }
                    input {
                        id: "seekbar",
                        r#type: "range",
                        min: "0",
                        max: "100",
                        value: if duration > 0.0 { (current_time / duration * 100.0).round() as i32 } else { 0 },
                        class: "seekbar",
                        oninput: on_seek_input,
                        onchange: on_seek_commit,
                    }
                    span { class: "player-time", {format_time(duration)} }
                }
            }
        }
    }
}

#[component]
fn PlayPauseButton() -> Element {
    let now_playing = use_context::<Signal<Option<Track>>>();
    let is_playing = use_context::<Signal<bool>>();

    let has_track = now_playing().is_some();
    let playing = is_playing();

    rsx! {
        button {
            id: "play-pause-btn",
            r#type: "button",
            class: "control-btn control-btn-primary",
            disabled: !has_track,
            aria_label: if playing { "Pause" } else { "Play" },
            onclick: move |_| {
                if now_playing.peek().is_some() {
                    toggle_playback(is_playing);
                }
            },
            if playing {
                Icon { name: "pause".to_string(), class: "icon-md".to_string() }
            } else {
                Icon { name: "play".to_string(), class: "icon-md".to_string() }
            }
        }
    }
}

#[component]
fn PrevButton() -> Element {
    let playlist = use_context::<Signal<Playlist>>();
    let now_playing = use_context::<Signal<Option<Track>>>();
    let is_playing = use_context::<Signal<bool>>();

    rsx! {
        button {
            id: "prev-btn",
            r#type: "button",
            class: "control-btn",
            aria_label: "Previous track",
            onclick: move |_| {
                let playlist_snapshot = playlist.peek().clone();
                let reference = now_playing.peek().as_ref().map(|track| track.file.clone());
                match playlist_snapshot.previous_before(reference.as_deref()) {
                    Some(previous) => {
                        let previous = previous.clone();
                        play_track(Some(previous), now_playing, is_playing, true);
                    }
                    None => {
                        if !playlist_snapshot.is_empty() {
                            log_info("already at the first track");
                        }
                    }
                }
            },
            Icon { name: "prev".to_string(), class: "icon-sm".to_string() }
        }
    }
}

#[component]
fn NextButton() -> Element {
    let playlist = use_context::<Signal<Playlist>>();
    let now_playing = use_context::<Signal<Option<Track>>>();
    let is_playing = use_context::<Signal<bool>>();

    rsx! {
        button {
            id: "next-btn",
            r#type: "button",
            class: "control-btn",
            aria_label: "Next track",
            onclick: move |_| {
                let playlist_snapshot = playlist.peek().clone();
                let reference = now_playing.peek().as_ref().map(|track| track.file.clone());
                match playlist_snapshot.next_after(reference.as_deref()) {
                    Some(next) => {
                        let next = next.clone();
                        play_track(Some(next), now_playing, is_playing, true);
                    }
                    None => {
                        if !playlist_snapshot.is_empty() {
                            log_info("already at the last track");
                        }
                    }
                }
            },
            Icon { name: "next".to_string(), class: "icon-sm".to_string() }
        }
    }
}
