//! Audio playback state and the controller that drives the browser's media
//! element. The element is created once, lives outside the component tree,
//! and is only ever touched from here and from [`seek_to`]/[`toggle_playback`].

use dioxus::prelude::*;

use crate::api::models::Track;

#[cfg(target_arch = "wasm32")]
use crate::api::models::Playlist;
#[cfg(target_arch = "wasm32")]
use crate::diagnostics::log_info;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;
#[cfg(target_arch = "wasm32")]
use web_sys::{window, HtmlAudioElement};

/// How often the poll loop samples the media element.
#[cfg(target_arch = "wasm32")]
const POLL_INTERVAL_MS: u32 = 200;

/// Playback clock state shared with the player bar.
#[derive(Clone)]
pub struct AudioState {
    pub current_time: Signal<f64>,
    pub duration: Signal<f64>,
}

impl Default for AudioState {
    fn default() -> Self {
        Self {
            current_time: Signal::new(0.0),
            duration: Signal::new(0.0),
        }
    }
}

/// Wrapper so the catalog-loading flag and the playing flag can both live
/// in context without their `Signal<bool>` types colliding.
#[derive(Clone, Copy)]
pub struct CatalogLoadingSignal(pub Signal<bool>);

/// Initialize the global audio element once.
#[cfg(target_arch = "wasm32")]
pub fn get_or_create_audio_element() -> Option<HtmlAudioElement> {
    let document = window()?.document()?;

    if let Some(existing) = document.get_element_by_id("playshelf-audio") {
        return existing.dyn_into::<HtmlAudioElement>().ok();
    }

    let audio: HtmlAudioElement = document.create_element("audio").ok()?.dyn_into().ok()?;
    audio.set_id("playshelf-audio");
    audio.set_attribute("preload", "metadata").ok()?;
    document.body()?.append_child(&audio).ok()?;

    Some(audio)
}

#[cfg(not(target_arch = "wasm32"))]
#[allow(dead_code)]
pub fn get_or_create_audio_element() -> Option<()> {
    None
}

/// Start playback, swallowing the returned promise. Autoplay refusals
/// surface as a rejected promise; playback then simply stays paused and the
/// poll loop re-syncs the playing flag.
#[cfg(target_arch = "wasm32")]
fn web_try_play(audio: &HtmlAudioElement) {
    if let Ok(promise) = audio.play() {
        spawn(async move {
            let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
        });
    }
}

/// Seek to a specific position in the current track.
#[cfg(target_arch = "wasm32")]
pub fn seek_to(position: f64) {
    if let Some(audio) = get_or_create_audio_element() {
        audio.set_current_time(position);
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn seek_to(_position: f64) {}

/// Resume if the element is paused, pause otherwise, mirroring the result
/// into the shared playing flag.
#[cfg(target_arch = "wasm32")]
pub fn toggle_playback(mut is_playing: Signal<bool>) {
    if let Some(audio) = get_or_create_audio_element() {
        if audio.paused() {
            web_try_play(&audio);
            is_playing.set(true);
        } else {
            let _ = audio.pause();
            is_playing.set(false);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn toggle_playback(mut is_playing: Signal<bool>) {
    let playing = *is_playing.peek();
    is_playing.set(!playing);
}

/// Stage `track` as the current entry. With `autoplay` it starts right
/// away, otherwise it is shown paused. Passing no track (or one with an
/// empty filename) changes nothing.
pub fn play_track(
    track: Option<Track>,
    mut now_playing: Signal<Option<Track>>,
    mut is_playing: Signal<bool>,
    autoplay: bool,
) {
    let Some(track) = track else { return };
    if track.file.is_empty() {
        return;
    }
    now_playing.set(Some(track));
    is_playing.set(autoplay);
}

/// Applies signal changes to the audio element and polls it for clock
/// updates and track completion.
#[cfg(target_arch = "wasm32")]
#[component]
pub fn AudioController() -> Element {
    let playlist = use_context::<Signal<Playlist>>();
    let now_playing = use_context::<Signal<Option<Track>>>();
    let is_playing = use_context::<Signal<bool>>();
    let audio_state = use_context::<Signal<AudioState>>();

    let last_src = use_signal(|| None::<String>);

    // Track changes: load the new source, reset the clock, and start or
    // hold playback depending on the playing flag.
    {
        let playlist = playlist.clone();
        let now_playing = now_playing.clone();
        let mut is_playing = is_playing.clone();
        let audio_state = audio_state.clone();
        let mut last_src = last_src.clone();
        use_effect(move || {
            let track = now_playing();

            let Some(track) = track else {
                if let Some(audio) = get_or_create_audio_element() {
                    let _ = audio.pause();
                    audio.set_src("");
                    let _ = audio.remove_attribute("src");
                }
                last_src.set(None);
                if *is_playing.peek() {
                    is_playing.set(false);
                }
                return;
            };

            let url = track.resolve_url(&playlist.peek().folder);
            if Some(url.clone()) != *last_src.peek() {
                last_src.set(Some(url.clone()));
                if let Some(audio) = get_or_create_audio_element() {
                    audio.set_src(&url);

                    let mut current_time = audio_state.peek().current_time;
                    let mut duration = audio_state.peek().duration;
                    current_time.set(0.0);
                    duration.set(0.0);

                    if *is_playing.peek() {
                        web_try_play(&audio);
                    } else {
                        let _ = audio.pause();
                    }
                }
            }
        });
    }

    // Playing-flag changes: align the element with the transport buttons.
    {
        let mut is_playing = is_playing.clone();
        let now_playing = now_playing.clone();
        use_effect(move || {
            let playing = is_playing();
            if let Some(audio) = get_or_create_audio_element() {
                if playing {
                    if now_playing.peek().is_none() {
                        is_playing.set(false);
                    } else if audio.paused() {
                        web_try_play(&audio);
                    }
                } else if !audio.paused() {
                    let _ = audio.pause();
                }
            }
        });
    }

    // Poll the element for clock updates, external pause/resume (browser
    // media controls), and track completion.
    {
        let playlist = playlist.clone();
        let mut now_playing = now_playing.clone();
        let mut is_playing = is_playing.clone();
        let audio_state = audio_state.clone();
        use_effect(move || {
            let mut current_time = audio_state.peek().current_time;
            let mut duration = audio_state.peek().duration;

            spawn(async move {
                let mut ended_for_track: Option<String> = None;
                let mut paused_streak: u8 = 0;
                let mut playing_streak: u8 = 0;

                loop {
                    gloo_timers::future::TimeoutFuture::new(POLL_INTERVAL_MS).await;

                    let Some(audio) = get_or_create_audio_element() else {
                        continue;
                    };

                    let time = audio.current_time();
                    if (time - *current_time.peek()).abs() >= 0.2 {
                        current_time.set(time);
                    }

                    let reported = audio.duration();
                    let reported = if reported.is_nan() { 0.0 } else { reported };
                    if (reported - *duration.peek()).abs() > 0.5 {
                        duration.set(reported);
                    }

                    let paused = audio.paused();
                    let current = now_playing.peek().clone();

                    if current.is_some() {
                        // Keep the playing flag honest when playback is
                        // controlled outside our buttons (hardware keys,
                        // browser media controls).
                        if paused {
                            paused_streak = paused_streak.saturating_add(1);
                            playing_streak = 0;
                        } else {
                            playing_streak = playing_streak.saturating_add(1);
                            paused_streak = 0;
                        }

                        if *is_playing.peek() && paused_streak >= 2 && !audio.ended() {
                            is_playing.set(false);
                        } else if !*is_playing.peek() && playing_streak >= 2 {
                            is_playing.set(true);
                        }
                    } else {
                        paused_streak = 0;
                        playing_streak = 0;
                        if *is_playing.peek() {
                            is_playing.set(false);
                        }
                    }

                    if audio.ended() {
                        let current_name = current.as_ref().map(|track| track.canonical_name());
                        if ended_for_track == current_name {
                            continue;
                        }
                        ended_for_track = current_name;

                        let playlist_snapshot = playlist.peek().clone();
                        let reference = current.as_ref().map(|track| track.file.clone());
                        match playlist_snapshot.next_after(reference.as_deref()) {
                            Some(next) => {
                                let next = next.clone();
                                now_playing.set(Some(next));
                                is_playing.set(true);
                            }
                            None => {
                                if !playlist_snapshot.is_empty() {
                                    log_info("playlist finished, staying on the last track");
                                }
                                is_playing.set(false);
                            }
                        }
                    } else {
                        ended_for_track = None;
                    }
                }
            });
        });
    }

    rsx! {}
}

/// Native builds have no playback backend; the controller renders nothing.
#[cfg(not(target_arch = "wasm32"))]
#[component]
pub fn AudioController() -> Element {
    rsx! {}
}
