use dioxus::prelude::*;

use crate::api::models::CatalogEntry;
use crate::components::{CatalogLoadingSignal, Icon};

/// Grid of discovered playlist folders. Clicking a card hands the entry to
/// the shell, which loads that folder's playlist.
#[component]
pub fn CatalogGrid(on_select: EventHandler<CatalogEntry>) -> Element {
    let catalog = use_context::<Signal<Vec<CatalogEntry>>>();
    let loading = use_context::<CatalogLoadingSignal>().0;

    let entries = catalog();

    rsx! {
        section { class: "catalog",
            h2 { class: "section-title", "Playlists" }

            {match (loading(), entries.is_empty()) {
                (true, _) => rsx! {
                    div { class: "catalog-placeholder",
                        Icon { name: "loader".to_string(), class: "icon-lg".to_string() }
                    }
                },
                (false, true) => rsx! {
                    div { class: "catalog-placeholder",
                        Icon { name: "folder".to_string(), class: "icon-lg".to_string() }
                        p { "No playlists found" }
                    }
                },
                (false, false) => rsx! {
                    div { class: "card-grid",
                        for entry in entries {
                            CatalogCard {
                                entry: entry.clone(),
                                onclick: move |_| on_select.call(entry.clone()),
                            }
                        }
                    }
                },
            }}
        }
    }
}

#[component]
fn CatalogCard(entry: CatalogEntry, onclick: EventHandler<MouseEvent>) -> Element {
    let heading = if entry.title.is_empty() {
        entry.folder.clone()
    } else {
        entry.title.clone()
    };

    rsx! {
        button {
            class: "card",
            "data-folder": "{entry.folder}",
            onclick: move |e| onclick.call(e),
            div { class: "card-cover",
                img {
                    class: "card-cover-img",
                    src: "{entry.cover}",
                    alt: "{heading}",
                    loading: "lazy",
                }
                div { class: "card-play-badge",
                    Icon { name: "play".to_string(), class: "icon-sm".to_string() }
                }
            }
            p { class: "card-title", "{heading}" }
            p { class: "card-description", "{entry.description}" }
        }
    }
}
