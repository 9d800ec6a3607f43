use dioxus::prelude::*;

mod api;
mod components;
mod diagnostics;

use components::AppShell;

const APP_CSS: Asset = asset!("/assets/styling/app.css");

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Title { "Playshelf" }
        document::Meta { name: "theme-color", content: "#121214" }
        document::Stylesheet { href: APP_CSS }

        AppShell {}
    }
}
