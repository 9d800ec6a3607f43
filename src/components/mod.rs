//! The components module contains all shared components for our app.

mod app;
mod audio_manager;
mod catalog_grid;
mod icons;
mod player;
mod track_list;

pub use app::*;
pub use audio_manager::*;
pub use catalog_grid::*;
pub use icons::*;
pub use player::*;
pub use track_list::*;
