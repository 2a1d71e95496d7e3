//! Match statistics for League of Legends games exported as JSON.
//!
//! `data` loads and validates match files, `analysis` turns them into
//! per-player, per-team and per-game statistics, and `display` renders
//! those statistics through a [`display::Presenter`].

pub mod analysis;
pub mod config;
pub mod data;
pub mod display;
pub mod error;
pub mod logging;
