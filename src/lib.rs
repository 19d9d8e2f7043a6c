//! Simulation core for the arcade chase game embedded in a scrolling page.

pub mod animation;
pub mod asset;
pub mod audio;
pub mod collision;
pub mod config;
pub mod constants;
pub mod direction;
pub mod effects;
pub mod error;
pub mod events;
pub mod formatter;
pub mod game;
pub mod ghost;
pub mod hud;
pub mod input;
pub mod item;
pub mod layout;
pub mod logging;
pub mod player;
pub mod profiling;
pub mod scores;
pub mod section;
pub mod timer;

pub use game::Session;
