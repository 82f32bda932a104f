//! Flappy - terminal arcade game library
//!
//! Exposes the game-loop engine (difficulty policy, simulation, render and
//! audio) for the binary and for testing.

pub mod app;
pub mod audio;
pub mod build_info;
pub mod color;
pub mod constants;
pub mod game;
pub mod input;
pub mod logging;
pub mod render;
pub mod settings;
pub mod ui;
