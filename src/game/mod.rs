//! Flappy engine core.
//!
//! A real-time arcade game where the player keeps a bird airborne through
//! scrolling pipe gaps. Difficulty sets scroll speed, pipe width and spawn
//! cadence; the score tightens the gap.

pub mod config;
pub mod events;
pub mod logic;
pub mod types;

pub use config::*;
pub use events::*;
pub use logic::*;
pub use types::*;
