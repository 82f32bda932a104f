//! Events produced by the simulation.
//!
//! The simulation never touches audio, persistence or UI state. The host maps
//! these to sound cues, floating score bubbles and settings writes.

/// A single thing that happened during `reset`, `flap`, `step` or `end_game`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// A new session entered the Running state.
    Started,
    /// The bird received its lift impulse.
    Flapped,
    /// The bird cleared a pipe. `x`/`y` locate the score bubble.
    Scored { x: f64, y: f64, score: u32 },
    /// The session ended. `new_best` is set when `best` was raised and needs
    /// to be persisted.
    Crashed {
        x: f64,
        y: f64,
        score: u32,
        best: u32,
        new_best: bool,
    },
}
