//! Frogger - A grid-based lane-crossing arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (lanes, traffic, collisions, game state)
//! - `render`: Rendering collaborator interface and event projection
//! - `config`: Data-driven game setup and difficulty presets

pub mod config;
pub mod render;
pub mod sim;

pub use config::{ConfigError, Difficulty, GameConfig};
pub use render::{Renderer, Screen};

/// Game configuration constants
pub mod consts {
    /// Default grid size (square board)
    pub const DEFAULT_COLUMNS: i32 = 25;
    pub const DEFAULT_ROWS: i32 = 25;

    /// Where the frog appears at level start and after losing a life
    pub const START_X: i32 = 12;
    pub const START_Y: i32 = 24;

    /// Lives granted to a fresh session
    pub const STARTING_LIVES: u8 = 3;

    /// Fixed simulation step (ms). Timers fire at this granularity.
    pub const SIM_STEP_MS: u64 = 25;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Replacement spawns wait a random delay in this range (ms, inclusive)
    pub const RESPAWN_DELAY_MIN_MS: u64 = 1500;
    pub const RESPAWN_DELAY_MAX_MS: u64 = 3000;

    /// Random lane/heading picks before a spawn attempt is given up
    pub const MAX_SPAWN_ATTEMPTS: u32 = 8;
}
