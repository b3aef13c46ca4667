//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Simulated time only (no wall clock)
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod entity;
pub mod grid;
pub mod player;
pub mod scheduler;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{Resolution, resolve};
pub use entity::{CarStyle, EntityId, EntityKind, EntityRegistry, MovingEntity, Token};
pub use grid::{Cell, Direction, Grid, Heading, LaneKind, SafeZone};
pub use player::{MoveOutcome, move_player};
pub use scheduler::{Job, Scheduler};
pub use spawner::SpawnError;
pub use state::{DeathCause, GameEvent, GamePhase, GameSession, Player};
pub use tick::{Command, apply_command, tick};
