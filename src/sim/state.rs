//! Game session and core simulation types
//!
//! Everything that must survive a snapshot lives here. The session owns the
//! entity registry, the player and the timers; nothing else mutates them.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{EntityId, EntityKind, EntityRegistry, Token};
use super::grid::{Cell, Grid};
use super::scheduler::{Job, Scheduler, TimerId};
use crate::config::{ConfigError, GameConfig};
use crate::render::Screen;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Start screen shown, waiting for Start
    StartScreen,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Goal reached, win screen shown until Continue
    Crossed,
}

/// Why a life was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    /// Shared a cell with a car
    HitByCar,
    /// Stepped into water with no log
    Drowned,
    /// The log being ridden left the grid
    SweptAway,
}

/// The frog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub cell: Cell,
    /// Log currently carrying the player
    pub riding: Option<EntityId>,
    pub lives: u8,
    pub score: u32,
}

impl Player {
    pub fn new(start: Cell, lives: u8) -> Self {
        Self {
            cell: start,
            riding: None,
            lives,
            score: 0,
        }
    }

    pub fn on_platform(&self) -> bool {
        self.riding.is_some()
    }
}

/// Things that happened during a tick or command, for the view to replay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    EntitySpawned {
        id: EntityId,
        token: Token,
        cell: Cell,
    },
    EntityMoved {
        id: EntityId,
        token: Token,
        from: Cell,
        to: Cell,
    },
    EntityDespawned {
        id: EntityId,
        token: Token,
        cell: Cell,
    },
    /// A replacement spawn was queued
    SpawnScheduled { kind: EntityKind, delay_ms: u64 },
    PlayerMoved {
        from: Cell,
        to: Cell,
        /// Moved by a log rather than by input
        carried: bool,
    },
    Boarded { log: EntityId },
    LifeLost { cause: DeathCause, lives: u8 },
    PlayerRespawned { from: Cell, to: Cell },
    ScoreChanged { score: u32 },
    LivesChanged { lives: u8 },
    GoalReached { score: u32, level: u32 },
    GameOver { final_score: u32 },
    ScreenChanged { screen: Screen },
}

/// Complete game session (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    pub config: GameConfig,
    pub grid: Grid,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub player: Player,
    pub registry: EntityRegistry,
    pub scheduler: Scheduler,
    /// Completed crossings this session
    pub level: u32,
    /// Step timers, armed while a round is running
    pub car_timer: Option<TimerId>,
    pub log_timer: Option<TimerId>,
    /// Pending view updates (drained by the front-end)
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameSession {
    /// Create a new session with the given config and seed
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, seed))
    }

    /// Session on the default board
    pub fn with_seed(seed: u64) -> Self {
        Self::build(GameConfig::default(), seed)
    }

    fn build(config: GameConfig, seed: u64) -> Self {
        Self {
            grid: config.grid(),
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::StartScreen,
            player: Player::new(config.start, config.starting_lives),
            registry: EntityRegistry::new(),
            scheduler: Scheduler::new(),
            level: 0,
            car_timer: None,
            log_timer: None,
            events: Vec::new(),
            config,
        }
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn set_screen(&mut self, screen: Screen) {
        self.emit(GameEvent::ScreenChanged { screen });
    }

    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    /// Arm the per-class step timers for the current level
    pub fn arm_step_timers(&mut self) {
        let car_period = self.config.car_period_for_level(self.level);
        match self.car_timer {
            Some(id) => {
                self.scheduler.set_period(id, car_period);
            }
            None => {
                self.car_timer = Some(self.scheduler.every(car_period, Job::Advance(EntityKind::Car)));
            }
        }
        let log_period = self.config.log_period_ms;
        if self.log_timer.is_none() {
            self.log_timer = Some(self.scheduler.every(log_period, Job::Advance(EntityKind::Log)));
        }
        // Entities already on the board move at the new lane speed too
        for entity in self.registry.iter_mut() {
            entity.period_ms = match entity.kind {
                EntityKind::Car => car_period,
                EntityKind::Log => log_period,
            };
        }
    }

    pub fn period_ms(&self, kind: EntityKind) -> u64 {
        match kind {
            EntityKind::Car => self.config.car_period_for_level(self.level),
            EntityKind::Log => self.config.log_period_ms,
        }
    }

    /// Send the player back to the start cell
    pub fn respawn_player(&mut self) {
        let from = self.player.cell;
        let to = self.config.start;
        self.player.cell = to;
        self.player.riding = None;
        self.emit(GameEvent::PlayerRespawned { from, to });
    }

    /// Tear down the round: clear entities and timers, restore lives and
    /// score, return to the start screen.
    pub fn reset(&mut self) {
        for entity in self.registry.clear() {
            self.events.push(GameEvent::EntityDespawned {
                id: entity.id,
                token: entity.token,
                cell: entity.cell,
            });
        }
        self.scheduler.clear();
        self.car_timer = None;
        self.log_timer = None;
        self.level = 0;

        self.respawn_player();
        self.player.lives = self.config.starting_lives;
        self.player.score = 0;
        self.emit(GameEvent::LivesChanged {
            lives: self.player.lives,
        });
        self.emit(GameEvent::ScoreChanged { score: 0 });

        self.phase = GamePhase::StartScreen;
        self.set_screen(Screen::Start);
        log::info!("Session reset (seed {})", self.seed);
    }
}
