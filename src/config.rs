//! Game configuration and difficulty presets
//!
//! Persisted separately from the session in LocalStorage (web) or read from
//! a JSON file (native demo).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::grid::{Cell, Grid, LaneKind, classic_layout};

/// Difficulty preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "norm" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Milliseconds per cell for cars
    pub fn car_period_ms(&self) -> u64 {
        match self {
            Difficulty::Easy => 400,
            Difficulty::Normal => 250,
            Difficulty::Hard => 150,
        }
    }

    /// Milliseconds per cell for logs (always slower than cars)
    pub fn log_period_ms(&self) -> u64 {
        match self {
            Difficulty::Easy => 700,
            Difficulty::Normal => 500,
            Difficulty::Hard => 400,
        }
    }

    /// Cars on the road when a session starts
    pub fn initial_cars(&self) -> usize {
        match self {
            Difficulty::Easy => 4,
            Difficulty::Normal => 6,
            Difficulty::Hard => 9,
        }
    }
}

/// Inclusive delay range for replacement spawns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl Default for DelayRange {
    fn default() -> Self {
        Self {
            min_ms: RESPAWN_DELAY_MIN_MS,
            max_ms: RESPAWN_DELAY_MAX_MS,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("grid must have at least one row and column (got {columns}x{rows})")]
    EmptyGrid { columns: i32, rows: i32 },
    #[error("lane layout has {lanes} rows but the grid has {rows}")]
    LaneCount { lanes: usize, rows: i32 },
    #[error("start cell ({}, {}) is outside the grid", .0.x, .0.y)]
    StartOutside(Cell),
    #[error("start cell ({}, {}) is already on the goal row", .0.x, .0.y)]
    StartOnGoal(Cell),
    #[error("lane layout has no goal row")]
    NoGoalRow,
    #[error("respawn delay range is inverted ({min_ms} > {max_ms})")]
    InvertedDelay { min_ms: u64, max_ms: u64 },
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Preset the timing values were derived from
    pub difficulty: Difficulty,

    // === Board ===
    pub columns: i32,
    pub rows: i32,
    pub start: Cell,
    /// One lane type per row, top to bottom
    pub lanes: Vec<LaneKind>,

    // === Traffic ===
    pub car_period_ms: u64,
    pub log_period_ms: u64,
    pub respawn_delay: DelayRange,
    pub initial_cars: usize,
    pub initial_logs: usize,
    /// At most one log per water row
    pub exclusive_log_lanes: bool,
    /// Random lane/heading picks per spawn before giving up
    pub max_spawn_attempts: u32,

    // === Progression ===
    pub starting_lives: u8,
    /// Car period shrinks by this much per completed crossing
    pub level_speedup_ms: u64,
    /// Car period never drops below this
    pub min_car_period_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::from_preset(Difficulty::default())
    }
}

impl GameConfig {
    /// Create a config from a difficulty preset on the classic board
    pub fn from_preset(difficulty: Difficulty) -> Self {
        let lanes = classic_layout(DEFAULT_ROWS);
        let water_rows = lanes.iter().filter(|&&l| l == LaneKind::Water).count();
        Self {
            difficulty,
            columns: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
            start: Cell::new(START_X, START_Y),
            lanes,
            car_period_ms: difficulty.car_period_ms(),
            log_period_ms: difficulty.log_period_ms(),
            respawn_delay: DelayRange::default(),
            initial_cars: difficulty.initial_cars(),
            initial_logs: water_rows,
            exclusive_log_lanes: true,
            max_spawn_attempts: MAX_SPAWN_ATTEMPTS,
            starting_lives: STARTING_LIVES,
            level_speedup_ms: 10,
            min_car_period_ms: 80,
        }
    }

    /// Apply a difficulty preset (updates timing and traffic, keeps the board)
    pub fn apply_preset(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.car_period_ms = difficulty.car_period_ms();
        self.log_period_ms = difficulty.log_period_ms();
        self.initial_cars = difficulty.initial_cars();
    }

    pub fn grid(&self) -> Grid {
        Grid::new(self.columns, self.rows, self.lanes.clone())
    }

    /// Car period after `level` completed crossings
    pub fn car_period_for_level(&self, level: u32) -> u64 {
        let speedup = self.level_speedup_ms.saturating_mul(u64::from(level));
        self.car_period_ms
            .saturating_sub(speedup)
            .max(self.min_car_period_ms.min(self.car_period_ms))
            .max(1)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns <= 0 || self.rows <= 0 {
            return Err(ConfigError::EmptyGrid {
                columns: self.columns,
                rows: self.rows,
            });
        }
        if self.lanes.len() != self.rows as usize {
            return Err(ConfigError::LaneCount {
                lanes: self.lanes.len(),
                rows: self.rows,
            });
        }
        let grid = self.grid();
        if !grid.contains(self.start) {
            return Err(ConfigError::StartOutside(self.start));
        }
        if !self.lanes.iter().any(|l| l.is_goal()) {
            return Err(ConfigError::NoGoalRow);
        }
        if grid.is_goal_row(self.start.y) {
            return Err(ConfigError::StartOnGoal(self.start));
        }
        if self.respawn_delay.min_ms > self.respawn_delay.max_ms {
            return Err(ConfigError::InvertedDelay {
                min_ms: self.respawn_delay.min_ms,
                max_ms: self.respawn_delay.max_ms,
            });
        }
        if self.car_period_ms == 0 {
            return Err(ConfigError::Zero("car_period_ms"));
        }
        if self.log_period_ms == 0 {
            return Err(ConfigError::Zero("log_period_ms"));
        }
        if self.starting_lives == 0 {
            return Err(ConfigError::Zero("starting_lives"));
        }
        if self.max_spawn_attempts == 0 {
            return Err(ConfigError::Zero("max_spawn_attempts"));
        }
        Ok(())
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "frogger_config";

    /// Load config from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded config from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored config: {}", e),
                }
            }
        }

        log::info!("Using default config");
        Self::default()
    }

    /// Save config to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Config saved");
            }
        }
    }

    /// Load config from a JSON file, falling back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("Ignoring {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::SafeZone;

    #[test]
    fn test_default_config_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.start, Cell::new(12, 24));
        assert_eq!(config.initial_logs, 11);
        assert!(config.car_period_ms < config.log_period_ms);
    }

    #[test]
    fn test_presets_keep_cars_faster_than_logs() {
        for d in [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard] {
            assert!(d.car_period_ms() < d.log_period_ms(), "{}", d.as_str());
            assert_eq!(Difficulty::from_str(d.as_str()), Some(d));
        }
        assert_eq!(Difficulty::from_str("nightmare"), None);
    }

    #[test]
    fn test_car_period_speeds_up_to_floor() {
        let config = GameConfig::default();
        assert_eq!(config.car_period_for_level(0), 250);
        assert_eq!(config.car_period_for_level(3), 220);
        assert_eq!(config.car_period_for_level(1000), 80);
    }

    #[test]
    fn test_rejects_bad_layouts() {
        let mut config = GameConfig::default();
        config.lanes.pop();
        assert!(matches!(config.validate(), Err(ConfigError::LaneCount { .. })));

        let mut config = GameConfig::default();
        config.start = Cell::new(25, 24);
        assert!(matches!(config.validate(), Err(ConfigError::StartOutside(_))));

        let mut config = GameConfig::default();
        config.lanes[0] = LaneKind::Safe(SafeZone::Boardwalk);
        assert!(matches!(config.validate(), Err(ConfigError::NoGoalRow)));

        let mut config = GameConfig::default();
        config.start = Cell::new(12, 0);
        assert!(matches!(config.validate(), Err(ConfigError::StartOnGoal(_))));

        let mut config = GameConfig::default();
        config.respawn_delay = DelayRange {
            min_ms: 3000,
            max_ms: 1500,
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvertedDelay { .. })));

        let mut config = GameConfig::default();
        config.starting_lives = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Zero("starting_lives"))));
    }

    #[test]
    fn test_json_round_trip_and_errors() {
        let mut config = GameConfig::from_preset(Difficulty::Hard);
        config.exclusive_log_lanes = false;
        let json = config.to_json().expect("serialize");
        let back = GameConfig::from_json(&json).expect("parse");
        assert_eq!(back, config);

        assert!(matches!(
            GameConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
