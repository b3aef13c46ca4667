//! Entity spawning and despawning
//!
//! Entities enter at the edge of a lane and leave at the opposite edge.
//! Each departure queues a replacement after a random delay, so traffic
//! density varies instead of marching in lockstep.

use rand::Rng;
use rand::seq::IndexedRandom;
use thiserror::Error;

use super::entity::{CarStyle, EntityId, EntityKind, MovingEntity, Token};
use super::grid::{Cell, Heading};
use super::scheduler::Job;
use super::state::{GameEvent, GameSession};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SpawnError {
    #[error("row {row} does not carry {kind:?} traffic")]
    WrongLane { kind: EntityKind, row: i32 },
    #[error("spawn cell ({}, {}) is occupied", .0.x, .0.y)]
    Occupied(Cell),
    #[error("row {0} already holds a log")]
    LaneCrowded(i32),
    #[error("row {0} already flows the other way")]
    OppositeFlow(i32),
    #[error("no lane carries {0:?} traffic")]
    NoLane(EntityKind),
}

/// Spawn one entity of `kind` at the entry edge of `row`, travelling `heading`
pub fn spawn(
    session: &mut GameSession,
    kind: EntityKind,
    row: i32,
    heading: Heading,
) -> Result<EntityId, SpawnError> {
    if session.grid.lane(row) != Some(kind.lane()) {
        return Err(SpawnError::WrongLane { kind, row });
    }

    let cell = session.grid.edge_cell(row, heading);
    if session.registry.at(cell).is_some() || session.player.cell == cell {
        return Err(SpawnError::Occupied(cell));
    }

    let lane_taken = session
        .registry
        .of_kind(kind)
        .any(|e| e.cell.y == row);
    let opposite = session
        .registry
        .of_kind(kind)
        .any(|e| e.cell.y == row && e.heading != heading);
    if kind == EntityKind::Log && session.config.exclusive_log_lanes {
        if lane_taken {
            return Err(SpawnError::LaneCrowded(row));
        }
    } else if opposite {
        return Err(SpawnError::OppositeFlow(row));
    }

    let token = match kind {
        EntityKind::Log => Token::Log,
        EntityKind::Car => {
            let styles = CarStyle::for_heading(heading);
            let style = styles
                .choose(&mut session.rng)
                .copied()
                .unwrap_or(CarStyle::PurpleLeft);
            Token::Car(style)
        }
    };

    let id = session.registry.next_entity_id();
    let period_ms = session.period_ms(kind);
    session.registry.insert(MovingEntity {
        id,
        kind,
        token,
        cell,
        heading,
        spawn_cell: cell,
        steps: 0,
        period_ms,
    });
    session.emit(GameEvent::EntitySpawned { id, token, cell });
    Ok(id)
}

/// Spawn at a random lane and heading, retrying on contention.
///
/// Gives up after `max_spawn_attempts` picks and returns the last failure.
pub fn spawn_random(session: &mut GameSession, kind: EntityKind) -> Result<EntityId, SpawnError> {
    let rows = session.grid.rows_of(kind.lane());
    if rows.is_empty() {
        return Err(SpawnError::NoLane(kind));
    }

    let mut last_err = SpawnError::NoLane(kind);
    for attempt in 0..session.config.max_spawn_attempts {
        let row = rows[session.rng.random_range(0..rows.len())];
        let heading = if session.rng.random_bool(0.5) {
            Heading::Left
        } else {
            Heading::Right
        };
        match spawn(session, kind, row, heading) {
            Ok(id) => return Ok(id),
            Err(e) => {
                log::debug!("Spawn attempt {} for {:?} failed: {}", attempt + 1, kind, e);
                last_err = e;
            }
        }
    }
    Err(last_err)
}

/// Queue a spawn of `kind` after a random delay
pub fn schedule_spawn(session: &mut GameSession, kind: EntityKind) -> u64 {
    let range = session.config.respawn_delay;
    let delay_ms = session.rng.random_range(range.min_ms..=range.max_ms);
    session.scheduler.after(delay_ms, Job::Spawn(kind));
    session.emit(GameEvent::SpawnScheduled { kind, delay_ms });
    delay_ms
}

/// Remove an entity that left the grid and queue its replacement
pub fn despawn(session: &mut GameSession, id: EntityId) -> Option<MovingEntity> {
    let entity = session.registry.remove(id)?;
    session.emit(GameEvent::EntityDespawned {
        id: entity.id,
        token: entity.token,
        cell: entity.cell,
    });
    if session.player.riding == Some(id) {
        session.player.riding = None;
    }
    schedule_spawn(session, entity.kind);
    Some(entity)
}

/// Handle a fired spawn timer. A saturated board retries later rather than
/// dropping the entity.
pub fn handle_spawn_job(session: &mut GameSession, kind: EntityKind) {
    if let Err(e) = spawn_random(session, kind) {
        log::debug!("Deferring {:?} spawn: {}", kind, e);
        if !matches!(e, SpawnError::NoLane(_)) {
            schedule_spawn(session, kind);
        }
    }
}

/// Fill the board with the configured starting traffic
pub fn populate(session: &mut GameSession) {
    let wanted = [
        (EntityKind::Car, session.config.initial_cars),
        (EntityKind::Log, session.config.initial_logs),
    ];
    for (kind, count) in wanted {
        for _ in 0..count {
            handle_spawn_job(session, kind);
        }
    }
    log::info!(
        "Populated {} cars, {} logs",
        session.registry.count(EntityKind::Car),
        session.registry.count(EntityKind::Log)
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::LaneKind;

    #[test]
    fn test_car_spawns_on_entry_edge() {
        let mut session = GameSession::with_seed(1);
        let id = spawn(&mut session, EntityKind::Car, 14, Heading::Left).expect("spawn");
        let car = session.registry.get(id).expect("registered");
        assert_eq!(car.cell, Cell::new(24, 14));
        assert!(CarStyle::for_heading(Heading::Left).iter().any(|s| Token::Car(*s) == car.token));

        let id = spawn(&mut session, EntityKind::Car, 15, Heading::Right).expect("spawn");
        let car = session.registry.get(id).expect("registered");
        assert_eq!(car.cell, Cell::new(0, 15));
        assert_eq!(car.token, Token::Car(CarStyle::WhiteRight));
    }

    #[test]
    fn test_rejects_wrong_lane_and_occupied_cell() {
        let mut session = GameSession::with_seed(1);
        assert_eq!(
            spawn(&mut session, EntityKind::Car, 5, Heading::Left),
            Err(SpawnError::WrongLane {
                kind: EntityKind::Car,
                row: 5
            })
        );
        spawn(&mut session, EntityKind::Car, 14, Heading::Left).expect("first");
        assert_eq!(
            spawn(&mut session, EntityKind::Car, 14, Heading::Left),
            Err(SpawnError::Occupied(Cell::new(24, 14)))
        );
    }

    #[test]
    fn test_player_on_entry_cell_blocks_spawn() {
        let mut session = GameSession::with_seed(1);
        session.player.cell = Cell::new(24, 14);
        assert_eq!(
            spawn(&mut session, EntityKind::Car, 14, Heading::Left),
            Err(SpawnError::Occupied(Cell::new(24, 14)))
        );
        assert!(session.registry.is_empty());
    }

    #[test]
    fn test_opposite_flow_is_refused() {
        let mut session = GameSession::with_seed(1);
        spawn(&mut session, EntityKind::Car, 14, Heading::Left).expect("first");
        assert_eq!(
            spawn(&mut session, EntityKind::Car, 14, Heading::Right),
            Err(SpawnError::OppositeFlow(14))
        );
    }

    #[test]
    fn test_log_lanes_are_exclusive_when_configured() {
        let mut session = GameSession::with_seed(1);
        spawn(&mut session, EntityKind::Log, 3, Heading::Right).expect("first");
        assert_eq!(
            spawn(&mut session, EntityKind::Log, 3, Heading::Left),
            Err(SpawnError::LaneCrowded(3))
        );

        session.config.exclusive_log_lanes = false;
        // Same direction is fine once the entry cell is free
        if let Some(log) = session.registry.iter_mut().next() {
            log.cell = Cell::new(5, 3);
        }
        assert!(spawn(&mut session, EntityKind::Log, 3, Heading::Right).is_ok());
        assert_eq!(
            spawn(&mut session, EntityKind::Log, 3, Heading::Left),
            Err(SpawnError::OppositeFlow(3))
        );
    }

    #[test]
    fn test_spawn_random_respects_retry_bound() {
        let mut session = GameSession::with_seed(3);
        let water = session.grid.rows_of(LaneKind::Water).len();
        for _ in 0..water {
            // Keep trying until every water row holds a log
            while spawn_random(&mut session, EntityKind::Log).is_err() {}
        }
        assert_eq!(session.registry.count(EntityKind::Log), water);
        assert!(spawn_random(&mut session, EntityKind::Log).is_err());
    }

    #[test]
    fn test_despawn_schedules_delayed_replacement() {
        let mut session = GameSession::with_seed(9);
        let id = spawn(&mut session, EntityKind::Car, 20, Heading::Left).expect("spawn");
        session.drain_events();

        let removed = despawn(&mut session, id).expect("present");
        assert_eq!(removed.id, id);
        assert!(session.registry.is_empty());

        let delay = session.drain_events().into_iter().find_map(|e| match e {
            GameEvent::SpawnScheduled { kind, delay_ms } => Some((kind, delay_ms)),
            _ => None,
        });
        let (kind, delay) = delay.expect("replacement scheduled");
        assert_eq!(kind, EntityKind::Car);
        assert!((1500..=3000).contains(&delay));
        assert_eq!(session.scheduler.pending().count(), 1);
    }

    #[test]
    fn test_populate_fills_every_water_row_once() {
        let mut session = GameSession::with_seed(11);
        populate(&mut session);
        let logs = session.registry.count(EntityKind::Log);
        let pending = session
            .scheduler
            .pending()
            .filter(|t| t.job == Job::Spawn(EntityKind::Log))
            .count();
        // Whatever did not fit on the first pass is queued, never lost
        assert_eq!(logs + pending, session.config.initial_logs);
        assert!(session.registry.count(EntityKind::Car) <= session.config.initial_cars);
    }
}
