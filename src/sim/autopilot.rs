//! Idle/demo mode - a simple frog that plays itself
//!
//! Looks one car step ahead. Good enough to cross the road most of the time
//! and to show off the log rides; it is not trying to be optimal.

use super::entity::EntityKind;
use super::grid::{Cell, Direction, LaneKind};
use super::state::{GamePhase, GameSession};

/// Would standing on `cell` survive the next car and log steps?
pub fn is_safe(session: &GameSession, cell: Cell) -> bool {
    if !session.grid.contains(cell) {
        return false;
    }
    let registry = &session.registry;
    if registry.kind_at(EntityKind::Car, cell).is_some() {
        return false;
    }
    // A car one cell upstream drives into us on its next step
    let incoming = registry
        .of_kind(EntityKind::Car)
        .any(|car| car.next_cell() == cell);
    if incoming {
        return false;
    }

    match session.grid.lane(cell.y) {
        Some(LaneKind::Water) => registry
            .kind_at(EntityKind::Log, cell)
            .is_some_and(|log| session.grid.contains(log.next_cell())),
        Some(_) => true,
        None => false,
    }
}

/// Pick the next move, or `None` to hold position
pub fn choose_move(session: &GameSession) -> Option<Direction> {
    if session.phase != GamePhase::Playing {
        return None;
    }
    let here = session.player.cell;
    let safe = |dir: Direction| {
        session
            .grid
            .step(here, dir)
            .is_some_and(|cell| is_safe(session, cell))
    };

    if safe(Direction::Up) {
        return Some(Direction::Up);
    }
    if is_safe(session, here) {
        return None;
    }

    // Drift back toward the middle when dodging
    let center = session.grid.columns / 2;
    let sides = if here.x < center {
        [Direction::Right, Direction::Left]
    } else {
        [Direction::Left, Direction::Right]
    };
    sides
        .into_iter()
        .chain(std::iter::once(Direction::Down))
        .find(|&dir| safe(dir))
}

/// Rate limit for autopilot hops, in simulated time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HopPacer {
    interval_ms: u64,
    last_hop_ms: Option<u64>,
}

impl HopPacer {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_hop_ms: None,
        }
    }

    /// May the autopilot hop at `now_ms`? A clock that went backwards means
    /// a fresh session, so the old hop no longer counts.
    pub fn ready(&self, now_ms: u64) -> bool {
        match self.last_hop_ms {
            None => true,
            Some(last) => now_ms < last || now_ms - last >= self.interval_ms,
        }
    }

    pub fn hopped(&mut self, now_ms: u64) {
        self.last_hop_ms = Some(now_ms);
    }

    pub fn reset(&mut self) {
        self.last_hop_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::Heading;
    use crate::sim::spawner;
    use crate::sim::tick::{Command, advance_entities, apply_command};

    fn quiet() -> GameSession {
        let mut session = GameSession::with_seed(21);
        session.config.initial_cars = 0;
        session.config.initial_logs = 0;
        apply_command(&mut session, Command::Start);
        session
    }

    #[test]
    fn test_holds_on_start_screen() {
        let session = GameSession::with_seed(21);
        assert_eq!(choose_move(&session), None);
    }

    #[test]
    fn test_advances_on_an_empty_road() {
        let session = quiet();
        assert_eq!(choose_move(&session), Some(Direction::Up));
    }

    #[test]
    fn test_waits_for_an_incoming_car() {
        let mut session = quiet();
        spawner::spawn(&mut session, EntityKind::Car, 23, Heading::Left).expect("car");
        for _ in 0..11 {
            advance_entities(&mut session, EntityKind::Car);
        }
        // Car sits at (13, 23); its next step lands right above the frog
        assert_eq!(choose_move(&session), None);
    }

    #[test]
    fn test_refuses_open_water() {
        let mut session = quiet();
        session.player.cell = Cell::new(4, 12);
        assert!(!is_safe(&session, Cell::new(4, 11)));
        assert_ne!(choose_move(&session), Some(Direction::Up));

        spawner::spawn(&mut session, EntityKind::Log, 11, Heading::Right).expect("log");
        for _ in 0..4 {
            advance_entities(&mut session, EntityKind::Log);
        }
        assert!(is_safe(&session, Cell::new(4, 11)));
        assert_eq!(choose_move(&session), Some(Direction::Up));
    }

    #[test]
    fn test_pacer_spaces_hops() {
        let mut pacer = HopPacer::new(150);
        assert!(pacer.ready(0));
        pacer.hopped(100);
        assert!(!pacer.ready(200));
        assert!(pacer.ready(250));
    }

    #[test]
    fn test_pacer_recovers_when_clock_restarts() {
        let mut pacer = HopPacer::new(150);
        pacer.hopped(120_000);
        // A replaced session starts its clock at zero again
        assert!(pacer.ready(0));
        assert!(pacer.ready(25));

        pacer.reset();
        assert!(pacer.ready(0));
    }
}
