//! Player controller
//!
//! One cell per command, clamped to the grid. Each accepted move resolves
//! collisions before returning, so input never queues up.

use super::collision::{Resolution, resolve};
use super::grid::Direction;
use super::state::{GameEvent, GamePhase, GameSession};

/// Result of a move command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Not playing; input dropped
    Ignored,
    /// Would leave the grid; nothing changed
    Blocked,
    Moved(Resolution),
}

pub fn move_player(session: &mut GameSession, dir: Direction) -> MoveOutcome {
    if session.phase != GamePhase::Playing {
        return MoveOutcome::Ignored;
    }

    let from = session.player.cell;
    let Some(to) = session.grid.step(from, dir) else {
        return MoveOutcome::Blocked;
    };

    session.player.cell = to;
    session.emit(GameEvent::PlayerMoved {
        from,
        to,
        carried: false,
    });
    MoveOutcome::Moved(resolve(session, false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::grid::{Cell, LaneKind, SafeZone};
    use proptest::prelude::*;

    /// Board with no water, so any cell is survivable without traffic
    fn dry_session(columns: i32, rows: i32) -> GameSession {
        let mut config = GameConfig::default();
        config.columns = columns;
        config.rows = rows;
        config.lanes = vec![LaneKind::Road; rows as usize];
        config.lanes[0] = LaneKind::Safe(SafeZone::End);
        config.lanes[rows as usize - 1] = LaneKind::Safe(SafeZone::Start);
        config.start = Cell::new(columns / 2, rows - 1);
        let mut session = GameSession::new(config, 1).expect("valid config");
        session.phase = GamePhase::Playing;
        session
    }

    fn direction() -> impl Strategy<Value = Direction> {
        prop_oneof![
            Just(Direction::Up),
            Just(Direction::Down),
            Just(Direction::Left),
            Just(Direction::Right),
        ]
    }

    #[test]
    fn test_moves_are_ignored_off_play() {
        let mut session = GameSession::with_seed(1);
        assert_eq!(move_player(&mut session, Direction::Up), MoveOutcome::Ignored);
        assert_eq!(session.player.cell, Cell::new(12, 24));
    }

    #[test]
    fn test_blocked_move_has_no_side_effects() {
        let mut session = dry_session(25, 25);
        session.drain_events();
        assert_eq!(move_player(&mut session, Direction::Down), MoveOutcome::Blocked);
        assert_eq!(session.player.cell, Cell::new(12, 24));
        assert_eq!(session.player.lives, 3);
        assert!(session.events.is_empty());
    }

    #[test]
    fn test_walking_up_reaches_goal() {
        let mut session = dry_session(25, 25);
        for _ in 0..23 {
            assert_eq!(
                move_player(&mut session, Direction::Up),
                MoveOutcome::Moved(Resolution::Clear)
            );
        }
        assert_eq!(
            move_player(&mut session, Direction::Up),
            MoveOutcome::Moved(Resolution::GoalReached)
        );
        assert_eq!(session.player.cell, Cell::new(12, 0));
        assert_eq!(session.player.score, 1);
    }

    proptest! {
        #[test]
        fn test_player_stays_in_bounds(
            x in 0i32..25,
            y in 1i32..25,
            moves in proptest::collection::vec(direction(), 0..60),
        ) {
            let mut session = dry_session(25, 25);
            session.player.cell = Cell::new(x, y);
            for dir in moves {
                let before = session.player.cell;
                let outcome = move_player(&mut session, dir);
                let cell = session.player.cell;
                prop_assert!((0..25).contains(&cell.x) && (0..25).contains(&cell.y));
                if outcome == MoveOutcome::Blocked {
                    prop_assert_eq!(cell, before);
                }
                if session.phase != GamePhase::Playing {
                    break;
                }
            }
        }

        #[test]
        fn test_edges_block_outward_moves(along in 0i32..25) {
            let edges = [
                (Cell::new(along, 0), Direction::Up),
                (Cell::new(along, 24), Direction::Down),
                (Cell::new(0, along), Direction::Left),
                (Cell::new(24, along), Direction::Right),
            ];
            for (cell, dir) in edges {
                let mut session = dry_session(25, 25);
                session.player.cell = cell;
                prop_assert_eq!(move_player(&mut session, dir), MoveOutcome::Blocked);
                prop_assert_eq!(session.player.cell, cell);
            }
        }
    }
}
