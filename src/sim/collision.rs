//! Collision and transition resolution
//!
//! Runs after every entity pass and every player move. Rules are checked in
//! priority order: car hit, open water, boarding a log, reaching the goal.

use super::entity::EntityKind;
use super::grid::LaneKind;
use super::state::{DeathCause, GameEvent, GamePhase, GameSession};
use crate::render::Screen;

/// Outcome of a resolver pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Nothing happened (or the player is simply standing somewhere safe)
    Clear,
    /// Player is standing on a log
    Riding,
    LifeLost(DeathCause),
    /// Last life lost; the session was reset to the start screen
    GameOver,
    GoalReached,
}

/// Apply the collision rules to the player's current cell.
///
/// `swept` marks a pass where the log being ridden just left the grid, so a
/// water death is attributed to the ride ending.
pub fn resolve(session: &mut GameSession, swept: bool) -> Resolution {
    if session.phase != GamePhase::Playing {
        return Resolution::Clear;
    }

    let cell = session.player.cell;

    if session.registry.kind_at(EntityKind::Car, cell).is_some() {
        return lose_life(session, DeathCause::HitByCar);
    }

    let log = session.registry.kind_at(EntityKind::Log, cell).map(|e| e.id);
    if session.grid.lane(cell.y) == Some(LaneKind::Water) && log.is_none() {
        let cause = if swept {
            DeathCause::SweptAway
        } else {
            DeathCause::Drowned
        };
        return lose_life(session, cause);
    }

    if let Some(id) = log {
        if session.player.riding != Some(id) {
            session.player.riding = Some(id);
            session.emit(GameEvent::Boarded { log: id });
        }
        return Resolution::Riding;
    }
    session.player.riding = None;

    if session.grid.is_goal_row(cell.y) {
        return reach_goal(session);
    }

    Resolution::Clear
}

/// Decrement lives; respawn, or end the session when none are left
pub fn lose_life(session: &mut GameSession, cause: DeathCause) -> Resolution {
    session.player.lives = session.player.lives.saturating_sub(1);
    let lives = session.player.lives;
    session.emit(GameEvent::LifeLost { cause, lives });
    session.emit(GameEvent::LivesChanged { lives });
    log::info!("Life lost ({:?}), {} left", cause, lives);

    if lives == 0 {
        let final_score = session.player.score;
        session.emit(GameEvent::GameOver { final_score });
        log::info!("Game over with score {}", final_score);
        session.reset();
        return Resolution::GameOver;
    }

    session.respawn_player();
    Resolution::LifeLost(cause)
}

fn reach_goal(session: &mut GameSession) -> Resolution {
    session.player.score += 1;
    session.level += 1;
    let score = session.player.score;
    let level = session.level;
    session.emit(GameEvent::ScoreChanged { score });
    session.emit(GameEvent::GoalReached { score, level });
    session.phase = GamePhase::Crossed;
    session.set_screen(Screen::Win);
    log::info!("Goal reached! score={} level={}", score, level);
    Resolution::GoalReached
}
