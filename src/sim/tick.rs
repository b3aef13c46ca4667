//! Simulation driver
//!
//! `tick` advances simulated time and runs whatever timers fall due;
//! `apply_command` handles one input event synchronously.

use super::collision::resolve;
use super::entity::{EntityId, EntityKind};
use super::grid::Direction;
use super::player::{MoveOutcome, move_player};
use super::scheduler::Job;
use super::spawner;
use super::state::{GameEvent, GamePhase, GameSession};
use crate::render::Screen;

/// Discrete input events from the front-end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    /// Leave the start screen
    Start,
    /// Leave the win screen for the next crossing
    Continue,
    /// Toggle pause
    Pause,
    /// Abandon the session and go back to the start screen
    Restart,
}

/// Handle one command. Moves resolve collisions before returning.
pub fn apply_command(session: &mut GameSession, command: Command) -> Option<MoveOutcome> {
    match command {
        Command::Move(dir) => return Some(move_player(session, dir)),
        Command::Start => {
            if session.phase == GamePhase::StartScreen {
                start_round(session);
            }
        }
        Command::Continue => {
            if session.phase == GamePhase::Crossed {
                session.respawn_player();
                session.arm_step_timers();
                session.phase = GamePhase::Playing;
                session.set_screen(Screen::Game);
                log::info!(
                    "Level {} (car period {} ms)",
                    session.level,
                    session.period_ms(EntityKind::Car)
                );
            }
        }
        Command::Pause => match session.phase {
            GamePhase::Playing => {
                session.phase = GamePhase::Paused;
                session.set_screen(Screen::Paused);
            }
            GamePhase::Paused => {
                session.phase = GamePhase::Playing;
                session.set_screen(Screen::Game);
            }
            _ => {}
        },
        Command::Restart => session.reset(),
    }
    None
}

fn start_round(session: &mut GameSession) {
    session.phase = GamePhase::Playing;
    session.set_screen(Screen::Game);
    session.emit(GameEvent::LivesChanged {
        lives: session.player.lives,
    });
    session.emit(GameEvent::ScoreChanged {
        score: session.player.score,
    });
    session.arm_step_timers();
    spawner::populate(session);
    log::info!("Round started (seed {})", session.seed);
}

/// Advance simulated time by `dt_ms`, running due timers in order.
///
/// Stops early if play is interrupted (goal reached); the remaining time is
/// simply not simulated.
pub fn tick(session: &mut GameSession, dt_ms: u64) {
    if session.phase != GamePhase::Playing {
        return;
    }

    let until = session.now_ms() + dt_ms;
    while let Some(job) = session.scheduler.pop_due(until) {
        match job {
            Job::Advance(kind) => advance_entities(session, kind),
            Job::Spawn(kind) => spawner::handle_spawn_job(session, kind),
        }
        if session.phase != GamePhase::Playing {
            return;
        }
    }
    session.scheduler.finish(until);
}

/// Move every entity of `kind` one cell, carry a riding player, despawn
/// whatever left the grid, then resolve collisions once.
pub fn advance_entities(session: &mut GameSession, kind: EntityKind) {
    let riding = session.player.riding;
    let mut exited: Vec<EntityId> = Vec::new();
    let mut carried_to = None;
    let mut moves = Vec::new();

    for entity in session.registry.iter_mut().filter(|e| e.kind == kind) {
        let next = entity.next_cell();
        if !session.grid.contains(next) {
            exited.push(entity.id);
            continue;
        }
        moves.push(GameEvent::EntityMoved {
            id: entity.id,
            token: entity.token,
            from: entity.cell,
            to: next,
        });
        entity.cell = next;
        entity.steps += 1;
        if riding == Some(entity.id) {
            carried_to = Some(next);
        }
    }
    session.events.extend(moves);

    if let Some(to) = carried_to {
        let from = session.player.cell;
        session.player.cell = to;
        session.emit(GameEvent::PlayerMoved {
            from,
            to,
            carried: true,
        });
    }

    let swept = riding.is_some_and(|id| exited.contains(&id));
    for id in exited {
        spawner::despawn(session, id);
    }

    resolve(session, swept);
}
