//! Rendering collaborator
//!
//! The simulation never draws. It records `GameEvent`s, and `project` replays
//! them onto whatever implements `Renderer` (DOM cells on the web, a log
//! sink natively). The view is a projection of state, never a source of it.

use serde::{Deserialize, Serialize};

use crate::sim::entity::Token;
use crate::sim::grid::Cell;
use crate::sim::state::{GameEvent, GamePhase, GameSession};

/// Top-level screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    Start,
    Game,
    Paused,
    Win,
}

impl Screen {
    pub const ALL: [Screen; 4] = [Screen::Start, Screen::Game, Screen::Paused, Screen::Win];

    /// Element id of the screen in the web view
    pub fn as_str(&self) -> &'static str {
        match self {
            Screen::Start => "start-screen",
            Screen::Game => "game-screen",
            Screen::Paused => "pause-screen",
            Screen::Win => "win-screen",
        }
    }

    pub fn for_phase(phase: GamePhase) -> Self {
        match phase {
            GamePhase::StartScreen => Screen::Start,
            GamePhase::Playing => Screen::Game,
            GamePhase::Paused => Screen::Paused,
            GamePhase::Crossed => Screen::Win,
        }
    }
}

/// Side-effect sink for the view
pub trait Renderer {
    fn place_token(&mut self, cell: Cell, token: Token);
    fn remove_token(&mut self, cell: Cell, token: Token);
    fn set_score(&mut self, score: u32);
    fn set_lives(&mut self, lives: u8);
    fn show_screen(&mut self, screen: Screen);
}

/// Replay events onto a renderer in order
pub fn project<R: Renderer + ?Sized>(events: &[GameEvent], renderer: &mut R) {
    for event in events {
        match *event {
            GameEvent::EntitySpawned { token, cell, .. } => renderer.place_token(cell, token),
            GameEvent::EntityMoved { token, from, to, .. } => {
                renderer.remove_token(from, token);
                renderer.place_token(to, token);
            }
            GameEvent::EntityDespawned { token, cell, .. } => renderer.remove_token(cell, token),
            GameEvent::PlayerMoved { from, to, .. } | GameEvent::PlayerRespawned { from, to } => {
                renderer.remove_token(from, Token::Frog);
                renderer.place_token(to, Token::Frog);
            }
            GameEvent::ScoreChanged { score } => renderer.set_score(score),
            GameEvent::LivesChanged { lives } => renderer.set_lives(lives),
            GameEvent::ScreenChanged { screen } => renderer.show_screen(screen),
            GameEvent::SpawnScheduled { .. }
            | GameEvent::Boarded { .. }
            | GameEvent::LifeLost { .. }
            | GameEvent::GoalReached { .. }
            | GameEvent::GameOver { .. } => {}
        }
    }
}

/// Full sync from state (first frame, or after loading a snapshot)
pub fn redraw<R: Renderer + ?Sized>(session: &GameSession, renderer: &mut R) {
    for entity in session.registry.iter() {
        renderer.place_token(entity.cell, entity.token);
    }
    renderer.place_token(session.player.cell, Token::Frog);
    renderer.set_score(session.player.score);
    renderer.set_lives(session.player.lives);
    renderer.show_screen(Screen::for_phase(session.phase));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::EntityKind;
    use crate::sim::grid::{Direction, Heading};
    use crate::sim::spawner;
    use crate::sim::tick::{Command, advance_entities, apply_command};

    /// Keeps a token list per cell, like the DOM grid does
    #[derive(Default)]
    struct Board {
        cells: Vec<(Cell, Token)>,
        score: u32,
        lives: u8,
        screen: Option<Screen>,
    }

    impl Renderer for Board {
        fn place_token(&mut self, cell: Cell, token: Token) {
            self.cells.push((cell, token));
        }
        fn remove_token(&mut self, cell: Cell, token: Token) {
            if let Some(i) = self.cells.iter().position(|&c| c == (cell, token)) {
                self.cells.remove(i);
            }
        }
        fn set_score(&mut self, score: u32) {
            self.score = score;
        }
        fn set_lives(&mut self, lives: u8) {
            self.lives = lives;
        }
        fn show_screen(&mut self, screen: Screen) {
            self.screen = Some(screen);
        }
    }

    fn sorted(mut cells: Vec<(Cell, Token)>) -> Vec<(Cell, Token)> {
        cells.sort_by_key(|(c, t)| (c.y, c.x, t.as_str()));
        cells
    }

    #[test]
    fn test_projection_tracks_state() {
        let mut session = GameSession::with_seed(77);
        let mut board = Board::default();
        redraw(&session, &mut board);
        assert_eq!(board.screen, Some(Screen::Start));

        apply_command(&mut session, Command::Start);
        spawner::spawn(&mut session, EntityKind::Car, 23, Heading::Right).ok();
        for _ in 0..5 {
            advance_entities(&mut session, EntityKind::Car);
            advance_entities(&mut session, EntityKind::Log);
        }
        apply_command(&mut session, Command::Move(Direction::Left));
        project(&session.drain_events(), &mut board);

        let mut expected: Vec<(Cell, Token)> =
            session.registry.iter().map(|e| (e.cell, e.token)).collect();
        expected.push((session.player.cell, Token::Frog));
        assert_eq!(sorted(board.cells), sorted(expected));
        assert_eq!(board.lives, session.player.lives);
        assert_eq!(board.score, session.player.score);
        assert_eq!(board.screen, Some(Screen::for_phase(session.phase)));
    }

    #[test]
    fn test_reset_clears_the_board() {
        let mut session = GameSession::with_seed(5);
        let mut board = Board::default();
        redraw(&session, &mut board);
        apply_command(&mut session, Command::Start);
        apply_command(&mut session, Command::Restart);
        project(&session.drain_events(), &mut board);

        assert_eq!(board.cells, vec![(session.config.start, Token::Frog)]);
        assert_eq!(board.screen, Some(Screen::Start));
        assert_eq!(board.lives, 3);
    }

    #[test]
    fn test_screen_ids() {
        assert_eq!(Screen::Start.as_str(), "start-screen");
        assert_eq!(Screen::Game.as_str(), "game-screen");
    }
}
