//! Frogger entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, KeyboardEvent};

    use frogger::consts::*;
    use frogger::render::{self, Renderer, Screen};
    use frogger::sim::autopilot::{self, HopPacer};
    use frogger::sim::{Cell, Command, Direction, GamePhase, GameSession, Grid, Token, apply_command, tick};
    use frogger::{Difficulty, GameConfig};

    /// Minimum time between autopilot hops (ms)
    const IDLE_HOP_MS: u64 = 150;

    /// Projects events into the grid of `div` cells
    struct DomRenderer {
        document: Document,
    }

    impl DomRenderer {
        fn cell(&self, cell: Cell) -> Option<web_sys::Element> {
            self.document
                .get_element_by_id(&format!("{}-{}", cell.x, cell.y))
        }

        /// Create one row element per lane and one cell per column
        fn build_board(&self, grid: &Grid) {
            let Some(board) = self.document.get_element_by_id("board") else {
                log::warn!("No #board element; nothing to draw into");
                return;
            };
            board.set_inner_html("");
            for (row, lane) in grid.lanes().iter().enumerate() {
                let Ok(row_el) = self.document.create_element("div") else {
                    continue;
                };
                row_el.set_id(&format!("frogger-{}", row));
                let _ = row_el.set_attribute("class", &format!("row {}", lane.as_str()));
                for col in 0..grid.columns {
                    if let Ok(coord) = self.document.create_element("div") {
                        coord.set_id(&format!("{}-{}", col, row));
                        let _ = coord.set_attribute("class", &format!("coord x-{} y-{}", col, row));
                        let _ = row_el.append_child(&coord);
                    }
                }
                let _ = board.append_child(&row_el);
            }
        }

        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }
    }

    impl Renderer for DomRenderer {
        fn place_token(&mut self, cell: Cell, token: Token) {
            let Some(coord) = self.cell(cell) else {
                return;
            };
            if let Ok(img) = self.document.create_element("img") {
                let _ = img.set_attribute("src", &format!("images/{}.png", token.as_str()));
                let _ = img.set_attribute("class", token.as_str());
                let _ = coord.append_child(&img);
            }
        }

        fn remove_token(&mut self, cell: Cell, token: Token) {
            if let Some(coord) = self.cell(cell) {
                if let Ok(Some(img)) = coord.query_selector(&format!(".{}", token.as_str())) {
                    img.remove();
                }
            }
        }

        fn set_score(&mut self, score: u32) {
            self.set_text("score", &score.to_string());
        }

        fn set_lives(&mut self, lives: u8) {
            self.set_text("lives", &lives.to_string());
        }

        fn show_screen(&mut self, screen: Screen) {
            for s in Screen::ALL {
                if let Some(el) = self.document.get_element_by_id(s.as_str()) {
                    let display = if s == screen { "display: block" } else { "display: none" };
                    let _ = el.set_attribute("style", display);
                }
            }
        }
    }

    /// Game instance holding all state
    struct Game {
        session: GameSession,
        view: DomRenderer,
        accumulator: f64,
        last_time: f64,
        idle_mode: bool,
        pacer: HopPacer,
    }

    impl Game {
        fn new(session: GameSession, document: Document) -> Self {
            Self {
                session,
                view: DomRenderer { document },
                accumulator: 0.0,
                last_time: 0.0,
                idle_mode: false,
                pacer: HopPacer::new(IDLE_HOP_MS),
            }
        }

        /// Handle a command and push its effects to the DOM right away
        fn command(&mut self, command: Command) {
            apply_command(&mut self.session, command);
            self.flush();
        }

        fn flush(&mut self) {
            let events = self.session.drain_events();
            render::project(&events, &mut self.view);
        }

        /// Run simulation steps for the elapsed frame time
        fn update(&mut self, dt_ms: f64) {
            self.accumulator += dt_ms.min(250.0);

            let step = SIM_STEP_MS as f64;
            let mut substeps = 0;
            while self.accumulator >= step && substeps < MAX_SUBSTEPS {
                if self.idle_mode {
                    self.idle_step();
                }
                tick(&mut self.session, SIM_STEP_MS);
                self.accumulator -= step;
                substeps += 1;
            }
            self.flush();
        }

        fn idle_step(&mut self) {
            match self.session.phase {
                GamePhase::StartScreen => apply_command(&mut self.session, Command::Start),
                GamePhase::Crossed => apply_command(&mut self.session, Command::Continue),
                GamePhase::Playing => {
                    let now = self.session.now_ms();
                    if !self.pacer.ready(now) {
                        return;
                    }
                    match autopilot::choose_move(&self.session) {
                        Some(dir) => {
                            self.pacer.hopped(now);
                            apply_command(&mut self.session, Command::Move(dir))
                        }
                        None => None,
                    }
                }
                GamePhase::Paused => None,
            };
        }

        /// Switch preset from the start screen and remember it
        fn set_difficulty(&mut self, difficulty: Difficulty) {
            if self.session.phase != GamePhase::StartScreen {
                return;
            }
            let mut config = self.session.config.clone();
            config.apply_preset(difficulty);
            match GameSession::new(config, self.session.seed) {
                Ok(session) => {
                    session.config.save();
                    self.replace_session(session);
                    log::info!("Difficulty: {}", difficulty.as_str());
                }
                Err(e) => log::warn!("Preset {} rejected: {}", difficulty.as_str(), e),
            }
        }

        fn restart(&mut self, seed: u64) {
            let config = self.session.config.clone();
            let session = GameSession::new(config, seed)
                .unwrap_or_else(|_| GameSession::with_seed(seed));
            self.replace_session(session);
        }

        /// Swap in a fresh session; its clock starts again at zero
        fn replace_session(&mut self, session: GameSession) {
            self.session = session;
            self.accumulator = 0.0;
            self.pacer.reset();
            self.view.build_board(&self.session.grid);
            render::redraw(&self.session, &mut self.view);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Frogger starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let config = GameConfig::load();
        let seed = js_sys::Date::now() as u64;
        let session = GameSession::new(config, seed).unwrap_or_else(|e| {
            log::warn!("Config rejected ({}), using defaults", e);
            GameSession::with_seed(seed)
        });
        log::info!(
            "Game initialized with seed: {} ({})",
            seed,
            session.config.difficulty.as_str()
        );

        let game = Rc::new(RefCell::new(Game::new(session, document)));
        {
            let mut g = game.borrow_mut();
            let grid = g.session.grid.clone();
            g.view.build_board(&grid);
            let Game { session, view, .. } = &mut *g;
            render::redraw(session, view);
        }

        setup_input_handlers(game.clone());
        setup_restart_button(game.clone());
        setup_auto_pause(game.clone());

        request_animation_frame(game);

        log::info!("Frogger running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let mut g = game.borrow_mut();
            let command = match event.key().as_str() {
                "ArrowUp" => Some(Command::Move(Direction::Up)),
                "ArrowDown" => Some(Command::Move(Direction::Down)),
                "ArrowLeft" => Some(Command::Move(Direction::Left)),
                "ArrowRight" => Some(Command::Move(Direction::Right)),
                " " | "Enter" => match g.session.phase {
                    GamePhase::StartScreen => Some(Command::Start),
                    GamePhase::Crossed => Some(Command::Continue),
                    _ => None,
                },
                "Escape" | "p" | "P" => Some(Command::Pause),
                "r" | "R" => Some(Command::Restart),
                "1" => {
                    g.set_difficulty(Difficulty::Easy);
                    None
                }
                "2" => {
                    g.set_difficulty(Difficulty::Normal);
                    None
                }
                "3" => {
                    g.set_difficulty(Difficulty::Hard);
                    None
                }
                "i" | "I" => {
                    g.idle_mode = !g.idle_mode;
                    log::info!("Idle mode: {}", g.idle_mode);
                    None
                }
                _ => None,
            };
            if let Some(command) = command {
                event.prevent_default();
                g.command(command);
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                time - g.last_time
            } else {
                SIM_STEP_MS as f64
            };
            g.last_time = time;

            g.update(dt);
        }

        request_animation_frame(game);
    }

    fn setup_restart_button(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let seed = js_sys::Date::now() as u64;
                game.borrow_mut().restart(seed);
                log::info!("Game restarted with seed: {}", seed);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.session.phase == GamePhase::Playing {
                        g.command(Command::Pause);
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.session.phase == GamePhase::Playing {
                    g.command(Command::Pause);
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::path::Path;

    use frogger::consts::*;
    use frogger::render::{self, Renderer, Screen};
    use frogger::sim::autopilot::{self, HopPacer};
    use frogger::sim::{Cell, Command, GamePhase, GameSession, Token, apply_command, tick};
    use frogger::GameConfig;

    /// Simulated span of the headless demo (ms)
    const DEMO_DURATION_MS: u64 = 180_000;
    /// Minimum time between autopilot hops (ms)
    const HOP_INTERVAL_MS: u64 = 150;

    /// Renderer that narrates to the log
    #[derive(Default)]
    struct LogRenderer {
        placed: u64,
        score: u32,
        lives: u8,
    }

    impl Renderer for LogRenderer {
        fn place_token(&mut self, cell: Cell, token: Token) {
            self.placed += 1;
            log::trace!("place {} at ({}, {})", token.as_str(), cell.x, cell.y);
        }

        fn remove_token(&mut self, cell: Cell, token: Token) {
            log::trace!("remove {} at ({}, {})", token.as_str(), cell.x, cell.y);
        }

        fn set_score(&mut self, score: u32) {
            if score != self.score {
                log::debug!("score {}", score);
            }
            self.score = score;
        }

        fn set_lives(&mut self, lives: u8) {
            if lives != self.lives {
                log::debug!("lives {}", lives);
            }
            self.lives = lives;
        }

        fn show_screen(&mut self, screen: Screen) {
            log::debug!("screen {}", screen.as_str());
        }
    }

    pub fn run() {
        env_logger::init();
        log::info!("Frogger (native) starting headless demo...");

        let mut args = std::env::args().skip(1);
        let config = args
            .next()
            .map(|path| GameConfig::load_file(Path::new(&path)))
            .unwrap_or_default();
        let seed = args
            .next()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0x00F2_066E);

        let mut session = match GameSession::new(config, seed) {
            Ok(session) => session,
            Err(e) => {
                log::warn!("Config rejected ({}), using defaults", e);
                GameSession::with_seed(seed)
            }
        };
        let mut view = LogRenderer::default();
        render::redraw(&session, &mut view);

        let mut games = 1u32;
        let mut best = 0u32;
        let mut pacer = HopPacer::new(HOP_INTERVAL_MS);
        apply_command(&mut session, Command::Start);

        for _ in 0..DEMO_DURATION_MS / SIM_STEP_MS {
            match session.phase {
                GamePhase::Crossed => {
                    best = best.max(session.player.score);
                    apply_command(&mut session, Command::Continue);
                }
                GamePhase::StartScreen => {
                    games += 1;
                    apply_command(&mut session, Command::Start);
                }
                _ => {}
            }

            let now = session.now_ms();
            if pacer.ready(now) {
                if let Some(dir) = autopilot::choose_move(&session) {
                    apply_command(&mut session, Command::Move(dir));
                    pacer.hopped(now);
                }
            }

            tick(&mut session, SIM_STEP_MS);
            render::project(&session.drain_events(), &mut view);
        }

        best = best.max(session.player.score);
        log::info!(
            "Demo finished: {} game(s), best score {}, {} tokens drawn",
            games,
            best,
            view.placed
        );
        println!("Games played: {}", games);
        println!("Best score:   {}", best);
        println!("Lives left:   {}", session.player.lives);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    demo::run();
}
