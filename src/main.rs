//! Cattle Run entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlElement, KeyboardEvent, MouseEvent, TouchEvent};

    use cattle_run::consts::*;
    use cattle_run::input::{Command, command_for_key, command_for_touch};
    use cattle_run::sim::{GameEvent, GameSession, Geometry, ObstacleId, Runner};
    use cattle_run::{CoinFlip, Tuning};

    /// DOM nodes the game writes to
    struct Elements {
        document: Document,
        container: HtmlElement,
        player: HtmlElement,
        score: Element,
        start_screen: HtmlElement,
        game_over_screen: HtmlElement,
        final_score: Element,
        best_score: Option<Element>,
        coin_result: Option<Element>,
    }

    impl Elements {
        fn find(document: &Document) -> Result<Self, JsValue> {
            Ok(Self {
                document: document.clone(),
                container: html_by_id(document, "game-container")?,
                player: html_by_id(document, "player")?,
                score: by_id(document, "score")?,
                start_screen: html_by_id(document, "start-screen")?,
                game_over_screen: html_by_id(document, "game-over-screen")?,
                final_score: by_id(document, "final-score")?,
                best_score: document.get_element_by_id("best-score"),
                coin_result: document.get_element_by_id("coin-result"),
            })
        }

        /// Measure the playable area from the current layout
        fn geometry(&self) -> Geometry {
            let width = self.container.offset_width() as f32;
            let height = self.container.offset_height() as f32;
            let player_height = self.player.offset_height() as f32;
            Geometry {
                width,
                height,
                player_width: self.player.offset_width() as f32,
                player_height,
                player_bottom_offset: height - self.player.offset_top() as f32 - player_height,
                obstacle_width: OBSTACLE_WIDTH,
                obstacle_height: OBSTACLE_HEIGHT,
            }
        }
    }

    fn by_id(document: &Document, id: &str) -> Result<Element, JsValue> {
        document
            .get_element_by_id(id)
            .ok_or_else(|| JsValue::from_str(&format!("missing #{id}")))
    }

    fn html_by_id(document: &Document, id: &str) -> Result<HtmlElement, JsValue> {
        by_id(document, id)?.dyn_into::<HtmlElement>().map_err(JsValue::from)
    }

    fn set_px(el: &HtmlElement, property: &str, value: f32) {
        let _ = el.style().set_property(property, &format!("{value}px"));
    }

    fn set_display(el: &HtmlElement, value: &str) {
        let _ = el.style().set_property("display", value);
    }

    /// Game instance holding all state
    struct Game {
        runner: Runner,
        elements: Elements,
        obstacle_nodes: HashMap<ObstacleId, HtmlElement>,
        coin: CoinFlip,
        last_time: f64,
        /// Fractional milliseconds not yet fed to the simulation
        carry_ms: f64,
    }

    impl Game {
        fn new(seed: u64, elements: Elements) -> Self {
            let geometry = elements.geometry();
            let session = GameSession::new(seed, Tuning::load(), geometry);
            Self {
                runner: Runner::new(session),
                elements,
                obstacle_nodes: HashMap::new(),
                coin: CoinFlip::new(seed ^ 0x9e37_79b9_7f4a_7c15),
                last_time: 0.0,
                carry_ms: 0.0,
            }
        }

        fn apply(&mut self, command: Command) {
            if command == Command::Start {
                // Layout may have changed while the start/game over screen was up
                self.runner.resize(self.elements.geometry());
                let _ = self.elements.container.focus();
            }
            self.runner.apply(command);
            self.flush_events();
        }

        /// Feed elapsed frame time to the simulation
        fn update(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                (time - self.last_time).min(MAX_FRAME_MS)
            } else {
                0.0
            };
            self.last_time = time;

            self.carry_ms += dt;
            let whole = self.carry_ms.floor();
            self.carry_ms -= whole;
            self.runner.advance(whole as u64);
            self.flush_events();
        }

        /// Mirror simulation events into the DOM
        fn flush_events(&mut self) {
            for event in self.runner.drain_events() {
                match event {
                    GameEvent::Started => {
                        set_display(&self.elements.start_screen, "none");
                        set_display(&self.elements.game_over_screen, "none");
                    }
                    GameEvent::ScoreChanged(score) => {
                        self.elements
                            .score
                            .set_text_content(Some(&format!("Score: {score}")));
                    }
                    GameEvent::GameOver { final_score } => self.show_game_over(final_score),
                    GameEvent::ObstacleSpawned { id, pos } => {
                        if let Some(node) = self.create_obstacle_node() {
                            set_px(&node, "left", pos.x);
                            set_px(&node, "top", pos.y);
                            self.obstacle_nodes.insert(id, node);
                        }
                    }
                    GameEvent::ObstacleAdvanced { id, pos } => {
                        if let Some(node) = self.obstacle_nodes.get(&id) {
                            set_px(node, "top", pos.y);
                        }
                    }
                    GameEvent::ObstacleRemoved(id) => {
                        if let Some(node) = self.obstacle_nodes.remove(&id) {
                            node.remove();
                        }
                    }
                    GameEvent::PlayerMoved(x) => set_px(&self.elements.player, "left", x),
                    GameEvent::DifficultyIncreased { .. } => {}
                }
            }
        }

        fn create_obstacle_node(&self) -> Option<HtmlElement> {
            let node = self
                .elements
                .document
                .create_element("div")
                .ok()?
                .dyn_into::<HtmlElement>()
                .ok()?;
            let _ = node.class_list().add_1("obstacle");
            self.elements.container.append_child(&node).ok()?;
            Some(node)
        }

        fn show_game_over(&mut self, final_score: u64) {
            self.elements
                .final_score
                .set_text_content(Some(&final_score.to_string()));
            self.render_best_score();
            set_display(&self.elements.game_over_screen, "flex");
        }

        fn render_best_score(&self) {
            let best = self.runner.session().best_score();
            if let (Some(el), Some(best)) = (&self.elements.best_score, best) {
                el.set_text_content(Some(&format!("Best: {best}")));
            }
        }

        fn flip_coin(&mut self) {
            let face = self.coin.flip();
            if let Some(el) = &self.elements.coin_result {
                el.set_text_content(Some(&format!(
                    "{} ({} heads / {} tails)",
                    face.as_str(),
                    self.coin.heads,
                    self.coin.tails
                )));
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(err) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&JsValue::from_str(&err.to_string()));
        }

        log::info!("Cattle Run starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let elements = Elements::find(&document)?;

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, elements)));
        log::info!("Game initialized with seed: {}", seed);

        {
            let mut g = game.borrow_mut();
            g.flush_events();
            g.render_best_score();
        }

        setup_keyboard(&document, game.clone())?;
        setup_touch(game.clone())?;
        setup_buttons(&document, game.clone())?;
        setup_resize(&window, game.clone())?;

        request_animation_frame(game);

        log::info!("Cattle Run ready");
        Ok(())
    }

    fn setup_keyboard(document: &Document, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let mut g = game.borrow_mut();
            let phase = g.runner.session().phase();
            if let Some(command) = command_for_key(&event.key(), phase) {
                g.apply(command);
            }
        });
        document.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_touch(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let container = game.borrow().elements.container.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
            event.prevent_default();
            let Some(touch) = event.touches().get(0) else {
                return;
            };
            let mut g = game.borrow_mut();
            let rect = g.elements.container.get_bounding_client_rect();
            let phase = g.runner.session().phase();
            if let Some(command) = command_for_touch(
                touch.client_x() as f32,
                rect.left() as f32,
                rect.width() as f32,
                phase,
            ) {
                g.apply(command);
            }
        });
        container.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        for id in ["start-button", "restart-button"] {
            let Some(btn) = document.get_element_by_id(id) else {
                log::warn!("#{} not found", id);
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                // Keep the click from reaching the start screen handler
                event.stop_propagation();
                game.borrow_mut().apply(Command::Start);
            });
            btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Clicking the start screen itself (not its button) also starts
        {
            let game = game.clone();
            let screen: web_sys::EventTarget = game.borrow().elements.start_screen.clone().into();
            let target = screen.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                if event.target().as_ref() == Some(&target) {
                    game.borrow_mut().apply(Command::Start);
                }
            });
            screen.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("coin-button") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().flip_coin();
            });
            btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn setup_resize(window: &web_sys::Window, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut g = game.borrow_mut();
            let geometry = g.elements.geometry();
            g.runner.resize(geometry);
            g.flush_events();
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().update(time);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(err) = wasm_game::run() {
        web_sys::console::error_1(&err);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Cattle Run (native) starting...");
    log::info!("Native mode runs a headless demo - serve the wasm build for the real game");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u64>().ok())
        .unwrap_or(2024);

    let score = headless::run(seed, 10 * 60 * 1000);
    println!("Seed {seed}: survived {score} ticks");
}

/// Headless demo: a simple dodging bot plays one run
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use cattle_run::consts::TICK_MS;
    use cattle_run::sim::{
        Direction, GameSession, Geometry, Runner, obstacle_rect, player_rect,
    };
    use cattle_run::Tuning;

    /// Play until game over or `limit_ms` of simulated time, returning the score
    pub fn run(seed: u64, limit_ms: u64) -> u64 {
        let session = GameSession::new(seed, Tuning::load(), Geometry::default());
        let mut runner = Runner::new(session);
        runner.start();

        while runner.session().is_running() && runner.now_ms() < limit_ms {
            if let Some(direction) = dodge(runner.session()) {
                runner.move_player(direction);
            }
            runner.advance(u64::from(TICK_MS));
            runner.drain_events();
        }

        let score = runner.session().final_score().unwrap_or(runner.session().score());
        log::info!("Headless run finished at {} ms", runner.now_ms());
        score
    }

    /// Step away from the nearest obstacle falling toward the player's column
    fn dodge(session: &GameSession) -> Option<Direction> {
        let geometry = session.geometry();
        let player = player_rect(geometry, session.player().x);
        let threat = session
            .obstacles()
            .iter()
            .map(|o| obstacle_rect(geometry, o))
            .filter(|r| r.bottom() <= player.bottom() && r.bottom() > player.top() - 150.0)
            .filter(|r| r.left() < player.right() && r.right() > player.left())
            .max_by(|a, b| a.bottom().total_cmp(&b.bottom()))?;

        let threat_center = (threat.left() + threat.right()) / 2.0;
        let player_center = (player.left() + player.right()) / 2.0;
        let room_left = player.left() >= session.step();
        let room_right = player.right() + session.step() <= geometry.width;

        match (threat_center >= player_center, room_left, room_right) {
            (true, true, _) | (false, true, false) => Some(Direction::Left),
            (false, _, true) | (true, false, true) => Some(Direction::Right),
            _ => None,
        }
    }
}
