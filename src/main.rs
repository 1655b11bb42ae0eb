//! Pocket Arcade entry point
//!
//! Handles platform-specific initialization and runs the games.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        Document, Element, HtmlElement, HtmlSelectElement, KeyboardEvent, MouseEvent, TouchEvent,
        UrlSearchParams,
    };

    use pocket_arcade::audio::AudioManager;
    use pocket_arcade::input::Key;
    use pocket_arcade::puzzle::{GridSize, SwipeTracker};
    use pocket_arcade::racing::{RacePhase, Steer};
    use pocket_arcade::{GameKind, Settings, Shell};

    type KeyListener = Closure<dyn FnMut(KeyboardEvent)>;

    /// App instance holding all state
    struct App {
        shell: Shell,
        audio: AudioManager,
        swipe: SwipeTracker,
        /// Window keydown listener, present only while a game is mounted
        key_listener: Option<KeyListener>,
        /// Press-and-hold repeat timer
        hold_interval: Option<i32>,
        /// A frame callback is queued
        frame_pending: bool,
    }

    impl App {
        fn new(settings: Settings, seed: u64) -> Self {
            let mut audio = AudioManager::new();
            audio.set_master_volume(settings.master_volume);
            audio.set_muted(settings.muted);
            Self {
                shell: Shell::new(settings, seed),
                audio,
                swipe: SwipeTracker::new(),
                key_listener: None,
                hold_interval: None,
                frame_pending: false,
            }
        }

        /// Forward race events to the speakers
        fn pump_audio(&mut self) {
            if let Some(session) = self.shell.racing_mut() {
                for event in session.drain_events() {
                    self.audio.handle(event);
                }
            }
        }

        fn clear_hold_interval(&mut self) {
            if let Some(handle) = self.hold_interval.take() {
                window().clear_interval_with_handle(handle);
            }
        }
    }

    fn window() -> web_sys::Window {
        web_sys::window().expect("no window")
    }

    fn document() -> Document {
        window().document().expect("no document")
    }

    fn now_ms() -> f64 {
        window().performance().map(|p| p.now()).unwrap_or_else(js_sys::Date::now)
    }

    fn by_id(id: &str) -> Option<Element> {
        document().get_element_by_id(id)
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(id: &str, visible: bool) {
        if let Some(el) = by_id(id) {
            let classes = el.class_list();
            let _ = if visible {
                classes.remove_1("hidden")
            } else {
                classes.add_1("hidden")
            };
        }
    }

    fn on_click(id: &str, handler: impl FnMut(MouseEvent) + 'static) {
        if let Some(el) = by_id(id) {
            let closure = Closure::<dyn FnMut(MouseEvent)>::new(handler);
            let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Decoded `(key, value)` pairs of a `?a=1&b=2` query string
    fn query_pairs(search: &str) -> Vec<(String, String)> {
        let Ok(params) = UrlSearchParams::new_with_str(search) else {
            return Vec::new();
        };
        let Ok(Some(entries)) = js_sys::try_iter(&params) else {
            return Vec::new();
        };
        entries
            .flatten()
            .filter_map(|entry| {
                let pair = js_sys::Array::from(&entry);
                Some((pair.get(0).as_string()?, pair.get(1).as_string()?))
            })
            .collect()
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Pocket Arcade starting...");

        let search = window().location().search().unwrap_or_default();
        let settings = Settings::from_pairs(query_pairs(&search)).unwrap_or_else(|e| {
            log::warn!("{} - using default settings", e);
            Settings::default()
        });
        let seed = settings.seed_or(js_sys::Date::now() as u64);
        let app = Rc::new(RefCell::new(App::new(settings, seed)));

        log::info!("Initialized with seed: {}", seed);

        if let Some(loading) = by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        setup_menu(app.clone());
        setup_racing(app.clone());
        setup_puzzle(app.clone());
        show_screen(&app.borrow().shell);

        log::info!("Pocket Arcade running!");
    }

    // === Shell ===

    fn setup_menu(app: Rc<RefCell<App>>) {
        let games = [("open-racing", GameKind::Racing), ("open-puzzle", GameKind::Puzzle)];
        for (id, kind) in games {
            let app = app.clone();
            on_click(id, move |_| open_game(&app, kind));
        }
        for id in ["racing-back", "puzzle-back"] {
            let app = app.clone();
            on_click(id, move |_| close_game(&app));
        }
    }

    fn open_game(app: &Rc<RefCell<App>>, kind: GameKind) {
        close_game(app);

        let listener = {
            let app = app.clone();
            Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = Key::from_key_name(&event.key());
                let mut a = app.borrow_mut();
                if a.shell.dispatch_key(key) {
                    event.prevent_default();
                    render(&mut a.shell);
                }
            })
        };
        let _ = window()
            .add_event_listener_with_callback("keydown", listener.as_ref().unchecked_ref());

        let mut a = app.borrow_mut();
        let subscription = a.shell.open(kind);
        log::debug!("Key route {} attached", subscription.id());
        a.key_listener = Some(listener);
        show_screen(&a.shell);
        render(&mut a.shell);
    }

    fn close_game(app: &Rc<RefCell<App>>) {
        let mut a = app.borrow_mut();
        if let Some(listener) = a.key_listener.take() {
            let _ = window()
                .remove_event_listener_with_callback("keydown", listener.as_ref().unchecked_ref());
        }
        a.clear_hold_interval();
        if let Some(session) = a.shell.racing_mut() {
            session.teardown();
        }
        a.pump_audio();
        if a.shell.screen().kind().is_some() {
            a.shell.back_to_menu();
        }
        show_screen(&a.shell);
    }

    fn show_screen(shell: &Shell) {
        let kind = shell.screen().kind();
        set_visible("menu", kind.is_none());
        set_visible("racing", kind == Some(GameKind::Racing));
        set_visible("puzzle", kind == Some(GameKind::Puzzle));
    }

    fn render(shell: &mut Shell) {
        let best = shell.best_score();
        match shell.screen().kind() {
            Some(GameKind::Racing) => render_racing(shell, best),
            Some(GameKind::Puzzle) => render_puzzle(shell),
            None => {}
        }
    }

    // === Racing ===

    fn setup_racing(app: Rc<RefCell<App>>) {
        {
            let app = app.clone();
            on_click("start-btn", move |_| {
                {
                    let mut a = app.borrow_mut();
                    a.clear_hold_interval();
                    let Some(session) = a.shell.racing_mut() else { return };
                    session.start();
                    a.pump_audio();
                }
                request_frame(&app);
            });
        }

        // Repeat timer shared by both buttons
        let hold_tick: Rc<Closure<dyn FnMut()>> = {
            let app = app.clone();
            Rc::new(Closure::<dyn FnMut()>::new(move || {
                let mut a = app.borrow_mut();
                let holding = match a.shell.racing_mut() {
                    Some(session) => {
                        session.pump_hold(now_ms());
                        session.is_holding()
                    }
                    None => false,
                };
                if !holding {
                    a.clear_hold_interval();
                }
                render(&mut a.shell);
            }))
        };

        for (id, steer) in [("left-btn", Steer::Left), ("right-btn", Steer::Right)] {
            let Some(button) = by_id(id) else { continue };

            let press = {
                let app = app.clone();
                let hold_tick = hold_tick.clone();
                move || {
                    let mut a = app.borrow_mut();
                    a.clear_hold_interval();
                    let Some(session) = a.shell.racing_mut() else { return };
                    session.press_hold(steer, now_ms());
                    let tick_fn: &js_sys::Function = (*hold_tick).as_ref().unchecked_ref();
                    a.hold_interval = window()
                        .set_interval_with_callback_and_timeout_and_arguments_0(
                            tick_fn,
                            pocket_arcade::consts::HOLD_PERIOD_MS as i32,
                        )
                        .ok();
                }
            };
            let release = {
                let app = app.clone();
                move || {
                    let mut a = app.borrow_mut();
                    a.clear_hold_interval();
                    if let Some(session) = a.shell.racing_mut() {
                        session.release_hold();
                    }
                }
            };

            for event in ["mousedown", "touchstart"] {
                let press = press.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |e: web_sys::Event| {
                    e.prevent_default();
                    press();
                });
                let _ = button
                    .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
                closure.forget();
            }
            for event in ["mouseup", "mouseleave", "touchend", "touchcancel"] {
                let release = release.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_e: web_sys::Event| release());
                let _ = button
                    .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn request_frame(app: &Rc<RefCell<App>>) {
        {
            let mut a = app.borrow_mut();
            if a.frame_pending {
                return;
            }
            a.frame_pending = true;
        }
        let app = app.clone();
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window().request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        let again = {
            let mut a = app.borrow_mut();
            a.frame_pending = false;
            let again = match a.shell.racing_mut() {
                Some(session) => {
                    session.frame(time);
                    session.wants_frame()
                }
                None => false,
            };
            if !again {
                a.clear_hold_interval();
            }
            a.pump_audio();
            render(&mut a.shell);
            again
        };

        if again {
            request_frame(&app);
        }
    }

    fn render_racing(shell: &mut Shell, best: u64) {
        let Some(session) = shell.racing_mut() else { return };
        let state = session.state();

        set_text("score", &state.score.to_string());
        set_text("best", &best.to_string());

        let running = state.phase == RacePhase::Running;
        set_visible("race-menu", !running);
        set_visible("track-cars", running);
        match state.phase {
            RacePhase::GameOver => {
                let result = match session.last_place() {
                    Some(1) => format!("New High Score! Score: {}", state.score),
                    Some(place) => format!("Game Over! Score: {} (#{})", state.score, place),
                    None => format!("Game Over! Score: {}", state.score),
                };
                set_text("race-result", &result);
                set_text("start-btn", "Play Again");
            }
            _ => {
                set_text("race-result", "");
                set_text("start-btn", "Start Race");
            }
        }
        set_visible("leaderboard", state.phase == RacePhase::GameOver);
        if let Some(list) = by_id("leaderboard") {
            let html: String = session
                .high_scores()
                .entries()
                .iter()
                .map(|e| {
                    format!("<li>{} <small>(top speed {:.1})</small></li>", e.score, e.top_speed)
                })
                .collect();
            list.set_inner_html(&html);
        }

        if let Some(player) = by_id("player").and_then(|el| el.dyn_into::<HtmlElement>().ok()) {
            let _ = player.style().set_property("left", &format!("{}%", state.player));
        }

        // Solid placeholders stand in for car sprites
        if let Some(track) = by_id("obstacles") {
            let html: String = state
                .obstacles
                .iter()
                .map(|o| {
                    format!(
                        r#"<div class="car enemy" style="left:{:.2}%;top:{:.2}%"></div>"#,
                        o.left, o.top
                    )
                })
                .collect();
            track.set_inner_html(&html);
        }
    }

    // === Puzzle ===

    fn setup_puzzle(app: Rc<RefCell<App>>) {
        {
            let app = app.clone();
            on_click("reset-btn", move |_| {
                let mut a = app.borrow_mut();
                if let Some(game) = a.shell.puzzle_mut() {
                    game.reset();
                }
                render(&mut a.shell);
            });
        }

        let select = by_id("size-select").and_then(|el| el.dyn_into::<HtmlSelectElement>().ok());
        if let Some(select) = select {
            select.set_inner_html(
                &GridSize::ALL
                    .iter()
                    .map(|s| format!(r#"<option value="{}">{}</option>"#, s.side(), s.label()))
                    .collect::<String>(),
            );
            select.set_value(&app.borrow().shell.settings().puzzle_size.side().to_string());

            let app = app.clone();
            let target = select.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_e: web_sys::Event| {
                let Some(size) = target.value().parse().ok().and_then(GridSize::from_side) else {
                    return;
                };
                let mut a = app.borrow_mut();
                a.shell.set_puzzle_size(size);
                render(&mut a.shell);
            });
            let _ = select
                .add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let Some(board) = by_id("board") else { return };
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |e: TouchEvent| {
                if let Some(touch) = e.changed_touches().get(0) {
                    let point = Vec2::new(touch.client_x() as f32, touch.client_y() as f32);
                    app.borrow_mut().swipe.begin(point);
                }
            });
            let _ = board
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |e: TouchEvent| {
                let Some(touch) = e.changed_touches().get(0) else { return };
                let point = Vec2::new(touch.client_x() as f32, touch.client_y() as f32);
                let mut a = app.borrow_mut();
                if let Some(direction) = a.swipe.end(point) {
                    if let Some(game) = a.shell.puzzle_mut() {
                        game.move_blank(direction);
                    }
                    render(&mut a.shell);
                }
            });
            let _ = board
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_e: TouchEvent| {
                app.borrow_mut().swipe.cancel();
            });
            let _ = board
                .add_event_listener_with_callback("touchcancel", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn render_puzzle(shell: &mut Shell) {
        let Some(game) = shell.puzzle_mut() else { return };
        let board = game.board();
        let side = board.side();

        if let Some(el) = by_id("board").and_then(|el| el.dyn_into::<HtmlElement>().ok()) {
            let _ = el
                .style()
                .set_property("grid-template-columns", &format!("repeat({}, 80px)", side));
            let html: String = board
                .cells()
                .iter()
                .map(|&v| match v {
                    0 => r#"<div class="tile empty"></div>"#.to_string(),
                    n => format!(r#"<div class="tile">{}</div>"#, n),
                })
                .collect();
            el.set_inner_html(&html);
        }

        set_text("moves", &format!("Moves: {}", game.moves()));
        set_visible("solved", game.is_solved());
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    let cli = cli::Cli::parse();
    env_logger::init();
    log::info!("Pocket Arcade (native) starting...");
    log::info!("Native mode runs a headless demo - run with `trunk serve` for the web version");

    let settings = match cli.settings() {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(2);
        }
    };

    let summary = demo::run(settings);
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to encode summary: {}", e),
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use clap::Parser;
    use pocket_arcade::{Settings, SettingsError};

    #[derive(Parser, Debug)]
    #[command(
        name = "pocket-arcade",
        version,
        about = "Headless demo: an autopilot race and random puzzle moves, printed as JSON"
    )]
    pub struct Cli {
        /// Puzzle board side (3, 4 or 5)
        #[arg(long)]
        pub size: Option<usize>,
        /// How puzzle boards are scrambled
        #[arg(long, value_parser = ["naive", "solvable"])]
        pub shuffle: Option<String>,
        /// Which obstacle positions the collision test sees
        #[arg(long, value_parser = ["lagged", "current"])]
        pub collision: Option<String>,
        /// Master volume (0.0 - 1.0)
        #[arg(long)]
        pub volume: Option<f32>,
        #[arg(long)]
        pub muted: bool,
        /// Fixed RNG seed; defaults to the clock
        #[arg(long)]
        pub seed: Option<u64>,
    }

    impl Cli {
        /// Validate through the same path as the browser's query string
        pub fn settings(&self) -> Result<Settings, SettingsError> {
            let mut pairs: Vec<(&str, String)> = Vec::new();
            if let Some(size) = self.size {
                pairs.push(("size", size.to_string()));
            }
            if let Some(shuffle) = &self.shuffle {
                pairs.push(("shuffle", shuffle.clone()));
            }
            if let Some(collision) = &self.collision {
                pairs.push(("collision", collision.clone()));
            }
            if let Some(volume) = self.volume {
                pairs.push(("volume", volume.to_string()));
            }
            if self.muted {
                pairs.push(("muted", "true".to_string()));
            }
            if let Some(seed) = self.seed {
                pairs.push(("seed", seed.to_string()));
            }
            Settings::from_pairs(pairs)
        }
    }

    #[cfg(test)]
    mod tests {
        use clap::error::ErrorKind;
        use pocket_arcade::puzzle::{GridSize, ShuffleMode};
        use pocket_arcade::racing::CollisionTiming;

        use super::*;

        fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
            Cli::try_parse_from(std::iter::once("pocket-arcade").chain(args.iter().copied()))
        }

        #[test]
        fn test_no_flags_is_default() {
            let settings = parse(&[]).unwrap().settings().unwrap();
            assert_eq!(settings, Settings::default());
        }

        #[test]
        fn test_flags_fill_settings() {
            let cli = parse(&[
                "--seed",
                "7",
                "--size",
                "4",
                "--shuffle",
                "solvable",
                "--collision",
                "current",
                "--volume",
                "0.5",
                "--muted",
            ])
            .unwrap();
            let settings = cli.settings().unwrap();
            assert_eq!(settings.seed, Some(7));
            assert_eq!(settings.puzzle_size, GridSize::Four);
            assert_eq!(settings.shuffle, ShuffleMode::Solvable);
            assert_eq!(settings.collision_timing, CollisionTiming::Current);
            assert_eq!(settings.master_volume, 0.5);
            assert!(settings.muted);
        }

        #[test]
        fn test_equals_form_and_ampersands() {
            let cli = parse(&["--seed=7"]).unwrap();
            assert_eq!(cli.settings().unwrap().seed, Some(7));
            assert!(parse(&["--shuffle", "naive&size=4"]).is_err());
        }

        #[test]
        fn test_help_and_version_are_not_settings_errors() {
            assert_eq!(parse(&["--help"]).unwrap_err().kind(), ErrorKind::DisplayHelp);
            assert_eq!(parse(&["--version"]).unwrap_err().kind(), ErrorKind::DisplayVersion);
        }

        #[test]
        fn test_bad_values() {
            assert!(parse(&["--seed", "seven"]).is_err());
            assert!(parse(&["--theme", "dark"]).is_err());
            // Parses as a number but no such board
            let cli = parse(&["--size", "6"]).unwrap();
            assert_eq!(
                cli.settings(),
                Err(SettingsError::InvalidValue {
                    key: "size".into(),
                    value: "6".into()
                })
            );
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::time::{SystemTime, UNIX_EPOCH};

    use rand::SeedableRng;
    use rand::seq::IndexedRandom;
    use rand_pcg::Pcg32;
    use serde::Serialize;

    use pocket_arcade::puzzle::{Direction, MoveOutcome};
    use pocket_arcade::racing::{TickOutcome, suggest_steer};
    use pocket_arcade::{GameKind, Settings, Shell};

    /// Display frame length at 60 Hz
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Stop the race after ten simulated minutes
    const MAX_FRAMES: u64 = 60 * 60 * 10;
    const PUZZLE_MOVES: usize = 500;

    #[derive(Debug, Serialize)]
    pub struct DemoSummary {
        pub settings: Settings,
        pub seed: u64,
        pub race_score: u64,
        pub race_top_speed: f32,
        pub race_crashed: bool,
        pub best_score: u64,
        pub puzzle_size: usize,
        pub puzzle_moves: u32,
        pub puzzle_solved: bool,
        pub puzzle_solvable: bool,
    }

    pub fn run(settings: Settings) -> DemoSummary {
        let clock = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        let seed = settings.seed_or(clock);
        log::info!("Demo seed: {}", seed);
        let mut shell = Shell::new(settings.clone(), seed);

        // Race on autopilot until the first crash
        shell.open(GameKind::Racing);
        let mut race_crashed = false;
        let (race_score, race_top_speed) = match shell.racing_mut() {
            Some(session) => {
                session.start();
                let mut frame = 0u64;
                while session.wants_frame() && frame < MAX_FRAMES {
                    if let Some(steer) = suggest_steer(session.state()) {
                        session.steer(steer);
                    }
                    if let TickOutcome::Crashed { .. } = session.frame(frame as f64 * FRAME_MS) {
                        race_crashed = true;
                    }
                    frame += 1;
                }
                (session.state().score, session.state().speed)
            }
            None => (0, 0.0),
        };
        log::info!("Race finished: score {} (crashed: {})", race_score, race_crashed);

        // Random sliding on the puzzle
        shell.open(GameKind::Puzzle);
        let mut rng = Pcg32::seed_from_u64(seed);
        let (puzzle_size, puzzle_moves, puzzle_solved, puzzle_solvable) = match shell.puzzle_mut() {
            Some(game) => {
                let solvable = game.board().is_solvable();
                for _ in 0..PUZZLE_MOVES {
                    let Some(&dir) = Direction::ALL.choose(&mut rng) else { break };
                    if game.move_blank(dir) == MoveOutcome::AlreadySolved {
                        break;
                    }
                }
                (game.board().side(), game.moves(), game.is_solved(), solvable)
            }
            None => (0, 0, false, false),
        };
        let best_score = shell.best_score();
        shell.back_to_menu();

        DemoSummary {
            settings,
            seed,
            race_score,
            race_top_speed,
            race_crashed,
            best_score,
            puzzle_size,
            puzzle_moves,
            puzzle_solved,
            puzzle_solvable,
        }
    }
}
