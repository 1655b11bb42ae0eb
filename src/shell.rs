//! Game picker
//!
//! Holds whichever game is mounted and routes keyboard input to it. Key
//! routing is an explicit subscription created on mount and dropped on
//! unmount, so nothing reacts to keys while the menu is showing.

use crate::highscores::HighScores;
use crate::input::Key;
use crate::puzzle::{GridSize, PuzzleGame};
use crate::racing::RacingSession;
use crate::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameKind {
    Racing,
    Puzzle,
}

impl GameKind {
    pub fn title(&self) -> &'static str {
        match self {
            GameKind::Racing => "Car Racing",
            GameKind::Puzzle => "Sliding Puzzle",
        }
    }
}

/// What is currently mounted
#[derive(Debug)]
pub enum Screen {
    Menu,
    Racing(RacingSession),
    Puzzle(PuzzleGame),
}

impl Screen {
    pub fn kind(&self) -> Option<GameKind> {
        match self {
            Screen::Menu => None,
            Screen::Racing(_) => Some(GameKind::Racing),
            Screen::Puzzle(_) => Some(GameKind::Puzzle),
        }
    }
}

/// Token for the active keyboard route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeySubscription(u64);

impl KeySubscription {
    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
pub struct Shell {
    screen: Screen,
    settings: Settings,
    /// Leaderboard while no race is mounted
    high_scores: HighScores,
    subscription: Option<KeySubscription>,
    next_subscription: u64,
    seed: u64,
    mounts: u64,
}

impl Shell {
    pub fn new(settings: Settings, seed: u64) -> Self {
        Self {
            screen: Screen::Menu,
            settings,
            high_scores: HighScores::new(),
            subscription: None,
            next_subscription: 1,
            seed,
            mounts: 0,
        }
    }

    /// Mount a game, replacing whatever was there
    pub fn open(&mut self, kind: GameKind) -> KeySubscription {
        self.unmount();

        self.mounts += 1;
        let seed = self.seed.wrapping_add(self.mounts);
        self.screen = match kind {
            GameKind::Racing => Screen::Racing(RacingSession::new(
                seed,
                self.settings.collision_timing,
                std::mem::take(&mut self.high_scores),
            )),
            GameKind::Puzzle => Screen::Puzzle(PuzzleGame::new(
                self.settings.puzzle_size,
                self.settings.shuffle,
                seed,
            )),
        };

        let subscription = KeySubscription(self.next_subscription);
        self.next_subscription += 1;
        self.subscription = Some(subscription);
        log::info!("Opened {} (seed {})", kind.title(), seed);
        subscription
    }

    pub fn back_to_menu(&mut self) {
        self.unmount();
        log::info!("Back to menu");
    }

    /// Tear down the mounted game and drop its key route
    fn unmount(&mut self) {
        self.subscription = None;
        match std::mem::replace(&mut self.screen, Screen::Menu) {
            Screen::Racing(session) => {
                self.high_scores = session.into_high_scores();
            }
            Screen::Puzzle(_) | Screen::Menu => {}
        }
    }

    /// Route a key to the mounted game. Returns true if it was used.
    pub fn dispatch_key(&mut self, key: Key) -> bool {
        if self.subscription.is_none() {
            return false;
        }
        match &mut self.screen {
            Screen::Racing(session) => session.handle_key(key),
            Screen::Puzzle(game) => game.handle_key(key),
            Screen::Menu => false,
        }
    }

    /// Change the puzzle size, regenerating the mounted board if any
    pub fn set_puzzle_size(&mut self, size: GridSize) {
        self.settings.puzzle_size = size;
        if let Screen::Puzzle(game) = &mut self.screen {
            game.set_size(size);
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn racing_mut(&mut self) -> Option<&mut RacingSession> {
        match &mut self.screen {
            Screen::Racing(session) => Some(session),
            _ => None,
        }
    }

    pub fn puzzle_mut(&mut self) -> Option<&mut PuzzleGame> {
        match &mut self.screen {
            Screen::Puzzle(game) => Some(game),
            _ => None,
        }
    }

    pub fn subscription(&self) -> Option<KeySubscription> {
        self.subscription
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Session best, wherever the leaderboard currently lives
    pub fn best_score(&self) -> u64 {
        match &self.screen {
            Screen::Racing(session) => session.best_score(),
            _ => self.high_scores.best(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::ShuffleMode;
    use crate::racing::{Obstacle, RacePhase};

    fn shell() -> Shell {
        Shell::new(Settings::default(), 100)
    }

    #[test]
    fn test_menu_ignores_keys() {
        let mut shell = shell();
        assert!(shell.screen().kind().is_none());
        assert!(shell.subscription().is_none());
        assert!(!shell.dispatch_key(Key::ArrowLeft));
    }

    #[test]
    fn test_open_subscribes_and_back_unsubscribes() {
        let mut shell = shell();
        let first = shell.open(GameKind::Puzzle);
        assert_eq!(shell.subscription(), Some(first));
        assert_eq!(shell.screen().kind(), Some(GameKind::Puzzle));

        let second = shell.open(GameKind::Racing);
        assert_ne!(first, second);
        assert_eq!(shell.screen().kind(), Some(GameKind::Racing));

        shell.back_to_menu();
        assert!(shell.subscription().is_none());
        assert!(shell.screen().kind().is_none());
    }

    #[test]
    fn test_keys_reach_racing() {
        let mut shell = shell();
        shell.open(GameKind::Racing);
        // Not started yet
        assert!(!shell.dispatch_key(Key::ArrowRight));

        shell.racing_mut().unwrap().start();
        assert!(shell.dispatch_key(Key::ArrowRight));
        let player = shell.racing_mut().unwrap().state().player;
        assert_eq!(player, 55.0);
    }

    #[test]
    fn test_leaving_race_stops_it_and_keeps_best() {
        let mut shell = shell();
        shell.open(GameKind::Racing);
        {
            let session = shell.racing_mut().unwrap();
            session.start();
            session.state_mut().last_spawn_ms = Some(0.0);
            session.state_mut().score = 64;
            session.state_mut().obstacles.push(Obstacle { id: 1, left: 50.0, top: 70.0 });
            session.frame(1.0);
            assert_eq!(session.state().phase, RacePhase::GameOver);
        }
        assert_eq!(shell.best_score(), 64);

        shell.open(GameKind::Puzzle);
        assert_eq!(shell.best_score(), 64);

        shell.open(GameKind::Racing);
        assert_eq!(shell.best_score(), 64);

        // Abandoning a race doesn't touch the best
        let session = shell.racing_mut().unwrap();
        session.start();
        session.drain_events();
        shell.back_to_menu();
        assert_eq!(shell.best_score(), 64);
    }

    #[test]
    fn test_puzzle_uses_settings() {
        let settings = Settings {
            puzzle_size: GridSize::Four,
            shuffle: ShuffleMode::Solvable,
            ..Settings::default()
        };
        let mut shell = Shell::new(settings, 5);
        shell.open(GameKind::Puzzle);
        let game = shell.puzzle_mut().unwrap();
        assert_eq!(game.size(), GridSize::Four);
        assert!(game.board().is_solvable());

        shell.set_puzzle_size(GridSize::Five);
        assert_eq!(shell.puzzle_mut().unwrap().board().len(), 25);
        assert_eq!(shell.settings().puzzle_size, GridSize::Five);
    }

    #[test]
    fn test_keys_reach_puzzle() {
        let settings = Settings {
            shuffle: ShuffleMode::Solvable,
            ..Settings::default()
        };
        let mut shell = Shell::new(settings, 100);
        shell.open(GameKind::Puzzle);
        let moved = [Key::ArrowUp, Key::ArrowDown, Key::ArrowLeft, Key::ArrowRight]
            .into_iter()
            .filter(|&k| shell.dispatch_key(k))
            .count();
        assert!(moved > 0);
        assert_eq!(shell.puzzle_mut().unwrap().moves() as usize, moved);
    }
}
