//! One mounted racing game
//!
//! Owns the race, the hold timer, whether another frame is wanted, and the
//! leaderboard. Hosts drive it with `frame` from their display callback and
//! only reschedule while [`RacingSession::wants_frame`] is true.

use super::hold::HoldRepeat;
use super::state::{CollisionTiming, RacePhase, RaceState, Steer};
use super::tick::{TickOutcome, tick};
use crate::highscores::HighScores;
use crate::input::Key;

/// Things the host should react to (sound, HUD)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RaceEvent {
    /// Race began; engine loop on
    Started,
    /// Speed increased
    SpeedUp { speed: f32 },
    /// Race ended in a crash; engine off, crash cue
    Crashed { score: u64, new_best: bool },
    /// Session torn down mid-race; engine off
    Stopped,
}

#[derive(Debug)]
pub struct RacingSession {
    state: RaceState,
    hold: HoldRepeat,
    high_scores: HighScores,
    /// Leaderboard place of the last finished race
    last_place: Option<usize>,
    frame_requested: bool,
    events: Vec<RaceEvent>,
}

impl RacingSession {
    pub fn new(seed: u64, collision_timing: CollisionTiming, high_scores: HighScores) -> Self {
        Self {
            state: RaceState::new(seed, collision_timing),
            hold: HoldRepeat::new(),
            high_scores,
            last_place: None,
            frame_requested: false,
            events: Vec::new(),
        }
    }

    /// Start a race (also used for "play again")
    pub fn start(&mut self) {
        self.state.begin();
        self.hold.release();
        self.last_place = None;
        self.frame_requested = true;
        self.events.push(RaceEvent::Started);
        log::info!("Race started (seed {})", self.state.seed);
    }

    pub fn restart(&mut self) {
        self.start();
    }

    /// Run one display frame. Hosts call this from their frame callback.
    pub fn frame(&mut self, now_ms: f64) -> TickOutcome {
        if !self.frame_requested {
            return TickOutcome::Idle;
        }
        self.frame_requested = false;

        let outcome = tick(&mut self.state, now_ms);
        match outcome {
            TickOutcome::Advanced { sped_up } => {
                if sped_up {
                    log::debug!("Speed up to {:.1}", self.state.speed);
                    self.events.push(RaceEvent::SpeedUp {
                        speed: self.state.speed,
                    });
                }
                self.frame_requested = true;
            }
            TickOutcome::Crashed { obstacle_id } => {
                self.hold.release();
                let score = self.state.score;
                let previous_best = self.high_scores.best();
                self.last_place = self.high_scores.record(score, self.state.speed);
                let new_best = score > previous_best;
                log::info!(
                    "Crashed into obstacle {} with score {} (place {:?}, best {})",
                    obstacle_id,
                    score,
                    self.last_place,
                    self.high_scores.best()
                );
                self.events.push(RaceEvent::Crashed { score, new_best });
            }
            TickOutcome::Idle => {}
        }
        outcome
    }

    /// True while the host should schedule another frame
    pub fn wants_frame(&self) -> bool {
        self.frame_requested
    }

    /// One steering step; ignored unless racing
    pub fn steer(&mut self, steer: Steer) {
        if self.state.is_running() {
            self.state.steer(steer);
        }
    }

    /// Keyboard input. Returns true if the key was used.
    pub fn handle_key(&mut self, key: Key) -> bool {
        if !self.state.is_running() {
            return false;
        }
        match key {
            Key::ArrowLeft => self.state.steer(Steer::Left),
            Key::ArrowRight => self.state.steer(Steer::Right),
            _ => return false,
        }
        true
    }

    pub fn press_hold(&mut self, steer: Steer, now_ms: f64) {
        self.hold.press(steer, now_ms);
    }

    pub fn release_hold(&mut self) {
        self.hold.release();
    }

    /// True while a direction button is held; hosts keep their repeat timer
    /// alive only as long as this holds
    pub fn is_holding(&self) -> bool {
        self.hold.held().is_some()
    }

    /// Apply any hold steps due at `now_ms`
    pub fn pump_hold(&mut self, now_ms: f64) {
        if let Some((steer, steps)) = self.hold.pump(now_ms) {
            for _ in 0..steps {
                self.steer(steer);
            }
        }
    }

    /// Stop everything the session scheduled. Safe to call repeatedly.
    pub fn teardown(&mut self) {
        self.frame_requested = false;
        self.hold.release();
        if self.state.is_running() {
            self.state.phase = RacePhase::Idle;
            self.events.push(RaceEvent::Stopped);
            log::info!("Race abandoned at score {}", self.state.score);
        }
    }

    /// Take pending events
    pub fn drain_events(&mut self) -> Vec<RaceEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn state(&self) -> &RaceState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut RaceState {
        &mut self.state
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    /// Where the last finished race landed on the leaderboard
    pub fn last_place(&self) -> Option<usize> {
        self.last_place
    }

    pub fn best_score(&self) -> u64 {
        self.high_scores.best()
    }

    /// Hand the leaderboard back when the session is unmounted
    pub fn into_high_scores(mut self) -> HighScores {
        self.teardown();
        self.high_scores
    }
}
