//! Round lifecycle, timer and score
//!
//! Intro -> Pending (start delay) -> Active -> Ended. A new start request is
//! accepted from Intro or Ended; requests while Pending or Active are ignored.

use serde::{Deserialize, Serialize};

use crate::display_seconds;
use crate::hud::{Hud, Panel};
use crate::settings::SessionSettings;

/// Current phase of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Waiting for the player to start
    Intro,
    /// Start requested, waiting out the delay
    Pending,
    /// Round running
    Active,
    /// Timer expired
    Ended,
}

/// Elapsed active play time, read by everything that ramps difficulty
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DifficultyClock {
    elapsed: f32,
}

impl DifficultyClock {
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt;
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }
}

/// Game/score controller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub phase: SessionPhase,
    pub clock: DifficultyClock,
    /// Seconds left in the round
    pub remaining: f32,
    pub score: i64,
    /// Rounds started so far
    pub rounds_played: u32,
    duration: f32,
    start_delay: f32,
}

impl Session {
    pub fn new(settings: &SessionSettings) -> Self {
        Self {
            phase: SessionPhase::Intro,
            clock: DifficultyClock::default(),
            remaining: settings.game_duration,
            score: 0,
            rounds_played: 0,
            duration: settings.game_duration,
            start_delay: settings.start_delay,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.phase == SessionPhase::Active
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.clock.elapsed()
    }

    pub fn start_delay(&self) -> f32 {
        self.start_delay
    }

    /// Handle a start request.
    ///
    /// Returns `true` when the request was accepted and the caller should
    /// schedule [`Session::begin_round`] after [`Session::start_delay`].
    pub fn request_start(&mut self) -> bool {
        match self.phase {
            SessionPhase::Intro | SessionPhase::Ended => {
                self.phase = SessionPhase::Pending;
                log::info!("Game starting in {} seconds...", self.start_delay);
                true
            }
            SessionPhase::Pending | SessionPhase::Active => false,
        }
    }

    /// Go live once the start delay has elapsed
    pub fn begin_round(&mut self, hud: &mut dyn Hud) {
        if self.phase != SessionPhase::Pending {
            return;
        }
        hud.set_panel_visible(Panel::Intro, false);
        hud.set_panel_visible(Panel::EndMenu, false);
        hud.set_panel_visible(Panel::ScoreCard, true);

        self.phase = SessionPhase::Active;
        self.remaining = self.duration;
        self.score = 0;
        self.rounds_played += 1;
        self.update_score(0, hud);
        hud.show_timer(display_seconds(self.remaining));

        log::info!("Game started (round {})", self.rounds_played);
    }

    /// Count the timer down and the clock up. Ends the round on expiry.
    pub fn update(&mut self, dt: f32, hud: &mut dyn Hud) {
        if !self.is_active() {
            return;
        }
        self.remaining -= dt;
        hud.show_timer(display_seconds(self.remaining));
        self.clock.advance(dt);

        if self.remaining <= 0.0 {
            self.end_round(hud);
        }
    }

    /// The only score mutator
    pub fn update_score(&mut self, delta: i64, hud: &mut dyn Hud) {
        self.score += delta;
        hud.show_score(self.score);
    }

    fn end_round(&mut self, hud: &mut dyn Hud) {
        self.phase = SessionPhase::Ended;
        hud.set_panel_visible(Panel::ScoreCard, false);
        hud.set_panel_visible(Panel::EndMenu, true);
        hud.show_final_score(self.score);
        self.clock.reset();

        log::info!("Game over! Final score: {}", self.score);
    }
}
