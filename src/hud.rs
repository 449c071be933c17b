//! HUD surfaces written by the simulation
//!
//! The host owns the actual text widgets and panels; the simulation only
//! pushes values through [`Hud`] and never reads anything back.

/// Toggleable panels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    /// Title/instructions shown before the first round
    Intro,
    /// Live timer and score
    ScoreCard,
    /// Final score after the timer runs out
    EndMenu,
}

/// One-way HUD output
pub trait Hud {
    /// Remaining round time, already ceiling-rounded to whole seconds
    fn show_timer(&mut self, seconds: i32);
    /// Running score
    fn show_score(&mut self, score: i64);
    /// Score shown on the end-of-round panel
    fn show_final_score(&mut self, score: i64);
    /// Show or hide a panel
    fn set_panel_visible(&mut self, panel: Panel, visible: bool);
}

/// HUD that formats the values into display strings
#[derive(Debug, Clone)]
pub struct TextHud {
    pub timer_text: String,
    pub score_text: String,
    pub final_score_text: String,
    pub intro_visible: bool,
    pub score_card_visible: bool,
    pub end_menu_visible: bool,
}

impl Default for TextHud {
    fn default() -> Self {
        Self {
            timer_text: String::new(),
            score_text: String::new(),
            final_score_text: String::new(),
            intro_visible: true,
            score_card_visible: false,
            end_menu_visible: false,
        }
    }
}

impl TextHud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self, panel: Panel) -> bool {
        match panel {
            Panel::Intro => self.intro_visible,
            Panel::ScoreCard => self.score_card_visible,
            Panel::EndMenu => self.end_menu_visible,
        }
    }
}

impl Hud for TextHud {
    fn show_timer(&mut self, seconds: i32) {
        self.timer_text = format!("Time: {seconds}");
    }

    fn show_score(&mut self, score: i64) {
        self.score_text = format!("Score: {score}");
    }

    fn show_final_score(&mut self, score: i64) {
        self.final_score_text = format!("Game Over! Final Score: {score}");
    }

    fn set_panel_visible(&mut self, panel: Panel, visible: bool) {
        match panel {
            Panel::Intro => self.intro_visible = visible,
            Panel::ScoreCard => self.score_card_visible = visible,
            Panel::EndMenu => self.end_menu_visible = visible,
        }
    }
}
