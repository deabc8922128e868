//! Score display and overlay port

/// Centered message box drawn over the playfield
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    pub title: String,
    pub message: String,
    /// Offer a "continue" action (pause screen only)
    pub show_continue: bool,
}

impl Overlay {
    pub fn paused() -> Self {
        Self {
            title: "PAUSED".to_string(),
            message: "Press P to resume".to_string(),
            show_continue: true,
        }
    }

    pub fn game_over(final_score: u64) -> Self {
        Self {
            title: "GAME OVER".to_string(),
            message: format!("Score: {final_score}"),
            show_continue: false,
        }
    }

    pub fn game_clear(final_score: u64, bonus: u64) -> Self {
        Self {
            title: "GAME CLEAR!".to_string(),
            message: format!("Score: {final_score} (life bonus +{bonus})"),
            show_continue: false,
        }
    }
}

/// Heads-up display. Every method is fire-and-forget.
pub trait Hud {
    fn show_score(&mut self, score: u64);
    fn show_high_scores(&mut self, scores: &[u64]);
    fn show_overlay(&mut self, overlay: &Overlay);
    fn hide_overlay(&mut self);
}

/// HUD that writes to the log
#[derive(Debug, Default)]
pub struct LogHud;

impl Hud for LogHud {
    fn show_score(&mut self, score: u64) {
        log::debug!("score: {}", score);
    }

    fn show_high_scores(&mut self, scores: &[u64]) {
        log::info!("high scores: {:?}", scores);
    }

    fn show_overlay(&mut self, overlay: &Overlay) {
        log::info!("[{}] {}", overlay.title, overlay.message);
    }

    fn hide_overlay(&mut self) {}
}
