//! ASCII renderer for terminals and logs

use std::fmt::Write;

use glam::Vec2;

use super::{FrameSnapshot, Renderer};

/// Rasterises frames into a coarse character grid
#[derive(Debug, Clone)]
pub struct TextRenderer {
    cols: usize,
    rows: usize,
    frame: String,
    frames_drawn: u64,
}

impl TextRenderer {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols: cols.max(1),
            rows: rows.max(1),
            frame: String::new(),
            frames_drawn: 0,
        }
    }

    /// Most recent frame (grid plus a status line)
    pub fn last_frame(&self) -> &str {
        &self.frame
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    fn cell(&self, pos: Vec2, width: f32, height: f32) -> Option<(usize, usize)> {
        if pos.x < 0.0 || pos.y < 0.0 || pos.x > width || pos.y > height {
            return None;
        }
        let col = ((pos.x / width) * self.cols as f32) as usize;
        let row = ((pos.y / height) * self.rows as f32) as usize;
        Some((col.min(self.cols - 1), row.min(self.rows - 1)))
    }
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new(80, 30)
    }
}

impl Renderer for TextRenderer {
    fn draw(&mut self, frame: &FrameSnapshot<'_>) {
        let mut grid = vec![vec![' '; self.cols]; self.rows];

        // Later layers win: bullets under ships
        let layers = [
            (frame.enemy_bullets.iter().map(|b| b.pos).collect::<Vec<_>>(), '*'),
            (frame.player_bullets.iter().map(|b| b.pos).collect(), '|'),
            (frame.enemies.iter().map(|e| e.pos).collect(), 'W'),
            (vec![frame.player.pos], 'A'),
        ];
        for (positions, glyph) in &layers {
            for &pos in positions {
                if let Some((col, row)) = self.cell(pos, frame.width, frame.height) {
                    grid[row][col] = *glyph;
                }
            }
        }

        self.frame.clear();
        let border = "-".repeat(self.cols);
        let _ = writeln!(self.frame, "+{border}+");
        for row in &grid {
            let line: String = row.iter().collect();
            let _ = writeln!(self.frame, "|{line}|");
        }
        let _ = writeln!(self.frame, "+{border}+");
        let _ = write!(
            self.frame,
            "{:?}  score {}  lives {}  enemies {}  t {:.1}s",
            frame.phase,
            frame.score,
            frame.lives,
            frame.enemies.len(),
            frame.elapsed_ms / 1000.0
        );
        self.frames_drawn += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GameState;
    use crate::tuning::Tuning;

    #[test]
    fn test_draws_player_and_enemies() {
        let state = GameState::new(Tuning::default(), 11, 0.0);
        let mut renderer = TextRenderer::new(40, 15);
        renderer.draw(&FrameSnapshot::of(&state, 2_500.0));

        let frame = renderer.last_frame();
        assert_eq!(frame.matches('A').count(), 1);
        assert!(frame.contains('W'));
        assert!(frame.contains("score 0"));
        assert!(frame.contains("t 2.5s"));
        assert_eq!(renderer.frames_drawn(), 1);
        // border + rows + border + status
        assert_eq!(frame.lines().count(), 15 + 3);
    }

    #[test]
    fn test_off_field_positions_are_skipped() {
        let renderer = TextRenderer::new(10, 10);
        assert_eq!(renderer.cell(Vec2::new(-5.0, 10.0), 100.0, 100.0), None);
        assert_eq!(renderer.cell(Vec2::new(100.0, 100.0), 100.0, 100.0), Some((9, 9)));
    }
}
