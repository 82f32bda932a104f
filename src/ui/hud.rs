//! In-play HUD: the score readout and floating "+1" bubbles.

use crate::color::Rgb;
use crate::constants::SCORE_BUBBLE_MS;
use crate::game::Viewport;
use crate::render::scene::SKY_TOP;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Span,
    widgets::Paragraph,
    Frame,
};
use std::time::Duration;

/// Floating text that rises and fades over [`SCORE_BUBBLE_MS`].
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBubble {
    /// World position where the bubble appeared.
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub age: Duration,
}

impl ScoreBubble {
    pub fn new(x: f64, y: f64, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            text: text.into(),
            age: Duration::ZERO,
        }
    }

    pub fn lifetime() -> Duration {
        Duration::from_millis(SCORE_BUBBLE_MS)
    }

    /// 0 at spawn, 1 at expiry.
    pub fn progress(&self) -> f64 {
        (self.age.as_secs_f64() / Self::lifetime().as_secs_f64()).min(1.0)
    }

    pub fn is_expired(&self) -> bool {
        self.age >= Self::lifetime()
    }
}

/// Age every bubble and drop the expired ones.
pub fn age_bubbles(bubbles: &mut Vec<ScoreBubble>, elapsed: Duration) {
    for bubble in bubbles.iter_mut() {
        bubble.age += elapsed;
    }
    bubbles.retain(|b| !b.is_expired());
}

/// Draw "Score: N" in the top-left corner of the play area.
pub fn render_score(frame: &mut Frame, area: Rect, score: u32) {
    if area.width < 4 || area.height < 2 {
        return;
    }
    let color = SKY_TOP.lerp(Rgb::BLACK, 0.35);
    let text = Paragraph::new(Span::styled(
        format!("Score: {}", score),
        Style::default().fg(color.into()).add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(text, Rect::new(area.x + 1, area.y + 1, area.width - 1, 1));
}

/// Cell holding the bubble's text start, or `None` once it has left the area.
pub fn bubble_cell(bubble: &ScoreBubble, viewport: Viewport, area: Rect) -> Option<(u16, u16)> {
    if viewport.width <= 0.0 || viewport.height <= 0.0 {
        return None;
    }
    let col = bubble.x / viewport.width * area.width as f64;
    // Rise by one row over the lifetime
    let row = bubble.y / viewport.height * area.height as f64 - bubble.progress();
    let col = col - bubble.text.chars().count() as f64 / 2.0;
    if col < 0.0 || row < 0.0 || col >= area.width as f64 || row >= area.height as f64 {
        return None;
    }
    Some((area.x + col as u16, area.y + row as u16))
}

pub fn render_bubbles(frame: &mut Frame, area: Rect, viewport: Viewport, bubbles: &[ScoreBubble]) {
    for bubble in bubbles {
        let Some((x, y)) = bubble_cell(bubble, viewport, area) else {
            continue;
        };
        // Fade toward the sky color
        let color = Rgb::WHITE.lerp(SKY_TOP, bubble.progress());
        let width = (bubble.text.chars().count() as u16).min(area.x + area.width - x);
        frame.render_widget(
            Paragraph::new(Span::styled(
                bubble.text.as_str(),
                Style::default().fg(color.into()).add_modifier(Modifier::BOLD),
            )),
            Rect::new(x, y, width, 1),
        );
    }
}
