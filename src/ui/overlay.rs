//! Frame, status bar, info panel and the start / game-over modals.

use crate::constants::MAX_DIFFICULTY;
use crate::game::PipeConfig;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const INFO_PANEL_WIDTH: u16 = 22;

/// Layout areas returned by [`game_layout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameLayout {
    /// Play area, inside the outer border.
    pub content: Rect,
    /// Status bar (2 lines) under the play area.
    pub status_bar: Rect,
    /// Info panel on the right, with its own border.
    pub info_panel: Rect,
}

/// Split the terminal into play area, status bar and info panel.
///
/// ```text
/// ┌─ Flappy ────────────────────────┬─ Info ──────┐
/// │                                 │             │
/// │   [play area]                   │  [info]     │
/// │                                 │             │
/// │ [status bar - 2 lines]          │             │
/// └─────────────────────────────────┴─────────────┘
/// ```
pub fn game_layout(area: Rect) -> GameLayout {
    let inner = outer_block().inner(area);

    let h_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(INFO_PANEL_WIDTH)])
        .split(inner);

    let v_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(2)])
        .split(h_chunks[0]);

    GameLayout {
        content: v_chunks[0],
        status_bar: v_chunks[1],
        info_panel: h_chunks[1],
    }
}

fn outer_block() -> Block<'static> {
    Block::default()
        .title(" Flappy ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
}

pub fn render_frame(frame: &mut Frame, area: Rect) {
    frame.render_widget(Clear, area);
    frame.render_widget(outer_block(), area);
}

/// Render a 2-line status bar: status message, then key hints.
pub fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    status_text: &str,
    status_color: Color,
    controls: &[(&str, &str)],
) {
    if area.height < 1 {
        return;
    }

    let status = Paragraph::new(status_text)
        .style(Style::default().fg(status_color))
        .alignment(Alignment::Center);
    frame.render_widget(status, Rect { height: 1, ..area });

    if area.height >= 2 && !controls.is_empty() {
        let mut spans = Vec::new();
        for (i, (key, action)) in controls.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled("  ", Style::default()));
            }
            spans.push(Span::styled(*key, Style::default().fg(Color::White)));
            spans.push(Span::styled(
                format!(" {}", action),
                Style::default().fg(Color::DarkGray),
            ));
        }

        let controls_line = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
        frame.render_widget(
            controls_line,
            Rect {
                y: area.y + 1,
                height: 1,
                ..area
            },
        );
    }
}

/// Audio line for the info panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioStatus {
    On,
    Muted,
    Unavailable,
}

impl AudioStatus {
    fn label(self) -> (&'static str, Color) {
        match self {
            AudioStatus::On => ("on", Color::Green),
            AudioStatus::Muted => ("muted", Color::Yellow),
            AudioStatus::Unavailable => ("no device", Color::DarkGray),
        }
    }
}

/// Values shown in the info panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InfoPanel {
    pub best: u32,
    pub difficulty: u32,
    pub config: PipeConfig,
    pub audio: AudioStatus,
    pub volume: f32,
    pub assets_loaded: usize,
}

pub fn render_info_panel(frame: &mut Frame, area: Rect, info: &InfoPanel) {
    let block = Block::default()
        .title(" Info ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height < 2 || inner.width < 4 {
        return;
    }

    let label = |text: &'static str| Span::styled(text, Style::default().fg(Color::DarkGray));
    let (audio_text, audio_color) = info.audio.label();

    let mut lines = vec![
        Line::from(vec![
            label(" Best: "),
            Span::styled(
                info.best.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            label(" Difficulty: "),
            Span::styled(
                format!("{}/{}", info.difficulty, MAX_DIFFICULTY),
                Style::default().fg(Color::Cyan),
            ),
        ]),
        Line::from(vec![
            label(" Gap: "),
            Span::styled(
                format!("{:.0}", info.config.gap),
                Style::default().fg(Color::Green),
            ),
        ]),
        Line::from(vec![
            label(" Speed: "),
            Span::styled(
                format!("{:.1}", info.config.speed),
                Style::default().fg(Color::Green),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            label(" Audio: "),
            Span::styled(audio_text, Style::default().fg(audio_color)),
        ]),
        Line::from(label(" Volume:")),
    ];

    let bar_width = (inner.width as usize).saturating_sub(4);
    let filled = ((info.volume.clamp(0.0, 1.0) as f64) * bar_width as f64).round() as usize;
    let empty = bar_width.saturating_sub(filled);
    lines.push(Line::from(vec![
        Span::raw(" "),
        Span::styled("█".repeat(filled), Style::default().fg(Color::Yellow)),
        Span::styled("░".repeat(empty), Style::default().fg(Color::DarkGray)),
    ]));

    lines.push(Line::from(""));
    lines.push(Line::from(label(if info.assets_loaded > 0 {
        " Sprites: custom"
    } else {
        " Sprites: built-in"
    })));

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Centered bordered box, cleared, returning its inner area.
fn modal(frame: &mut Frame, area: Rect, width: u16, height: u16, color: Color, title: &str) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let modal_area = Rect::new(x, y, width, height);

    frame.render_widget(Clear, modal_area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .title(title);
    let inner = block.inner(modal_area);
    frame.render_widget(block, modal_area);
    inner
}

/// Shown while Idle.
pub fn render_start_overlay(frame: &mut Frame, area: Rect, best: u32) {
    let inner = modal(frame, area, 36, 9, Color::Yellow, " Flappy ");
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Keep the bird in the air",
            Style::default().fg(Color::White),
        )),
        Line::from(Span::styled(
            "and thread the pipes.",
            Style::default().fg(Color::White),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("Best: {}", best),
            Style::default().fg(Color::Cyan),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "[Space] Start",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

/// Shown after a crash.
pub fn render_game_over(frame: &mut Frame, area: Rect, score: u32, best: u32, new_best: bool) {
    let inner = modal(frame, area, 36, 9, Color::Red, " Game Over ");
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "CRASH!",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("Score: {}   Best: {}", score, best),
            Style::default().fg(Color::White),
        )),
    ];
    lines.push(if new_best {
        Line::from(Span::styled(
            "New best!",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ))
    } else {
        Line::from("")
    });
    lines.push(Line::from(Span::styled(
        "[Space/R] Restart  [Q] Quit",
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_areas_fit_inside_terminal() {
        let area = Rect::new(0, 0, 100, 40);
        let layout = game_layout(area);
        assert_eq!(layout.info_panel.width, INFO_PANEL_WIDTH);
        assert_eq!(layout.status_bar.height, 2);
        assert_eq!(layout.content.x, 1);
        assert_eq!(layout.content.y, 1);
        assert_eq!(layout.content.width, 100 - 2 - INFO_PANEL_WIDTH);
        assert_eq!(layout.content.height, 40 - 2 - 2);
        assert_eq!(layout.status_bar.y, layout.content.y + layout.content.height);
    }
}
