use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use super::frame::{DrawCommand, build_frame};
use crate::game::{CollisionType, GamePhase, ParticleColor, Snapshot, TickOutcome};
use crate::metrics::GameMetrics;

const PINK: (u8, u8, u8) = (255, 105, 180);
const YELLOW: (u8, u8, u8) = (255, 255, 0);
const CYAN: (u8, u8, u8) = (0, 255, 255);

/// What one board tile looks like on screen (two terminal columns)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    pub symbol: &'static str,
    pub fg: Color,
    pub bg: Color,
    pub bold: bool,
}

impl Glyph {
    fn style(&self) -> Style {
        let style = Style::default().fg(self.fg).bg(self.bg);
        if self.bold {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }
}

impl Default for Glyph {
    fn default() -> Self {
        Self {
            symbol: "  ",
            fg: Color::Reset,
            bg: Color::Black,
            bold: false,
        }
    }
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        snapshot: &Snapshot<'_>,
        metrics: &GameMetrics,
        elapsed_secs: f32,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(snapshot, metrics);
        frame.render_widget(stats, chunks[0]);

        // Each tile is two columns wide, plus the border
        let tiles = u16::try_from(snapshot.config.tile_count.max(0)).unwrap_or(u16::MAX);
        let board_area = centered(
            chunks[1],
            tiles.saturating_mul(2).saturating_add(2),
            tiles.saturating_add(2),
        );

        let commands = build_frame(snapshot, elapsed_secs);
        let tile_size = snapshot.config.tile_size;
        let board = self.render_board(rasterize(&commands, snapshot.config.tile_count, tile_size));
        frame.render_widget(board, board_area);

        if let Some(overlay) = self.render_overlay(snapshot, metrics) {
            let overlay_area = centered(board_area, board_area.width.min(36), 9);
            frame.render_widget(Clear, overlay_area);
            frame.render_widget(overlay, overlay_area);
        }

        let controls = self.render_controls(snapshot.phase);
        frame.render_widget(controls, chunks[2]);
    }

    fn render_board(&self, glyphs: Vec<Vec<Glyph>>) -> Paragraph<'static> {
        let lines: Vec<Line> = glyphs
            .into_iter()
            .map(|row| {
                Line::from(
                    row.into_iter()
                        .map(|glyph| Span::styled(glyph.symbol, glyph.style()))
                        .collect::<Vec<_>>(),
                )
            })
            .collect();

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(rgb(PINK)))
                .title(" SNAKE HUNT "),
        )
    }

    fn render_stats(&self, snapshot: &Snapshot<'_>, metrics: &GameMetrics) -> Paragraph<'_> {
        let label = Style::default().fg(rgb(PINK));
        let value = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);

        let text = vec![Line::from(vec![
            Span::styled("SCORE ", label),
            Span::styled(snapshot.score.to_string(), value),
            Span::raw("    "),
            Span::styled("HIGH SCORE ", Style::default().fg(rgb(YELLOW))),
            Span::styled(metrics.high_score.max(snapshot.score).to_string(), value),
            Span::raw("    "),
            Span::styled("TIME ", label),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("SPEED ", label),
            Span::styled(
                format!("{}ms", snapshot.tick_interval.as_millis()),
                Style::default().fg(Color::White),
            ),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_overlay(
        &self,
        snapshot: &Snapshot<'_>,
        metrics: &GameMetrics,
    ) -> Option<Paragraph<'static>> {
        let hint = Style::default().fg(Color::Gray);
        let key = Style::default()
            .fg(rgb(YELLOW))
            .add_modifier(Modifier::BOLD);

        let (title, title_color, body) = match snapshot.phase {
            GamePhase::Playing => return None,
            GamePhase::Menu => (
                "Ready to Hunt?",
                PINK,
                vec![
                    Line::from(Span::styled("Use arrow keys or WASD to move", hint)),
                    Line::from(""),
                    Line::from(vec![
                        Span::styled("Press ", hint),
                        Span::styled("SPACE", key),
                        Span::styled(" to start hunting", hint),
                    ]),
                ],
            ),
            GamePhase::Paused => (
                "Taking a Break?",
                PINK,
                vec![
                    Line::from(vec![
                        Span::styled("SPACE", key),
                        Span::styled(" resume  ", hint),
                        Span::styled("M", key),
                        Span::styled(" menu", hint),
                    ]),
                ],
            ),
            GamePhase::GameOver => {
                let (title, color) = if metrics.is_new_record(snapshot.score) {
                    ("NEW RECORD!", YELLOW)
                } else {
                    ("Game Over!", (255, 102, 102))
                };
                let cause = match snapshot.outcome {
                    Some(TickOutcome::Collided(CollisionType::Wall)) => "You hit the wall",
                    Some(TickOutcome::Collided(CollisionType::SelfCollision)) => "You bit yourself",
                    Some(TickOutcome::BoardFull) => "The board is full",
                    _ => "",
                };
                (
                    title,
                    color,
                    vec![
                        Line::from(Span::styled(cause, hint)),
                        Line::from(vec![
                            Span::styled("Final Score: ", hint),
                            Span::styled(
                                snapshot.score.to_string(),
                                Style::default()
                                    .fg(Color::White)
                                    .add_modifier(Modifier::BOLD),
                            ),
                        ]),
                        Line::from(""),
                        Line::from(vec![
                            Span::styled("R", key),
                            Span::styled(" hunt again  ", hint),
                            Span::styled("M", key),
                            Span::styled(" menu", hint),
                        ]),
                    ],
                )
            }
        };

        let mut text = vec![
            Line::from(""),
            Line::from(Span::styled(
                title,
                Style::default()
                    .fg(rgb(title_color))
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        text.extend(body);

        Some(
            Paragraph::new(text).alignment(Alignment::Center).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(rgb(title_color))),
            ),
        )
    }

    fn render_controls(&self, phase: GamePhase) -> Paragraph<'_> {
        let action = match phase {
            GamePhase::Menu => " start",
            GamePhase::GameOver => " restart",
            GamePhase::Playing | GamePhase::Paused => " pause",
        };

        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("SPACE", Style::default().fg(Color::Cyan)),
            Span::raw(action),
            Span::raw(" | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Paint draw commands onto a tile grid, one glyph per board cell.
///
/// Later commands overwrite earlier ones; particles keep the background
/// color of the tile they land on.
pub fn rasterize(commands: &[DrawCommand], tile_count: i32, tile_size: f32) -> Vec<Vec<Glyph>> {
    let size = tile_count.max(0) as usize;
    let mut grid = vec![vec![Glyph::default(); size]; size];
    let tile_of = |x: f32, y: f32| -> Option<(usize, usize)> {
        let tx = (x / tile_size).floor();
        let ty = (y / tile_size).floor();
        if tx < 0.0 || ty < 0.0 || tx >= tile_count as f32 || ty >= tile_count as f32 {
            return None;
        }
        Some((tx as usize, ty as usize))
    };

    for command in commands {
        match *command {
            DrawCommand::Background { center, radius } => {
                for (y, row) in grid.iter_mut().enumerate() {
                    for (x, glyph) in row.iter_mut().enumerate() {
                        let px = (x as f32 + 0.5) * tile_size;
                        let py = (y as f32 + 0.5) * tile_size;
                        let distance = ((px - center.0).powi(2) + (py - center.1).powi(2)).sqrt();
                        let glow = 1.0 - (distance / radius.max(f32::EPSILON)).min(1.0);
                        glyph.bg = rgb(scale((0, 20, 40), glow));
                    }
                }
            }
            DrawCommand::GridLines { alpha, .. } => {
                // The terminal has no room for lines between tiles; dots mark them
                let level = (alpha * 4.0).clamp(0.0, 1.0);
                for glyph in grid.iter_mut().flatten() {
                    glyph.symbol = "· ";
                    glyph.fg = rgb(scale(CYAN, level));
                }
            }
            DrawCommand::SnakeSegment {
                cell,
                head,
                intensity,
                ..
            } => {
                if let Some(glyph) = cell_glyph(&mut grid, cell.x, cell.y) {
                    glyph.symbol = if head { "██" } else { "▓▓" };
                    glyph.fg = rgb(scale(PINK, intensity));
                    glyph.bold = head;
                }
            }
            DrawCommand::Food { cell, pulse } => {
                if let Some(glyph) = cell_glyph(&mut grid, cell.x, cell.y) {
                    glyph.symbol = "◆ ";
                    glyph.fg = rgb(scale(YELLOW, pulse));
                    glyph.bold = pulse >= 0.7;
                }
            }
            DrawCommand::Particle {
                x,
                y,
                size,
                color,
                alpha,
            } => {
                if let Some((tx, ty)) = tile_of(x, y) {
                    let glyph = &mut grid[ty][tx];
                    glyph.symbol = if size >= 6.0 { "✦ " } else { "∙ " };
                    glyph.fg = rgb(scale(particle_rgb(color), alpha));
                    glyph.bold = false;
                }
            }
        }
    }

    grid
}

fn cell_glyph(grid: &mut [Vec<Glyph>], x: i32, y: i32) -> Option<&mut Glyph> {
    let row = grid.get_mut(usize::try_from(y).ok()?)?;
    row.get_mut(usize::try_from(x).ok()?)
}

fn particle_rgb(color: ParticleColor) -> (u8, u8, u8) {
    match color {
        ParticleColor::Pink => PINK,
        ParticleColor::Yellow => YELLOW,
    }
}

fn scale((r, g, b): (u8, u8, u8), factor: f32) -> (u8, u8, u8) {
    let factor = factor.clamp(0.0, 1.0);
    (
        (r as f32 * factor).round() as u8,
        (g as f32 * factor).round() as u8,
        (b as f32 * factor).round() as u8,
    )
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}

/// A `width` x `height` rectangle centered in `area`, clipped to it
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [column] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(column);
    rect
}
