use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
    Frame,
};

use crate::game::{Arena, CellGeometry, GameConfig, RoundResult, Rgb};
use crate::metrics::SessionMetrics;

const BODY_SYMBOL: &str = "█";
const HEAD_SYMBOL: &str = "▓";

fn color(rgb: Rgb) -> Color {
    let Rgb(r, g, b) = rgb;
    Color::Rgb(r, g, b)
}

pub struct Renderer {
    cell_width: u16,
    cell_height: u16,
    border_width: u16,
}

impl Renderer {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            cell_width: config.cell_width,
            cell_height: config.cell_height,
            border_width: config.border_width,
        }
    }

    pub fn render(&self, frame: &mut Frame, arena: &Arena, metrics: &SessionMetrics) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        // Render header with scores
        let stats = self.render_stats(arena, metrics);
        frame.render_widget(stats, chunks[0]);

        let grid_area = self.grid_area(chunks[1], arena);
        match arena.result() {
            None => frame.render_widget(self.arena_widget(arena), grid_area),
            Some(result) => {
                let round_over = self.render_round_over(arena, result, metrics);
                frame.render_widget(round_over, grid_area);
            }
        }

        // Render footer with controls
        let controls = self.render_controls(arena);
        frame.render_widget(controls, chunks[2]);
    }

    pub fn arena_widget<'a>(&self, arena: &'a Arena) -> ArenaWidget<'a> {
        ArenaWidget {
            arena,
            cell_width: self.cell_width,
            cell_height: self.cell_height,
            border_width: self.border_width,
        }
    }

    /// Rectangle the bordered grid needs, centred in `area` and cut to fit
    fn grid_area(&self, area: Rect, arena: &Arena) -> Rect {
        let geometry = CellGeometry::new(
            0,
            0,
            self.border_width as i32,
            self.cell_width as i32,
            self.cell_height as i32,
        );
        let (width, height) = geometry.grid_extent(arena.rows(), arena.cols());
        let width = u16::try_from(width).unwrap_or(u16::MAX).min(area.width);
        let height = u16::try_from(height).unwrap_or(u16::MAX).min(area.height);

        Rect::new(
            area.x + (area.width - width) / 2,
            area.y + (area.height - height) / 2,
            width,
            height,
        )
    }

    fn render_stats(&self, arena: &Arena, metrics: &SessionMetrics) -> Paragraph<'_> {
        let mut spans = Vec::new();
        for snake in arena.snakes() {
            spans.push(Span::styled(
                format!("{}: ", snake.name()),
                Style::default().fg(color(snake.color())),
            ));
            spans.push(Span::styled(
                snake.score().to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::raw("    "));
        }
        spans.push(Span::styled("Round: ", Style::default().fg(Color::Yellow)));
        spans.push(Span::styled(
            metrics.current_round().to_string(),
            Style::default().fg(Color::White),
        ));
        spans.push(Span::raw("    "));
        spans.push(Span::styled("Time: ", Style::default().fg(Color::Yellow)));
        spans.push(Span::styled(
            metrics.format_time(),
            Style::default().fg(Color::White),
        ));

        Paragraph::new(vec![Line::from(spans)]).alignment(Alignment::Center)
    }

    fn render_round_over(
        &self,
        arena: &Arena,
        result: &RoundResult,
        metrics: &SessionMetrics,
    ) -> Paragraph<'_> {
        let headline = match (result.winner.and_then(|w| arena.snake(w)), arena.snakes().len()) {
            (Some(winner), _) => Span::styled(
                format!("{} WINS", winner.name().to_uppercase()),
                Style::default()
                    .fg(color(winner.color()))
                    .add_modifier(Modifier::BOLD),
            ),
            (None, 1) => Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            (None, _) => Span::styled(
                "DRAW",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        };

        let mut text = vec![Line::from(""), Line::from(headline), Line::from("")];

        for (index, snake) in arena.snakes().iter().enumerate() {
            let mut spans = vec![
                Span::styled(
                    format!("{}: ", snake.name()),
                    Style::default().fg(color(snake.color())),
                ),
                Span::styled(
                    snake.score().to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ];
            if let Some(wins) = metrics.wins.get(index).filter(|_| arena.snakes().len() > 1) {
                spans.push(Span::styled(
                    format!("  ({} wins)", wins),
                    Style::default().fg(Color::Gray),
                ));
            }
            text.push(Line::from(spans));
        }

        text.push(Line::from(""));
        text.push(Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::Gray)),
            Span::styled(
                "R",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" for the next round or ", Style::default().fg(Color::Gray)),
            Span::styled(
                "Q",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to quit", Style::default().fg(Color::Gray)),
        ]));

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, arena: &Arena) -> Paragraph<'_> {
        let mut spans = vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" player 1 | "),
        ];
        if arena.snakes().len() > 1 {
            spans.push(Span::styled("WASD", Style::default().fg(Color::Cyan)));
            spans.push(Span::raw(" player 2 | "));
        }
        spans.push(Span::styled("Q", Style::default().fg(Color::Red)));
        spans.push(Span::raw(" to quit"));

        Paragraph::new(vec![Line::from(spans)]).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(&GameConfig::default())
    }
}

/// Draws the bordered grid with every live entity placed by [`CellGeometry`]
pub struct ArenaWidget<'a> {
    arena: &'a Arena,
    cell_width: u16,
    cell_height: u16,
    border_width: u16,
}

impl Widget for ArenaWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.border_width > 0 {
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::White))
                .title(" Snake Duel ")
                .render(area, buf);
        }

        let geometry = CellGeometry::new(
            area.x as i32,
            area.y as i32,
            self.border_width as i32,
            self.cell_width as i32,
            self.cell_height as i32,
        );
        let right = area.right() as i32 - self.border_width as i32;
        let bottom = area.bottom() as i32 - self.border_width as i32;
        let width = self.cell_width as i32;

        for entity in self.arena.entities() {
            if !self.arena.in_bounds(entity.row, entity.col) {
                continue;
            }

            let is_head = self.arena.snakes().iter().any(|snake| snake.is_head(entity));
            let (symbol, style) = if is_head {
                (
                    HEAD_SYMBOL,
                    Style::default()
                        .fg(color(entity.color()))
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                (BODY_SYMBOL, Style::default().fg(color(entity.color())))
            };
            let cell = symbol.repeat(self.cell_width as usize);

            let (x, top) = geometry.cell_to_pixel(entity.row, entity.col);
            for y in top..top + self.cell_height as i32 {
                // Terminals smaller than the grid cut it off
                if x < 0 || y < 0 || x + width > right || y >= bottom {
                    continue;
                }
                buf.set_string(x as u16, y as u16, &cell, style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn duel_config() -> GameConfig {
        GameConfig {
            grid_rows: 5,
            grid_cols: 7,
            initial_snake_length: 3,
            seed: Some(9),
            ..Default::default()
        }
    }

    fn symbol_at(buf: &Buffer, x: u16, y: u16) -> String {
        buf.cell((x, y))
            .map(|cell| cell.symbol().to_string())
            .unwrap_or_default()
    }

    #[test]
    fn test_entities_drawn_at_cell_geometry() {
        let config = duel_config();
        let arena = Arena::new(&config, &[]).expect("valid arena");
        let renderer = Renderer::new(&config);

        // border 1 + 7 cols * 2 wide + border 1, border 1 + 5 rows + border 1
        let area = Rect::new(0, 0, 16, 7);
        let mut buf = Buffer::empty(area);
        renderer.arena_widget(&arena).render(area, &mut buf);

        // Player 1 head at (2, 2) and tail at (2, 0)
        assert_eq!(symbol_at(&buf, 5, 3), HEAD_SYMBOL);
        assert_eq!(symbol_at(&buf, 6, 3), HEAD_SYMBOL);
        assert_eq!(symbol_at(&buf, 1, 3), BODY_SYMBOL);
        assert_eq!(
            buf.cell((1, 3)).map(|cell| cell.fg),
            Some(Color::Rgb(255, 0, 0))
        );

        // Player 2 head at (2, 4)
        assert_eq!(symbol_at(&buf, 9, 3), HEAD_SYMBOL);
        assert_eq!(
            buf.cell((9, 3)).map(|cell| cell.fg),
            Some(Color::Rgb(0, 255, 0))
        );

        for food in arena.food() {
            let x = 1 + food.col as u16 * 2;
            let y = 1 + food.row as u16;
            assert_eq!(buf.cell((x, y)).map(|cell| cell.fg), Some(Color::Rgb(0, 0, 255)));
        }
    }

    #[test]
    fn test_grid_area_is_centred_and_clipped() {
        let config = duel_config();
        let arena = Arena::new(&config, &[]).expect("valid arena");
        let renderer = Renderer::new(&config);

        let area = renderer.grid_area(Rect::new(0, 0, 36, 17), &arena);
        assert_eq!(area, Rect::new(10, 5, 16, 7));

        let area = renderer.grid_area(Rect::new(2, 2, 10, 4), &arena);
        assert_eq!(area, Rect::new(2, 2, 10, 4));
    }

    #[test]
    fn test_full_frame_shows_scores() {
        let config = duel_config();
        let arena = Arena::new(&config, &[40, 30]).expect("valid arena");
        let renderer = Renderer::new(&config);
        let metrics = SessionMetrics::new(2);

        let mut terminal = Terminal::new(TestBackend::new(60, 20)).expect("test terminal");
        terminal
            .draw(|frame| renderer.render(frame, &arena, &metrics))
            .expect("draw");

        let screen: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(screen.contains("Player 1: 40"));
        assert!(screen.contains("Player 2: 30"));
        assert!(screen.contains("Round: 1"));
    }
}
