//! Layout and drawing: menu, playfield with ghost, hold/next previews, score, game over.
//! Reads the engine only.

use crate::board::Cell;
use crate::game::{Engine, GameState};
use crate::piece::{Piece, Shape};
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

/// Each board cell is two terminal columns wide so blocks look square.
const CELL_WIDTH: u16 = 2;
const SIDEBAR_WIDTH: u16 = 16;
const BLOCK: &str = "██";
const GHOST: &str = "[]";
const EMPTY: &str = " ·";

const FG: Color = Color::Gray;
const DIM: Color = Color::DarkGray;
const TITLE: Color = Color::Yellow;

pub fn draw(frame: &mut Frame, engine: &Engine) {
    let area = frame.area();
    match engine.state() {
        GameState::Menu => draw_menu(frame, area),
        GameState::Playing => draw_game(frame, engine, area),
        GameState::GameOver => {
            draw_game(frame, engine, area);
            draw_game_over(frame, engine, area);
        }
    }
}

/// `width x height` rect centred in `area`, clipped to it.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn framed(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(DIM))
        .title(Span::styled(title, Style::default().fg(TITLE)))
}

fn draw_menu(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "T E T R I S",
            Style::default().fg(TITLE).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("Press Enter to Start", Style::default().fg(FG))),
        Line::from(""),
        Line::from(Span::styled("←/→ move   ↑ rotate", Style::default().fg(DIM))),
        Line::from(Span::styled("↓ soft drop   Space hard drop", Style::default().fg(DIM))),
        Line::from(Span::styled("Z hold   X swap hold   Q quit", Style::default().fg(DIM))),
        Line::from(""),
    ];
    let popup = centered(area, 40, lines.len() as u16 + 2);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(framed(" Stacktris ")),
        popup,
    );
}

fn draw_game(frame: &mut Frame, engine: &Engine, area: Rect) {
    let board = engine.board();
    let board_w = board.width() as u16 * CELL_WIDTH + 2;
    let board_h = board.height() as u16 + 2;
    let outer = centered(area, board_w + 2 * SIDEBAR_WIDTH, board_h);

    let left = Rect {
        width: SIDEBAR_WIDTH.min(outer.width),
        ..outer
    };
    let middle = Rect {
        x: outer.x + left.width,
        width: board_w.min(outer.width.saturating_sub(left.width)),
        ..outer
    };
    let right = Rect {
        x: middle.x + middle.width,
        width: outer.width.saturating_sub(left.width + middle.width),
        ..outer
    };

    draw_stats(frame, engine, left);
    draw_playfield(frame, engine, middle);
    draw_next(frame, engine, right);
}

fn draw_playfield(frame: &mut Frame, engine: &Engine, area: Rect) {
    let active: Vec<(i32, i32)> = engine.active().map(|p| p.cells().collect()).unwrap_or_default();
    let ghost: Vec<(i32, i32)> = engine.ghost().map(|p| p.cells().collect()).unwrap_or_default();
    let piece_color = engine.active().map_or(FG, Piece::color);

    let lines: Vec<Line> = engine
        .board()
        .rows()
        .enumerate()
        .map(|(y, row)| {
            let spans: Vec<Span> = row
                .iter()
                .enumerate()
                .map(|(x, cell)| {
                    let pos = (x as i32, y as i32);
                    if active.contains(&pos) {
                        Span::styled(BLOCK, Style::default().fg(piece_color))
                    } else if let Cell::Filled(color) = cell {
                        Span::styled(BLOCK, Style::default().fg(*color))
                    } else if ghost.contains(&pos) {
                        Span::styled(GHOST, Style::default().fg(piece_color))
                    } else {
                        Span::styled(EMPTY, Style::default().fg(DIM))
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(framed("")), area);
}

/// Rows of a shape as coloured blocks, for previews.
fn shape_lines(shape: &Shape, color: Color) -> Vec<Line<'static>> {
    (0..shape.rows())
        .map(|r| {
            let spans: Vec<Span> = (0..shape.cols())
                .map(|c| {
                    if shape.is_filled(r, c) {
                        Span::styled(BLOCK, Style::default().fg(color))
                    } else {
                        Span::raw("  ")
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

fn draw_stats(frame: &mut Frame, engine: &Engine, area: Rect) {
    let stat = |label: &str, value: u32| {
        Line::from(vec![
            Span::styled(format!("{label:<7}"), Style::default().fg(DIM)),
            Span::styled(value.to_string(), Style::default().fg(FG)),
        ])
    };
    let mut lines = vec![
        stat("Score", engine.score()),
        stat("Level", engine.level()),
        stat("Lines", engine.lines_cleared()),
        stat("Speed", engine.drop_interval().as_millis() as u32),
        Line::from(""),
        Line::from(Span::styled("Hold", Style::default().fg(TITLE))),
    ];
    if let Some(kind) = engine.held() {
        lines.extend(shape_lines(&kind.shape(), kind.color()));
    } else {
        lines.push(Line::from(Span::styled("-", Style::default().fg(DIM))));
    }
    frame.render_widget(Paragraph::new(lines).block(framed("")), area);
}

fn draw_next(frame: &mut Frame, engine: &Engine, area: Rect) {
    let mut lines = Vec::new();
    for piece in engine.lookahead() {
        lines.extend(shape_lines(&piece.shape, piece.color()));
        lines.push(Line::from(""));
    }
    frame.render_widget(Paragraph::new(lines).block(framed(" Next ")), area);
}

fn draw_game_over(frame: &mut Frame, engine: &Engine, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " GAME OVER ",
            Style::default().fg(Color::White).bg(Color::Red),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("Your Score: {}", engine.score()),
            Style::default().fg(FG),
        )),
        Line::from(Span::styled(
            format!("Level {}  Lines {}", engine.level(), engine.lines_cleared()),
            Style::default().fg(FG),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Y: Restart   N: Quit",
            Style::default().fg(DIM),
        )),
        Line::from(""),
    ];
    let popup = centered(area, 32, lines.len() as u16 + 2);
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(framed(" Stacktris ")),
        popup,
    );
}
