//! Layout and drawing: menu, high scores, board, sidebar, overlays and effects.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Gauge, Paragraph, Widget};
use std::collections::HashSet;
use std::time::Instant;
use tachyonfx::{
    CellFilter, Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx, ref_count,
};

use crate::board::{HEIGHT, WIDTH};
use crate::effects::Effects;
use crate::game::{Game, Phase};
use crate::piece::Piece;
use crate::scoreboard::{MAX_NAME_LEN, Scoreboard};
use crate::theme::Theme;

/// Each board cell is two terminal columns wide so blocks look square.
const CELL_WIDTH: u16 = 2;
const BOARD_OUTER_WIDTH: u16 = WIDTH as u16 * CELL_WIDTH + 2;
const BOARD_OUTER_HEIGHT: u16 = HEIGHT as u16 + 2;
const SIDEBAR_WIDTH: u16 = 24;
/// Extra column so the shaken board never spills into the sidebar.
const SHAKE_MARGIN: u16 = 1;

/// Duration of the white flash over cleared rows.
const LINE_FLASH_MS: u32 = 350;

/// Everything the renderer reads. Nothing is mutated through it.
pub struct View<'a> {
    pub game: &'a Game,
    pub scoreboard: &'a Scoreboard,
    pub effects: &'a Effects,
    pub theme: &'a Theme,
    pub now_ms: u64,
}

/// TachyonFX flash over the rows of the latest clear.
#[derive(Default)]
pub struct LineFlash {
    rows: Vec<usize>,
    effect: Option<Effect>,
    last_process: Option<Instant>,
}

impl LineFlash {
    /// Restart the flash for a new set of rows.
    pub fn trigger(&mut self, rows: Vec<usize>) {
        self.rows = rows;
        self.effect = None;
        self.last_process = None;
    }

    pub fn reset(&mut self) {
        self.trigger(Vec::new());
    }

    fn is_active(&self) -> bool {
        !self.rows.is_empty()
    }
}

/// `1234567` -> `"1,234,567"`.
pub fn fmt_thousands(n: u32) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Draw the current phase.
pub fn draw(frame: &mut Frame, view: &View, flash: &mut LineFlash, now: Instant) {
    let area = frame.area();
    Block::default()
        .style(Style::default().bg(view.theme.bg))
        .render(area, frame.buffer_mut());

    match view.game.phase() {
        Phase::NotStarted => draw_menu(frame, view, area),
        Phase::HighScores => draw_high_scores(frame, view, area),
        phase => {
            let board_area = draw_game(frame, view, area);
            if flash.is_active() {
                apply_line_flash(frame, view, board_area, flash, now);
            }
            match phase {
                Phase::Paused => draw_pause_overlay(frame, view, area),
                Phase::NameEntry => draw_name_entry(frame, view, area),
                Phase::GameOver => draw_game_over(frame, view, area),
                _ => {}
            }
        }
    }
}

/// Centered popup of at most `w` x `h`, cleared and bordered.
fn popup(frame: &mut Frame, theme: &Theme, area: Rect, w: u16, h: u16) -> Rect {
    let rect = Rect {
        x: area.x + area.width.saturating_sub(w) / 2,
        y: area.y + area.height.saturating_sub(h) / 2,
        width: w.min(area.width),
        height: h.min(area.height),
    };
    Clear.render(rect, frame.buffer_mut());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line))
        .style(Style::default().bg(theme.bg));
    let inner = block.inner(rect);
    block.render(rect, frame.buffer_mut());
    inner
}

fn draw_menu(frame: &mut Frame, view: &View, area: Rect) {
    let theme = view.theme;
    let key = Style::default().fg(theme.title);
    let text = Style::default().fg(theme.main_fg);
    let lines = vec![
        Line::from(Span::styled("N E O N   T E T R I S", Style::default().fg(theme.div_line).bold())),
        Line::from(Span::styled("Block Puzzle Game", Style::default().fg(theme.accent))),
        Line::from(""),
        Line::from(Span::styled("Press SPACE to Start", key)),
        Line::from(Span::styled("Press H for High Scores", key)),
        Line::from(""),
        Line::from(Span::styled("Controls:", text)),
        Line::from(Span::styled("←/→ or h/l   Move", text)),
        Line::from(Span::styled("↑ or k       Rotate", text)),
        Line::from(Span::styled("↓ or j       Drop faster", text)),
        Line::from(Span::styled("P Pause      Q Quit", text)),
    ];
    let inner = popup(frame, theme, area, 40, lines.len() as u16 + 4);
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(inner.inner(ratatui::layout::Margin::new(0, 1)), frame.buffer_mut());
}

fn draw_high_scores(frame: &mut Frame, view: &View, area: Rect) {
    let theme = view.theme;
    let mut lines = vec![
        Line::from(Span::styled("HIGH SCORES", Style::default().fg(theme.title).bold())),
        Line::from(""),
    ];
    if view.scoreboard.entries().is_empty() {
        lines.push(Line::from(Span::styled(
            "No high scores yet!",
            Style::default().fg(theme.main_fg),
        )));
    } else {
        for (i, e) in view.scoreboard.entries().iter().enumerate() {
            lines.push(Line::from(Span::styled(
                format!("{}. {}: {}", i + 1, e.name, fmt_thousands(e.score)),
                Style::default().fg(theme.main_fg),
            )));
        }
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press H to go back",
        Style::default().fg(theme.div_line),
    )));
    let inner = popup(frame, theme, area, 36, lines.len() as u16 + 4);
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(inner.inner(ratatui::layout::Margin::new(0, 1)), frame.buffer_mut());
}

/// Board and sidebar centered in `area`. Returns the board's inner rect.
fn draw_game(frame: &mut Frame, view: &View, area: Rect) -> Rect {
    let total_w = SHAKE_MARGIN + BOARD_OUTER_WIDTH + SIDEBAR_WIDTH;

    let horiz = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(total_w),
            Constraint::Fill(1),
        ])
        .split(area);
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(BOARD_OUTER_HEIGHT),
            Constraint::Fill(1),
        ])
        .split(horiz[1]);
    let active = vert[1];

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(SHAKE_MARGIN + BOARD_OUTER_WIDTH),
            Constraint::Length(SIDEBAR_WIDTH),
        ])
        .split(active);

    let shake = view.effects.shake_offset();
    let board_outer = Rect {
        x: chunks[0].x + shake,
        width: chunks[0].width.saturating_sub(SHAKE_MARGIN),
        ..chunks[0]
    };
    let inner = draw_board(frame, view, board_outer);
    draw_sidebar(frame, view, chunks[1]);
    inner
}

fn draw_board(frame: &mut Frame, view: &View, area: Rect) -> Rect {
    let theme = view.theme;
    let game = view.game;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg));
    let inner = block.inner(area);
    block.render(area, frame.buffer_mut());

    let buf = frame.buffer_mut();
    let mut put = |x: i32, y: i32, symbol: &str, style: Style| {
        if x < 0 || y < 0 {
            return;
        }
        let rx = inner.x + x as u16 * CELL_WIDTH;
        let ry = inner.y + y as u16;
        if rx + CELL_WIDTH <= inner.x + inner.width && ry < inner.y + inner.height {
            buf.set_string(rx, ry, symbol, style);
        }
    };

    for (y, row) in game.board().rows().iter().enumerate() {
        for (x, cell) in row.iter().enumerate() {
            let (symbol, style) = match cell {
                Some(c) => ("██", Style::default().fg(theme.block(*c))),
                None => (" ·", Style::default().fg(theme.grid).bg(theme.bg)),
            };
            put(x as i32, y as i32, symbol, style);
        }
    }

    if matches!(game.phase(), Phase::Playing | Phase::Paused) {
        let piece = game.current();
        let style = Style::default().fg(theme.block(piece.color));
        for (x, y) in piece.cells() {
            put(x, y, "██", style);
        }
    }

    for p in view.effects.power_ups() {
        let style = if p.alpha() > 0.3 {
            Style::default().fg(theme.title).bg(theme.bg).bold()
        } else {
            Style::default().fg(theme.title).bg(theme.bg)
        };
        put(p.x as i32, p.y as i32, &format!("{} ", p.kind.symbol()), style);
    }

    for p in view.effects.particles() {
        let symbol = if p.alpha() > 0.5 { "• " } else { "· " };
        put(
            p.x.floor() as i32,
            p.y.floor() as i32,
            symbol,
            Style::default().fg(theme.block(p.color)).bg(theme.bg),
        );
    }

    inner
}

/// Flash cleared rows from white back to the board colours.
fn apply_line_flash(
    frame: &mut Frame,
    view: &View,
    board: Rect,
    flash: &mut LineFlash,
    now: Instant,
) {
    let delta = flash
        .last_process
        .map(|t| now.saturating_duration_since(t))
        .unwrap_or(std::time::Duration::ZERO);
    let delta_ms = delta.as_millis().min(u32::MAX as u128) as u32;
    flash.last_process = Some(now);

    if flash.effect.is_none() {
        // Rows are reported before the collapse; the flash marks where they were.
        let rows: HashSet<u16> = flash.rows.iter().map(|&y| board.y + y as u16).collect();
        let filter = CellFilter::PositionFn(ref_count(move |pos: Position| rows.contains(&pos.y)));
        let white = view.theme.main_fg;
        let effect = fx::fade_from(white, white, (LINE_FLASH_MS, Interpolation::Linear))
            .with_filter(filter)
            .with_area(board);
        flash.effect = Some(effect);
    }

    let done = match flash.effect.as_mut() {
        Some(effect) => {
            frame.render_effect(effect, board, TfxDuration::from_millis(delta_ms));
            effect.done()
        }
        None => true,
    };
    if done {
        flash.reset();
    }
}

fn sidebar_block(theme: &Theme, title: &'static str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
        .title(Span::styled(title, Style::default().fg(theme.title)))
}

fn draw_sidebar(frame: &mut Frame, view: &View, area: Rect) {
    let theme = view.theme;
    let game = view.game;
    let label = Style::default().fg(theme.title);
    let value = Style::default().fg(theme.main_fg);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Next
            Constraint::Length(8), // Stats
            Constraint::Length(4), // Combo
            Constraint::Fill(1),
        ])
        .split(area);

    let next_block = sidebar_block(theme, " Next ");
    let next_inner = next_block.inner(chunks[0]);
    next_block.render(chunks[0], frame.buffer_mut());
    draw_piece_preview(frame, theme, game.next(), next_inner);

    let stats_block = sidebar_block(theme, " Stats ");
    let stats_inner = stats_block.inner(chunks[1]);
    stats_block.render(chunks[1], frame.buffer_mut());
    let best = view.scoreboard.best().unwrap_or(0).max(game.score());
    let row = |name: &'static str, v: String| {
        Line::from(vec![Span::styled(format!("{name:<7}"), label), Span::styled(v, value)])
    };
    let stats = vec![
        row("Score", fmt_thousands(game.score())),
        row("Best", fmt_thousands(best)),
        row("Level", game.level().to_string()),
        row("Lines", game.lines_cleared().to_string()),
        row("Time", format!("{}s", game.elapsed_secs(view.now_ms))),
        row("Speed", format!("{}ms", game.gravity_interval_ms())),
    ];
    Paragraph::new(stats).render(stats_inner, frame.buffer_mut());

    let combo_block = sidebar_block(theme, " Combo ");
    let combo_inner = combo_block.inner(chunks[2]);
    combo_block.render(chunks[2], frame.buffer_mut());
    let combo_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(combo_inner);
    let ratio = game.combo_window_ratio(view.now_ms);
    let combo_label = if ratio > 0.0 {
        format!("x{}", game.combo())
    } else {
        "-".to_string()
    };
    Paragraph::new(Line::from(Span::styled(combo_label, label)))
        .render(combo_layout[0], frame.buffer_mut());
    let bar_color = if ratio > 0.6 {
        Color::Green
    } else if ratio > 0.3 {
        Color::Yellow
    } else {
        Color::Red
    };
    Gauge::default()
        .ratio(ratio.clamp(0.0, 1.0))
        .label("")
        .gauge_style(Style::default().fg(bar_color).bg(theme.bg))
        .render(combo_layout[1], frame.buffer_mut());
}

/// Draw a piece's base orientation centered in `area`.
fn draw_piece_preview(frame: &mut Frame, theme: &Theme, piece: &Piece, area: Rect) {
    let matrix = piece.kind.matrix(0);
    let cells: Vec<(usize, usize)> = matrix.filled().collect();
    let (min_c, max_c, min_r, max_r) = cells.iter().fold(
        (usize::MAX, 0, usize::MAX, 0),
        |(a, b, c, d), &(col, row)| (a.min(col), b.max(col), c.min(row), d.max(row)),
    );
    let w = (max_c - min_c + 1) as u16 * CELL_WIDTH;
    let h = (max_r - min_r + 1) as u16;
    let off_x = area.width.saturating_sub(w) / 2;
    let off_y = area.height.saturating_sub(h) / 2;
    let style = Style::default().fg(theme.block(piece.color));
    let buf = frame.buffer_mut();
    for (col, row) in cells {
        let rx = area.x + off_x + (col - min_c) as u16 * CELL_WIDTH;
        let ry = area.y + off_y + (row - min_r) as u16;
        if rx + CELL_WIDTH <= area.x + area.width && ry < area.y + area.height {
            buf.set_string(rx, ry, "██", style);
        }
    }
}

fn draw_pause_overlay(frame: &mut Frame, view: &View, area: Rect) {
    let theme = view.theme;
    let lines = vec![
        Line::from(Span::styled(" Paused ", Style::default().fg(Color::Black).bg(theme.title))),
        Line::from(""),
        Line::from(Span::styled("P Resume    Q Quit", Style::default().fg(theme.main_fg))),
    ];
    let inner = popup(frame, theme, area, 28, 5);
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(inner, frame.buffer_mut());
}

fn draw_name_entry(frame: &mut Frame, view: &View, area: Rect) {
    let theme = view.theme;
    let name = view.game.name();
    let field = if name.chars().count() < MAX_NAME_LEN {
        format!("{name}_")
    } else {
        name.to_string()
    };
    let lines = vec![
        Line::from(Span::styled("NEW HIGH SCORE!", Style::default().fg(theme.title).bold())),
        Line::from(""),
        Line::from(Span::styled(
            format!("Score: {}", fmt_thousands(view.game.score())),
            Style::default().fg(theme.main_fg),
        )),
        Line::from(""),
        Line::from(Span::styled("Enter your name:", Style::default().fg(theme.div_line))),
        Line::from(Span::styled(
            format!(" {field:<width$} ", width = MAX_NAME_LEN + 1),
            Style::default().fg(theme.main_fg).bg(theme.grid),
        )),
        Line::from(""),
        Line::from(Span::styled("Press ENTER to save", Style::default().fg(theme.title))),
    ];
    let inner = popup(frame, theme, area, 32, lines.len() as u16 + 2);
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(inner, frame.buffer_mut());
}

fn draw_game_over(frame: &mut Frame, view: &View, area: Rect) {
    let theme = view.theme;
    let mut lines = vec![
        Line::from(Span::styled(
            " GAME OVER ",
            Style::default().fg(Color::White).bg(Color::Red).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("Final Score: {}", fmt_thousands(view.game.score())),
            Style::default().fg(theme.main_fg),
        )),
    ];
    if view.game.made_scoreboard() {
        lines.push(Line::from(Span::styled(
            "NEW HIGH SCORE!",
            Style::default().fg(theme.title).bold(),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "R Restart   M Menu   Q Quit",
        Style::default().fg(theme.div_line),
    )));
    let inner = popup(frame, theme, area, 32, lines.len() as u16 + 2);
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(inner, frame.buffer_mut());
}
