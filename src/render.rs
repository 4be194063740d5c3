use ratatui::{
    prelude::*,
    style::{Style, Stylize},
    widgets::*,
};

use crate::board::{Board, Cell, Pos};
use crate::controller::{Phase, Snapshot};
use crate::ui::{ClickActions, Sprite, SpriteKind, SpriteLayer, UiAction};

/// Terminal columns per board cell, so cells come out roughly square.
pub const CELL_WIDTH: u16 = 2;

const HEADER_HEIGHT: u16 = 3;
const POPUP_WIDTH: u16 = 30;
const POPUP_HEIGHT: u16 = 7;
const PLAY_AGAIN: &str = "Play Again";

/// Lay the frame out as sprites, then draw them bottom to top. The layer is
/// left populated so clicks can be hit-tested against what is on screen.
pub fn render(frame: &mut Frame, snapshot: &Snapshot, fps: f64, layer: &mut SpriteLayer) {
    layout(frame.area(), snapshot, layer);
    for sprite in layer.iter() {
        draw_sprite(frame, sprite, snapshot, fps);
    }
}

fn layout(area: Rect, snapshot: &Snapshot, layer: &mut SpriteLayer) {
    layer.clear();

    let rows = Layout::default()
        .direction(layout::Direction::Vertical)
        .constraints([Constraint::Length(HEADER_HEIGHT), Constraint::Min(0)])
        .split(area);
    layer.push(Sprite::drawable(rows[0], SpriteKind::Header));

    let board = snapshot.board;
    let board_area = centered(
        rows[1],
        board.width() * CELL_WIDTH + 2,
        board.height() + 2,
    );
    layer.push(Sprite::drawable(board_area, SpriteKind::Board));

    match snapshot.phase {
        Phase::Idle => {
            let banner = centered(board_area, 24, 3);
            layer.push(Sprite::clickable(
                banner,
                SpriteKind::Banner("Press SPACE to start".into()),
                ClickActions {
                    primary: Some(UiAction::Start),
                    secondary: None,
                },
            ));
        }
        Phase::Terminal(_) => {
            let title = if snapshot.is_win { "You win!" } else { "You lose!" };
            layer.push(Sprite::clickable(
                area,
                SpriteKind::Popup(title.into()),
                ClickActions::BLOCKING,
            ));
            let popup = centered(area, POPUP_WIDTH, POPUP_HEIGHT);
            let button = Rect {
                x: popup.x + popup.width.saturating_sub(PLAY_AGAIN.len() as u16 + 4) / 2,
                y: popup.y + popup.height.saturating_sub(3),
                width: (PLAY_AGAIN.len() as u16 + 4).min(popup.width),
                height: 1.min(popup.height),
            };
            layer.push(Sprite::clickable(
                button,
                SpriteKind::Button(PLAY_AGAIN.into()),
                ClickActions {
                    primary: Some(UiAction::Restart),
                    secondary: None,
                },
            ));
        }
        Phase::Running => {}
    }
}

/// `width` x `height` rectangle centred in `area`, clipped to it.
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

fn draw_sprite(frame: &mut Frame, sprite: &Sprite, snapshot: &Snapshot, fps: f64) {
    let area = sprite.area;
    match &sprite.kind {
        SpriteKind::Header => {
            let text = format!(
                "SNEK    Score: {}    Length: {}    FPS: {:.0}",
                snapshot.score, snapshot.length, fps
            );
            frame.render_widget(
                Paragraph::new(text)
                    .alignment(Alignment::Left)
                    .block(Block::default().borders(Borders::ALL)),
                area,
            );
        }
        SpriteKind::Board => {
            let title = match snapshot.phase {
                Phase::Idle => "Ready",
                Phase::Running => "Playing",
                Phase::Terminal(_) => "Game over",
            };
            let block = Block::default().title(title).borders(Borders::ALL);
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_widget(
                BoardView {
                    board: snapshot.board,
                    length: snapshot.length,
                },
                inner,
            );
        }
        SpriteKind::Banner(text) => {
            frame.render_widget(Clear, area);
            frame.render_widget(
                Paragraph::new(text.as_str())
                    .alignment(Alignment::Center)
                    .block(Block::default().borders(Borders::ALL)),
                area,
            );
        }
        SpriteKind::Popup(title) => {
            let popup = centered(area, POPUP_WIDTH, POPUP_HEIGHT);
            frame.render_widget(Clear, popup);
            frame.render_widget(
                Paragraph::new(format!("{}\nFinal Score: {}", title, snapshot.score))
                    .alignment(Alignment::Center)
                    .bold()
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .border_type(BorderType::Thick),
                    ),
                popup,
            );
        }
        SpriteKind::Button(label) => {
            frame.render_widget(
                Paragraph::new(label.as_str())
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(Color::White).bg(Color::Blue)),
                area,
            );
        }
    }
}

struct BoardView<'a> {
    board: &'a Board,
    length: u32,
}

impl BoardView<'_> {
    fn symbol(&self, cell: Cell) -> Option<(&'static str, Color)> {
        match cell {
            Cell::Empty => None,
            Cell::Food => Some(("♥ ", Color::LightRed)),
            Cell::Snake(age) if age >= self.length => Some(("██", Color::Yellow)),
            Cell::Snake(age) => {
                // Younger segments are drawn heavier, fading toward the tail.
                let life = age as f64 / self.length.max(1) as f64;
                let symbol = if life > 0.66 {
                    "▓▓"
                } else if life > 0.33 {
                    "▒▒"
                } else {
                    "░░"
                };
                Some((symbol, Color::Green))
            }
        }
    }
}

impl Widget for BoardView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for pos in self.board.positions() {
            let Some((symbol, color)) = self.symbol(self.board.cell(pos)) else {
                continue;
            };
            if !fits(area, pos) {
                continue;
            }
            let x = area.x + pos.x * CELL_WIDTH;
            let y = area.y + pos.y;
            for (offset, ch) in symbol.chars().enumerate() {
                if let Some(cell) = buf.cell_mut((x + offset as u16, y)) {
                    cell.set_char(ch).set_fg(color);
                }
            }
        }
    }
}

fn fits(area: Rect, pos: Pos) -> bool {
    pos.x * CELL_WIDTH + CELL_WIDTH <= area.width && pos.y < area.height
}
