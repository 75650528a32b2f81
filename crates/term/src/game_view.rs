//! GameView: maps a [`GameSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{CellSnapshot, GameSnapshot, Pos};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::format::{compact_number, score_text};
use crate::types::TileKind;

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Front-end state that is not part of the engine snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Overlay {
    /// Delete mode is active with the cursor on this cell
    pub delete_cursor: Option<Pos>,
    /// One-line status message under the side panel
    pub message: Option<&'static str>,
}

const BOARD_BG: Rgb = Rgb::new(30, 30, 40);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);

/// Terminal renderer for the board and side panel.
pub struct GameView {
    /// Tile width in terminal columns.
    cell_w: u16,
    /// Tile height in terminal rows.
    cell_h: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 6x3 fits four digits with padding and keeps tiles roughly square.
        Self { cell_w: 6, cell_h: 3 }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
        }
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(&self, snap: &GameSnapshot, overlay: &Overlay, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let size = snap.size as u16;
        let board_w = size * self.cell_w;
        let board_h = size * self.cell_h;
        let frame_w = board_w + 2;
        let frame_h = board_h + 2;

        let panel_w = 20;
        let start_x = viewport.width.saturating_sub(frame_w + panel_w) / 2;
        let start_y = viewport.height.saturating_sub(frame_h) / 2;

        let border = if snap.gravity_unstable {
            CellStyle::new(Rgb::new(230, 160, 60), PANEL_BG)
        } else {
            CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG)
        };

        fb.fill_rect(start_x + 1, start_y + 1, board_w, board_h, ' ', CellStyle::new(BOARD_BG, BOARD_BG));
        draw_border(fb, start_x, start_y, frame_w, frame_h, border);

        for r in 0..snap.size {
            for c in 0..snap.size {
                let cell = snap.cell(r, c);
                let selected = overlay.delete_cursor == Some(Pos::new(r, c));
                self.draw_tile(fb, start_x, start_y, r as u16, c as u16, cell, selected);
            }
        }

        self.draw_side_panel(fb, snap, overlay, viewport, start_x + frame_w + 2, start_y);

        if snap.game_over {
            let style = CellStyle::new(Rgb::new(255, 255, 255), PANEL_BG).bold();
            let mid_y = start_y + frame_h / 2;
            fb.put_centered(start_x, mid_y, frame_w, " GAME OVER ", style);
            fb.put_centered(start_x, mid_y + 1, frame_w, " n: new game  r: rewind ", style);
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, overlay: &Overlay, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, overlay, viewport, &mut fb);
        fb
    }

    /// Smallest viewport that fits the board and side panel.
    pub fn min_viewport(&self, board_size: usize) -> Viewport {
        let size = board_size as u16;
        Viewport::new(size * self.cell_w + 2 + 22, size * self.cell_h + 2)
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_tile(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        r: u16,
        c: u16,
        cell: CellSnapshot,
        selected: bool,
    ) {
        let px = start_x + 1 + c * self.cell_w;
        let py = start_y + 1 + r * self.cell_h;
        let inner_w = self.cell_w.saturating_sub(1).max(1);
        let inner_h = self.cell_h.saturating_sub(1).max(1);

        let mut style = tile_style(cell);
        if selected {
            style = CellStyle::new(Rgb::new(0, 0, 0), Rgb::new(230, 60, 60)).bold();
        }

        if cell.is_empty() && !selected {
            let dot = CellStyle::new(Rgb::new(90, 90, 100), BOARD_BG).dim();
            fb.put_char(px + inner_w / 2, py + inner_h / 2, '·', dot);
            return;
        }

        fb.fill_rect(px, py, inner_w, inner_h, ' ', style);
        if cell.value > 0 {
            let text = compact_number(u64::from(cell.value));
            fb.put_centered(px, py + inner_h / 2, inner_w, &text, style);
        }
        if let Some(marker) = kind_marker(cell.kind) {
            fb.put_char(px, py, marker, style);
        }
        if let Some(turns) = cell.echo_turns {
            let ch = char::from_digit(u32::from(turns.min(9)), 10).unwrap_or('?');
            fb.put_char(px + inner_w.saturating_sub(1), py, ch, style);
        }
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        overlay: &Overlay,
        viewport: Viewport,
        panel_x: u16,
        start_y: u16,
    ) {
        if panel_x.saturating_add(12) > viewport.width {
            return;
        }

        let label = CellStyle::new(Rgb::new(220, 220, 220), PANEL_BG).bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);
        let dim = value.dim();

        let mut y = start_y;
        let mut row = |fb: &mut FrameBuffer, name: &str, text: &str| {
            fb.put_str(panel_x, y, name, label);
            fb.put_str(panel_x, y + 1, text, value);
            y += 3;
        };
        row(fb, "SCORE", &score_text(snap.score));
        row(fb, "BEST", &score_text(snap.best_score));
        row(fb, "CRYSTALS", &snap.crystals.to_string());
        row(fb, "VOID", &snap.void_crystals.to_string());

        fb.put_str(panel_x, y, "GRAVITY", label);
        let end = fb.put_str(panel_x, y + 1, snap.gravity.as_str(), value);
        fb.put_char(end + 1, y + 1, snap.gravity.arrow(), value);
        if snap.gravity_unstable {
            fb.put_char(end + 3, y + 1, '!', CellStyle::new(Rgb::new(230, 160, 60), PANEL_BG).bold());
        }
        y += 3;

        if overlay.delete_cursor.is_some() {
            fb.put_str(panel_x, y, "DELETE", CellStyle::new(Rgb::new(230, 60, 60), PANEL_BG).bold());
            fb.put_str(panel_x, y + 1, "enter: remove", dim);
            y += 3;
        }
        if let Some(msg) = overlay.message {
            fb.put_str(panel_x, y, msg, dim);
        }
    }
}

fn draw_border(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
    if w < 2 || h < 2 {
        return;
    }

    fb.put_char(x, y, '┌', style);
    fb.put_char(x + w - 1, y, '┐', style);
    fb.put_char(x, y + h - 1, '└', style);
    fb.put_char(x + w - 1, y + h - 1, '┘', style);

    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
}

fn kind_marker(kind: TileKind) -> Option<char> {
    match kind {
        TileKind::Normal => None,
        TileKind::Phase => Some('~'),
        TileKind::Echo => Some('*'),
        TileKind::Portal => Some('@'),
    }
}

/// Colour ramp by exponent, special kinds override the background
fn tile_style(cell: CellSnapshot) -> CellStyle {
    let style = match cell.kind {
        TileKind::Phase => CellStyle::new(Rgb::new(220, 220, 255), Rgb::new(90, 70, 160)),
        TileKind::Echo => CellStyle::new(Rgb::new(20, 20, 20), Rgb::new(120, 210, 200)),
        TileKind::Portal => CellStyle::new(Rgb::new(255, 255, 255), Rgb::new(200, 60, 170)),
        TileKind::Normal => {
            let exp = if cell.value == 0 { 0 } else { cell.value.ilog2() };
            let bg = match exp {
                0 => BOARD_BG,
                1 => Rgb::new(238, 228, 218),
                2 => Rgb::new(237, 224, 200),
                3 => Rgb::new(242, 177, 121),
                4 => Rgb::new(245, 149, 99),
                5 => Rgb::new(246, 124, 95),
                6 => Rgb::new(246, 94, 59),
                7..=9 => Rgb::new(237, 204, 97),
                _ => Rgb::new(60, 58, 50),
            };
            let fg = if exp <= 2 {
                Rgb::new(119, 110, 101)
            } else {
                Rgb::new(249, 246, 242)
            };
            CellStyle::new(fg, bg).bold()
        }
    };
    if cell.phased {
        style.dim()
    } else {
        style
    }
}
