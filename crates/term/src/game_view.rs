//! GameView: maps a [`GameFlow`] into a terminal framebuffer.
//!
//! The pit is shown twice, side by side:
//!
//! - a **side view** looking along the camera's forward axis, one terminal row
//!   per layer, nearest block wins and farther blocks are drawn darker;
//! - a **plan view** from above, forward pointing up the screen, each column
//!   showing its highest block (higher is brighter).
//!
//! Both follow the camera yaw, so the movement keys always match what is on
//! screen. A HUD sits under the plan view, with a guide saying which axis each
//! rotation key turns at the current yaw. A side panel previews the next and
//! held shapes from above (+X to the right, +Z up).
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{Dims, GameFlow, Shape, ShapeId};
use crate::fb::{FrameBuffer, Glyph, Style};
use crate::input::{CameraYaw, RotateKey};
use crate::types::{Axis, Cell, Rgb};

const BLOCK: char = '█';
const EMPTY: char = '·';
const PIP: char = '◆';
const GAP: u16 = 2;
/// Preview box size in grid cells.
const PREVIEW_COLS: i32 = 5;
const PREVIEW_ROWS: i32 = 4;
/// Rows taken by one preview slot: label, box, shape name.
const PREVIEW_SLOT_H: u16 = PREVIEW_ROWS as u16 + 2;
const MAX_PIPS: u8 = 5;

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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// Mapping between plan-view screen positions and grid columns for one yaw.
///
/// Plan column 0 is the camera's left; plan row 0 is the far side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Projection {
    yaw: u8,
    width: i32,
    depth: i32,
}

impl Projection {
    pub fn new(dims: Dims, yaw: u8) -> Self {
        Self {
            yaw: yaw & 3,
            width: dims.width,
            depth: dims.depth,
        }
    }

    /// `(columns, rows)` of the plan view.
    pub fn plan_size(&self) -> (i32, i32) {
        if self.yaw & 1 == 0 {
            (self.width, self.depth)
        } else {
            (self.depth, self.width)
        }
    }

    /// Grid `(x, z)` under plan position `(col, row)`.
    pub fn plan_to_grid(&self, col: i32, row: i32) -> (i32, i32) {
        let (w, d) = (self.width, self.depth);
        match self.yaw {
            0 => (col, d - 1 - row),
            1 => (w - 1 - row, d - 1 - col),
            2 => (w - 1 - col, row),
            _ => (row, col),
        }
    }
}

fn pit_bg() -> Rgb {
    Rgb::new(30, 30, 40)
}

fn block_style(color: Rgb, bold: bool) -> Style {
    Style {
        fg: color,
        bg: pit_bg(),
        bold,
        dim: false,
    }
}

fn empty_style() -> Style {
    Style {
        fg: Rgb::new(90, 90, 100),
        bg: pit_bg(),
        bold: false,
        dim: true,
    }
}

/// Frame layout computed once per render.
struct Layout {
    side_x: u16,
    plan_x: u16,
    panel_x: u16,
    top_y: u16,
    frame_w: u16,
    side_h: u16,
    plan_h: u16,
}

/// A lightweight terminal renderer for the 3D pit.
pub struct GameView {
    /// Grid cell width in terminal columns.
    cell_w: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // 2 columns per cell roughly squares up typical terminal glyphs.
        Self {
            cell_w: 2,
            anchor_y: AnchorY::Center,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(&self, game: &GameFlow, yaw: u8, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Glyph::default());

        let grid = game.grid();
        let proj = Projection::new(grid.dims(), yaw);
        let layout = self.layout(&proj, grid.height(), viewport);

        let active = game.active_cells();
        let active_color = game
            .active()
            .and_then(|p| game.catalog().get(p.shape()))
            .map(|s| s.color());

        let border = Style::fg(Rgb::new(200, 200, 200));
        draw_border(fb, layout.side_x, layout.top_y, layout.frame_w, layout.side_h, border);
        draw_border(fb, layout.plan_x, layout.top_y, layout.frame_w, layout.plan_h, border);

        self.draw_side(fb, game, &proj, &layout, &active, active_color);
        self.draw_plan(fb, game, &proj, &layout, &active, active_color);
        self.draw_hud(fb, game, yaw, &layout, viewport);
        self.draw_previews(fb, game, &layout);

        let hud = game.hud();
        if hud.game_over {
            draw_overlay_text(fb, &layout, "GAME OVER");
        } else if hud.paused {
            draw_overlay_text(fb, &layout, "PAUSED");
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, game: &GameFlow, yaw: u8, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(game, yaw, viewport, &mut fb);
        fb
    }

    fn layout(&self, proj: &Projection, height: i32, viewport: Viewport) -> Layout {
        let (cols, rows) = proj.plan_size();
        let frame_w = (cols as u16).saturating_mul(self.cell_w).saturating_add(2);
        let side_h = (height as u16).saturating_add(2);
        let plan_h = (rows as u16).saturating_add(2);

        let panel_w = (PREVIEW_COLS as u16).saturating_mul(self.cell_w);
        let total_w = frame_w
            .saturating_mul(2)
            .saturating_add(GAP * 2)
            .saturating_add(panel_w);
        let side_x = viewport.width.saturating_sub(total_w) / 2;
        let top_y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(side_h) / 2,
            AnchorY::Top => 0,
        };

        let plan_x = side_x.saturating_add(frame_w).saturating_add(GAP);
        Layout {
            side_x,
            plan_x,
            panel_x: plan_x.saturating_add(frame_w).saturating_add(GAP),
            top_y,
            frame_w,
            side_h,
            plan_h,
        }
    }

    fn draw_side(
        &self,
        fb: &mut FrameBuffer,
        game: &GameFlow,
        proj: &Projection,
        layout: &Layout,
        active: &[Cell],
        active_color: Option<Rgb>,
    ) {
        let grid = game.grid();
        let (cols, rows) = proj.plan_size();
        let height = grid.height();

        for col in 0..cols {
            for y in 0..height {
                // Nearest row to the camera is the last plan row.
                let hit = (0..rows).rev().enumerate().find_map(|(dist, row)| {
                    let (x, z) = proj.plan_to_grid(col, row);
                    let c = Cell::new(x, y, z);
                    if active.contains(&c) {
                        return active_color.map(|color| block_style(color, true));
                    }
                    grid.get(c).map(|b| {
                        let shade = 10 - (dist as u16).min(6);
                        block_style(b.color.scaled(shade, 10), false)
                    })
                });

                let px = layout.side_x + 1 + col as u16 * self.cell_w;
                let py = layout.top_y + 1 + (height - 1 - y) as u16;
                match hit {
                    Some(style) => fb.fill_rect(px, py, self.cell_w, 1, BLOCK, style),
                    None => fb.fill_rect(px, py, self.cell_w, 1, EMPTY, empty_style()),
                }
            }
        }
    }

    fn draw_plan(
        &self,
        fb: &mut FrameBuffer,
        game: &GameFlow,
        proj: &Projection,
        layout: &Layout,
        active: &[Cell],
        active_color: Option<Rgb>,
    ) {
        let grid = game.grid();
        let (cols, rows) = proj.plan_size();
        let height = grid.height().max(1) as u16;

        for row in 0..rows {
            for col in 0..cols {
                let (x, z) = proj.plan_to_grid(col, row);
                let over = active.iter().any(|c| c.x == x && c.z == z);

                let (ch, style) = match (over, active_color, grid.top_block(x, z)) {
                    (true, Some(color), _) => (BLOCK, block_style(color, true)),
                    (_, _, Some((y, block))) => {
                        let shade = 4 + 6 * (y as u16 + 1) / height;
                        (BLOCK, block_style(block.color.scaled(shade, 10), false))
                    }
                    _ => (EMPTY, empty_style()),
                };

                let px = layout.plan_x + 1 + col as u16 * self.cell_w;
                let py = layout.top_y + 1 + row as u16;
                fb.fill_rect(px, py, self.cell_w, 1, ch, style);
            }
        }
    }

    fn draw_hud(&self, fb: &mut FrameBuffer, game: &GameFlow, yaw: u8, layout: &Layout, viewport: Viewport) {
        let hud = game.hud();
        let label = label_style();
        let value = Style::fg(Rgb::new(200, 200, 200));
        let dim = value.dim();

        let x = layout.plan_x;
        let mut y = layout.top_y.saturating_add(layout.plan_h).saturating_add(1);

        let rows: [(&str, u32); 4] = [
            ("SCORE ", hud.score),
            ("LEVEL ", hud.level),
            ("LAYERS", hud.layers_cleared),
            ("VIEW  ", u32::from(yaw & 3)),
        ];

        for (name, number) in rows {
            if y >= viewport.height {
                return;
            }
            let vx = fb.put_str(x, y, name, label).saturating_add(1);
            fb.put_u32(vx, y, number, value);
            y = y.saturating_add(1);
        }

        if y >= viewport.height {
            return;
        }
        let camera = CameraYaw::new(i32::from(yaw));
        let mut gx = fb.put_str(x, y, "ROTATE", label).saturating_add(1);
        for (key, rotate_key) in [
            ("1=", RotateKey::One),
            ("2=", RotateKey::Two),
            ("3=", RotateKey::Three),
        ] {
            gx = fb.put_str(gx, y, key, value);
            gx = fb.put_str(gx, y, axis_label(camera.rotation_axis(rotate_key)), value);
            gx = gx.saturating_add(1);
        }
        y = y.saturating_add(1);

        if y < viewport.height {
            let after = fb.put_u32(x, y, hud.fall_interval_ms, dim);
            fb.put_str(after, y, "ms/layer", dim);
        }
    }

    /// Next and hold slots in the side panel.
    fn draw_previews(&self, fb: &mut FrameBuffer, game: &GameFlow, layout: &Layout) {
        let hud = game.hud();
        let catalog = game.catalog();
        let slots = [
            ("NEXT", hud.next, false),
            ("HOLD", hud.held, !hud.can_hold),
        ];

        let mut y = layout.top_y;
        for (name, id, dim) in slots {
            let shape = id.and_then(|id: ShapeId| catalog.get(id));
            fb.put_str(layout.panel_x, y, name, label_style());
            if let Some(shape) = shape {
                self.draw_preview(fb, layout.panel_x, y.saturating_add(1), shape, dim);
            }
            draw_shape_name(fb, layout.panel_x, y.saturating_add(PREVIEW_SLOT_H - 1), shape, dim);
            y = y.saturating_add(PREVIEW_SLOT_H + 1);
        }
    }

    /// Shape cells projected onto XZ, centred in the preview box.
    fn draw_preview(&self, fb: &mut FrameBuffer, x: u16, y: u16, shape: &Shape, dim: bool) {
        let cells = shape.cells();
        let (Some(min_x), Some(max_x), Some(min_z), Some(max_z)) = (
            cells.iter().map(|c| c.x).min(),
            cells.iter().map(|c| c.x).max(),
            cells.iter().map(|c| c.z).min(),
            cells.iter().map(|c| c.z).max(),
        ) else {
            return;
        };

        let off_col = (PREVIEW_COLS - (max_x - min_x + 1)).max(0) / 2;
        let off_row = (PREVIEW_ROWS - (max_z - min_z + 1)).max(0) / 2;
        let mut style = block_style(shape.color(), false);
        style.dim = dim;

        for c in cells {
            let col = c.x - min_x + off_col;
            let row = max_z - c.z + off_row;
            if !(0..PREVIEW_COLS).contains(&col) || !(0..PREVIEW_ROWS).contains(&row) {
                continue;
            }
            let px = x.saturating_add(col as u16 * self.cell_w);
            fb.fill_rect(px, y.saturating_add(row as u16), self.cell_w, 1, BLOCK, style);
        }
    }
}

fn label_style() -> Style {
    Style::fg(Rgb::new(220, 220, 220)).bold()
}

fn axis_label(axis: Axis) -> &'static str {
    match axis {
        Axis::X => "X",
        Axis::Y => "Y",
        Axis::Z => "Z",
    }
}

/// Shape id followed by one pip per complexity tier.
fn draw_shape_name(fb: &mut FrameBuffer, x: u16, y: u16, shape: Option<&Shape>, dim: bool) {
    let mut style = Style::fg(Rgb::new(200, 200, 200));
    style.dim = dim;
    let Some(shape) = shape else {
        fb.put_str(x, y, "-", style);
        return;
    };
    let mut px = fb.put_str(x, y, shape.id(), style).saturating_add(1);
    for _ in 0..shape.complexity().min(MAX_PIPS) {
        fb.put_char(px, y, PIP, Style::fg(shape.color()));
        px = px.saturating_add(1);
    }
}

fn draw_border(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: Style) {
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

fn draw_overlay_text(fb: &mut FrameBuffer, layout: &Layout, text: &str) {
    let mid_y = layout.top_y.saturating_add(layout.side_h / 2);
    let text_w = text.chars().count() as u16;
    let x = layout
        .side_x
        .saturating_add(layout.frame_w.saturating_sub(text_w) / 2);
    fb.put_str(x, mid_y, text, Style::fg(Rgb::new(255, 255, 255)).bold());
}
