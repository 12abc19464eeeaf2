use rayon::iter::{IntoParallelIterator, ParallelIterator};
use serde::{Deserialize, Serialize};

use crate::camera::View;
use crate::raycaster::{RayHit, Side, cast};
use crate::vector::Vec2;
use crate::world::GridMap;

// Depth floor so a ray starting on a wall face still gets a finite slice.
const MIN_DISTANCE: f32 = 1e-4;

#[inline]
pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    // 0RGB, the layout softbuffer expects
    (b as u32) | ((g as u32) << 8) | ((r as u32) << 16)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    #[inline]
    pub fn pack(self) -> u32 {
        pack_rgb(self.0, self.1, self.2)
    }

    #[inline]
    pub fn scaled(self, k: f32) -> Rgb {
        let f = |c: u8| (c as f32 * k).clamp(0.0, 255.0) as u8;
        Rgb(f(self.0), f(self.1), f(self.2))
    }
}

/// Flat wall colors keyed by cell variant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Color for variant `n` is `colors[(n - 1) % len]`.
    pub colors: Vec<Rgb>,
    /// Brightness multiplier applied to faces hit on the y side.
    pub y_side_tint: f32,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: vec![
                Rgb(200, 200, 200),
                Rgb(180, 180, 250),
                Rgb(250, 180, 180),
                Rgb(180, 250, 180),
            ],
            y_side_tint: 0.6,
        }
    }
}

impl Palette {
    pub fn color(&self, variant: u8, side: Side) -> Rgb {
        let i = (variant.max(1) as usize - 1) % self.colors.len();
        let base = self.colors[i];
        match side {
            Side::X => base,
            Side::Y => base.scaled(self.y_side_tint),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    Flat,
    #[default]
    Textured,
}

impl RenderMode {
    pub fn toggled(self) -> Self {
        match self {
            RenderMode::Flat => RenderMode::Textured,
            RenderMode::Textured => RenderMode::Flat,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Screen {
    pub width: u32,
    pub height: u32,
}

/// One projected screen column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallSlice {
    pub screen_x: u32,
    /// First visible row (inclusive).
    pub y_top: u32,
    /// Last visible row (inclusive).
    pub y_bottom: u32,
    /// Unclipped slice height in pixels; can exceed the screen.
    pub height: f32,
    pub hit: RayHit,
}

/// What the frame driver should draw for one column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawInstruction {
    Flat {
        screen_x: u32,
        color: Rgb,
        y_top: u32,
        y_bottom: u32,
    },
    /// A one pixel wide source column of the wall texture for `variant`,
    /// stretched over `y_top..=y_bottom`. `v_top`/`v_bottom` are the visible
    /// fraction of the texture height, less than `0..1` when the slice is
    /// clipped by the screen edges.
    Textured {
        screen_x: u32,
        variant: u8,
        texture_column: u32,
        y_top: u32,
        y_bottom: u32,
        v_top: f32,
        v_bottom: f32,
    },
}

/// Maps column `x` to `[-1, 1)` across the camera plane.
#[inline]
pub fn camera_x(x: u32, width: u32) -> f32 {
    2.0 * x as f32 / width as f32 - 1.0
}

#[inline]
pub fn column_direction(view: &View, camera_x: f32) -> Vec2 {
    view.forward + view.plane * camera_x
}

pub fn project_column(
    map: &GridMap,
    view: &View,
    screen: Screen,
    x: u32,
    texture_width: u32,
) -> WallSlice {
    let dir = column_direction(view, camera_x(x, screen.width));
    let hit = cast(map, view.origin, dir, texture_width);

    let h = screen.height as f32;
    let hh = 0.5 * h;
    let height = h / hit.distance.max(MIN_DISTANCE);
    let top = (hh - 0.5 * height).max(0.0);
    let bottom = (hh + 0.5 * height).min(h - 1.0);

    WallSlice {
        screen_x: x,
        y_top: top as u32,
        y_bottom: bottom as u32,
        height,
        hit,
    }
}

/// Projects every column of the screen.
///
/// Columns only read `map` and `view`, so they are cast in parallel. The
/// result is in column order and identical to projecting one at a time.
pub fn sweep(map: &GridMap, view: &View, screen: Screen, texture_width: u32) -> Vec<WallSlice> {
    (0..screen.width)
        .into_par_iter()
        .map(|x| project_column(map, view, screen, x, texture_width))
        .collect()
}

impl WallSlice {
    pub fn instruction(
        &self,
        mode: RenderMode,
        palette: &Palette,
        screen: Screen,
    ) -> DrawInstruction {
        match mode {
            RenderMode::Flat => DrawInstruction::Flat {
                screen_x: self.screen_x,
                color: palette.color(self.hit.variant, self.hit.side),
                y_top: self.y_top,
                y_bottom: self.y_bottom,
            },
            RenderMode::Textured => {
                let unclipped_top = 0.5 * screen.height as f32 - 0.5 * self.height;
                let v = |y: f32| ((y - unclipped_top) / self.height).clamp(0.0, 1.0);
                DrawInstruction::Textured {
                    screen_x: self.screen_x,
                    variant: self.hit.variant,
                    texture_column: self.hit.texture_column,
                    y_top: self.y_top,
                    y_bottom: self.y_bottom,
                    v_top: v(self.y_top as f32),
                    v_bottom: v(self.y_bottom as f32 + 1.0),
                }
            }
        }
    }
}

/// Sweep plus draw instructions for a whole frame.
pub fn draw_list(
    map: &GridMap,
    view: &View,
    screen: Screen,
    mode: RenderMode,
    palette: &Palette,
    texture_width: u32,
) -> Vec<DrawInstruction> {
    let slices = sweep(map, view, screen, texture_width);
    tracing::trace!(columns = slices.len(), ?mode, "frame swept");
    slices
        .iter()
        .map(|s| s.instruction(mode, palette, screen))
        .collect()
}
