use std::collections::HashSet;

use gridcaster::renderer::{DrawInstruction, WallSlice, pack_rgb};
use gridcaster::{GridCoord, GridMap, Vec2};

use super::texture::WallTextures;

// every Nth column's ray is drawn on the debug map
const MAP_RAY_STRIDE: usize = 8;

#[inline]
fn put(buf: &mut [u32], width: usize, height: usize, x: i32, y: i32, color: u32) {
    if x >= 0 && y >= 0 && (x as usize) < width && (y as usize) < height {
        buf[y as usize * width + x as usize] = color;
    }
}

fn fill_rect(
    buf: &mut [u32],
    width: usize,
    height: usize,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
    color: u32,
) {
    for yy in y..y + h {
        for xx in x..x + w {
            put(buf, width, height, xx, yy, color);
        }
    }
}

/// Bresenham line, both endpoints included.
fn line(x1: i32, y1: i32, x2: i32, y2: i32) -> Vec<(i32, i32)> {
    let mut points = Vec::new();

    let dx = (x2 - x1).abs();
    let dy = (y2 - y1).abs();
    let sx = if x1 < x2 { 1 } else { -1 };
    let sy = if y1 < y2 { 1 } else { -1 };

    let (mut x, mut y) = (x1, y1);
    let mut err = dx - dy;
    loop {
        points.push((x, y));
        if x == x2 && y == y2 {
            break;
        }
        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
    }
    points
}

/// Sky above the horizon, ground below.
pub fn fill_background(buf: &mut [u32], width: usize, height: usize) {
    let sky = pack_rgb(30, 30, 70);
    let ground = pack_rgb(40, 40, 40);

    let mid = height / 2;
    buf[..mid * width].fill(sky);
    buf[mid * width..width * height].fill(ground);
}

pub fn draw_column(
    buf: &mut [u32],
    width: usize,
    height: usize,
    instr: &DrawInstruction,
    textures: &WallTextures,
) {
    match *instr {
        DrawInstruction::Flat {
            screen_x,
            color,
            y_top,
            y_bottom,
        } => {
            let c = color.pack();
            for y in y_top..=y_bottom {
                put(buf, width, height, screen_x as i32, y as i32, c);
            }
        }
        DrawInstruction::Textured {
            screen_x,
            variant,
            texture_column,
            y_top,
            y_bottom,
            v_top,
            v_bottom,
        } => {
            let rows = (y_bottom - y_top + 1) as f32;
            let th = textures.height();
            for y in y_top..=y_bottom {
                let t = (y - y_top) as f32 + 0.5;
                let v = v_top + (v_bottom - v_top) * (t / rows);
                let ty = ((v * th as f32) as u32).min(th - 1);
                let c = textures.sample(variant, texture_column, ty);
                put(buf, width, height, screen_x as i32, y as i32, c);
            }
        }
    }
}

/// Top-down view of the map in the corner of the frame: cells, the rays of
/// the current sweep, the cells they hit, and the player.
pub fn draw_minimap(
    buf: &mut [u32],
    width: usize,
    height: usize,
    map: &GridMap,
    player: Vec2,
    slices: &[WallSlice],
) {
    let cell = ((height / 3) / map.height().max(1)).max(2) as i32;
    let (ox, oy) = (4, 4);
    let scale = |v: f32| (v * cell as f32) as i32;
    let to_px = |p: Vec2| (ox + scale(p.x), oy + scale(p.y));

    let empty = pack_rgb(235, 235, 235);
    let wall = pack_rgb(20, 20, 20);
    let grid = pack_rgb(0, 0, 0);
    let hit = pack_rgb(230, 210, 40);
    let ray = pack_rgb(40, 200, 60);
    let dot = pack_rgb(220, 40, 40);

    // cell just past each intersection, along the ray
    let hit_cells: HashSet<GridCoord> = slices
        .iter()
        .filter_map(|s| {
            let d = s.hit.intersection - player;
            (d != Vec2::ZERO).then(|| (s.hit.intersection + d.normalize() * 1e-3).cell())
        })
        .collect();

    for (c, v) in map.iter() {
        let color = if v == 0 {
            empty
        } else if hit_cells.contains(&c) {
            hit
        } else {
            wall
        };
        let (x, y) = (ox + c.x * cell, oy + c.y * cell);
        fill_rect(buf, width, height, x, y, cell, cell, color);
        fill_rect(buf, width, height, x, y, cell, 1, grid);
        fill_rect(buf, width, height, x, y, 1, cell, grid);
    }

    let (px, py) = to_px(player);
    for s in slices.iter().step_by(MAP_RAY_STRIDE) {
        let (hx, hy) = to_px(s.hit.intersection);
        for (x, y) in line(px, py, hx, hy) {
            put(buf, width, height, x, y, ray);
        }
    }
    fill_rect(buf, width, height, px - 1, py - 1, 3, 3, dot);
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridcaster::renderer::{Rgb, Screen, sweep};
    use gridcaster::{EngineConfig, Player};

    #[test]
    fn line_includes_endpoints() {
        assert_eq!(line(0, 0, 3, 0), vec![(0, 0), (1, 0), (2, 0), (3, 0)]);
        let diag = line(0, 0, 3, 3);
        assert_eq!(diag.len(), 4);
        assert_eq!(diag.last(), Some(&(3, 3)));
    }

    #[test]
    fn background_splits_at_horizon() {
        let mut buf = vec![0u32; 4 * 4];
        fill_background(&mut buf, 4, 4);
        assert_eq!(buf[0], pack_rgb(30, 30, 70));
        assert_eq!(buf[15], pack_rgb(40, 40, 40));
    }

    #[test]
    fn flat_column_fills_span_only() {
        let textures = WallTextures::generate(8, 8);
        let mut buf = vec![0u32; 4 * 6];
        let instr = DrawInstruction::Flat {
            screen_x: 2,
            color: Rgb(1, 2, 3),
            y_top: 1,
            y_bottom: 3,
        };
        draw_column(&mut buf, 4, 6, &instr, &textures);
        let column: Vec<u32> = (0..6).map(|y| buf[y * 4 + 2]).collect();
        let c = pack_rgb(1, 2, 3);
        assert_eq!(column, vec![0, c, c, c, 0, 0]);
    }

    #[test]
    fn textured_column_samples_texture() {
        let textures = WallTextures::generate(8, 8);
        let mut buf = vec![0u32; 8];
        let instr = DrawInstruction::Textured {
            screen_x: 0,
            variant: 2,
            texture_column: 3,
            y_top: 0,
            y_bottom: 7,
            v_top: 0.0,
            v_bottom: 1.0,
        };
        draw_column(&mut buf, 1, 8, &instr, &textures);
        for (y, px) in buf.iter().enumerate() {
            assert_eq!(*px, textures.sample(2, 3, y as u32));
        }
    }

    #[test]
    fn minimap_marks_player() {
        let config = EngineConfig::default();
        let map = config.build_map().unwrap();
        let player = Player::new(Vec2::new(2.5, 2.5), 0.0);
        let screen = Screen {
            width: 96,
            height: 96,
        };
        let slices = sweep(&map, &player.view(&config.camera), screen, 64);

        let mut buf = vec![0u32; 96 * 96];
        draw_minimap(&mut buf, 96, 96, &map, player.pos, &slices);
        // 96 / 3 / 8 = 4 px cells, player at (4 + 10, 4 + 10)
        assert_eq!(buf[14 * 96 + 14], pack_rgb(220, 40, 40));
        assert!(buf.contains(&pack_rgb(230, 210, 40)));
    }
}
