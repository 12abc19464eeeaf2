//! Grid traversal (DDA) raycasting.
//!
//! A ray walks cell boundary to cell boundary, always crossing whichever
//! x or y grid line is nearer along the ray, until it enters a wall cell.
//!
//! Precondition: the ray starts inside a [`GridMap`] whose border is all
//! walls. `GridMap` enforces the border on construction; the origin is
//! asserted here. Without both the walk would run off the map.

use crate::vector::Vec2;
use crate::world::GridMap;

/// Step length used for a direction component too small to divide by.
pub const HUGE_STEP: f32 = 1e30;

/// Which grid line family the ray crossed to enter the hit cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// Crossed a vertical line (x = const); the face points along x.
    X,
    /// Crossed a horizontal line (y = const); the face points along y.
    Y,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Point where the ray meets the wall face, in grid units.
    pub intersection: Vec2,
    /// Distance to the wall plane in units of the ray direction. For a
    /// column ray this is the depth along the camera's forward axis.
    pub distance: f32,
    pub side: Side,
    /// Nonzero cell code of the wall that was hit.
    pub variant: u8,
    /// Position along the face, in `[0, 1)`.
    pub wall_u: f32,
    /// Source column in a texture `texture_width` pixels wide.
    pub texture_column: u32,
}

#[inline]
fn unit_step(d: f32) -> f32 {
    if d.abs() < f32::EPSILON {
        HUGE_STEP
    } else {
        (1.0 / d).abs()
    }
}

/// Casts a ray from `origin` along `dir` and returns the first wall it enters.
///
/// `dir` need not be normalized; `distance` is measured in multiples of it.
/// Panics if `origin` is outside the map. `dir` must not be zero.
pub fn cast(map: &GridMap, origin: Vec2, dir: Vec2, texture_width: u32) -> RayHit {
    debug_assert!(dir != Vec2::ZERO, "ray direction must be nonzero");
    debug_assert!(texture_width > 0);

    let mut cell = origin.cell();
    assert!(
        origin.x >= 0.0 && origin.y >= 0.0 && map.contains(cell),
        "ray origin ({}, {}) is outside the map",
        origin.x,
        origin.y
    );

    let unit = Vec2::new(unit_step(dir.x), unit_step(dir.y));

    let (step_x, mut side_x) = if dir.x < 0.0 {
        (-1, (origin.x - cell.x as f32) * unit.x)
    } else {
        (1, (cell.x as f32 + 1.0 - origin.x) * unit.x)
    };
    let (step_y, mut side_y) = if dir.y < 0.0 {
        (-1, (origin.y - cell.y as f32) * unit.y)
    } else {
        (1, (cell.y as f32 + 1.0 - origin.y) * unit.y)
    };

    // distance is the side value before its increment
    let (side, distance, variant) = loop {
        let (side, dist) = if side_x < side_y {
            let d = side_x;
            side_x += unit.x;
            cell.x += step_x;
            (Side::X, d)
        } else {
            let d = side_y;
            side_y += unit.y;
            cell.y += step_y;
            (Side::Y, d)
        };

        let v = map.cell_at(cell);
        if v != 0 {
            break (side, dist, v);
        }
    };

    let along = match side {
        Side::X => origin.y + distance * dir.y,
        Side::Y => origin.x + distance * dir.x,
    };
    let wall_u = along - along.floor();

    let w = texture_width as i64;
    let mut column = (wall_u * texture_width as f32) as i64;
    let mirrored = match side {
        Side::X => dir.x > 0.0,
        Side::Y => dir.y < 0.0,
    };
    if mirrored {
        column = w - column - 1;
    }

    RayHit {
        intersection: origin + dir * distance,
        distance,
        side,
        variant,
        wall_u,
        texture_column: column.rem_euclid(w) as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_east_from_corner_cell() {
        let map = GridMap::reference();
        let hit = cast(&map, Vec2::new(1.5, 1.5), Vec2::X, 64);
        assert_eq!(hit.side, Side::X);
        assert_eq!(hit.variant, 1);
        assert_eq!(hit.distance, 5.5);
        assert_eq!(hit.intersection, Vec2::new(7.0, 1.5));
        assert_eq!(hit.wall_u, 0.5);
    }

    #[test]
    fn distance_scales_with_direction_length() {
        let map = GridMap::reference();
        let unit = cast(&map, Vec2::new(1.5, 1.5), Vec2::X, 64);
        let long = cast(&map, Vec2::new(1.5, 1.5), Vec2::X * 2.0, 64);
        assert!((long.distance * 2.0 - unit.distance).abs() < 1e-6);
        assert_eq!(long.intersection, unit.intersection);
    }

    #[test]
    fn hits_pillar_on_y_side() {
        let map = GridMap::reference();
        // straight down from (2.5, 1.5) meets the pillar top at y = 4
        let hit = cast(&map, Vec2::new(2.5, 1.5), Vec2::Y, 64);
        assert_eq!(hit.side, Side::Y);
        assert_eq!(hit.distance, 2.5);
        assert_eq!(hit.intersection, Vec2::new(2.5, 4.0));
    }

    #[test]
    fn axis_aligned_rays_use_huge_step() {
        assert_eq!(unit_step(0.0), HUGE_STEP);
        assert_eq!(unit_step(1e-9), HUGE_STEP);
        assert_eq!(unit_step(-0.5), 2.0);
    }

    #[test]
    fn texture_column_stays_in_range() {
        let map = GridMap::reference();
        for i in 0..64 {
            let a = i as f32 * 0.1;
            let hit = cast(&map, Vec2::new(4.5, 2.5), Vec2::X.rotate(a), 32);
            assert!(hit.texture_column < 32);
            assert!((0.0..1.0).contains(&hit.wall_u));
        }
    }

    #[test]
    #[should_panic(expected = "outside the map")]
    fn origin_outside_map_panics() {
        let map = GridMap::reference();
        cast(&map, Vec2::new(9.5, 1.5), Vec2::X, 64);
    }
}
