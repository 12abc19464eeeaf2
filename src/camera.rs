use crate::config::{CameraConfig, MotionConfig};
use crate::vector::Vec2;
use crate::world::GridMap;

/// Input sampled once per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputFlags {
    pub turn_left: bool,
    pub turn_right: bool,
    pub forward: bool,
    pub backward: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub pos: Vec2,  // (x, y) position in grid units
    pub angle: f32, // radians, facing; 0 looks along +x
}

/// Per-frame camera snapshot. Read-only during a sweep.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct View {
    pub origin: Vec2,
    pub forward: Vec2,
    pub plane: Vec2,
}

impl Player {
    pub fn new(pos: Vec2, angle: f32) -> Self {
        Self { pos, angle }
    }

    #[inline]
    pub fn forward(&self) -> Vec2 {
        Vec2::X.rotate(self.angle)
    }

    #[inline]
    pub fn camera_plane(&self, camera: &CameraConfig) -> Vec2 {
        let base = Vec2::new(0.0, camera.plane);
        let base = if camera.normalize_plane {
            base.normalize()
        } else {
            base
        };
        base.rotate(self.angle)
    }

    pub fn view(&self, camera: &CameraConfig) -> View {
        View {
            origin: self.pos,
            forward: self.forward(),
            plane: self.camera_plane(camera),
        }
    }

    /// Advances the player by `dt` ticks.
    ///
    /// Turning happens first, then movement along the new facing. Without
    /// `motion.collide` the player can walk through walls and off the map.
    pub fn update(&mut self, input: InputFlags, dt: f32, motion: &MotionConfig, map: &GridMap) {
        if input.turn_left {
            self.angle += motion.turn_left_rate * dt;
        }
        if input.turn_right {
            self.angle += motion.turn_right_rate * dt;
        }

        let step = self.forward() * (motion.speed * dt);
        let mut delta = Vec2::ZERO;
        if input.forward {
            delta += step;
        }
        if input.backward {
            delta -= step;
        }
        if delta == Vec2::ZERO {
            return;
        }

        if !motion.collide {
            self.pos += delta;
            return;
        }

        // slide along walls: try each axis on its own
        let target = self.pos + delta;
        if map.is_open(target) {
            self.pos = target;
            return;
        }
        let along_x = Vec2::new(target.x, self.pos.y);
        if map.is_open(along_x) {
            self.pos = along_x;
        }
        let along_y = Vec2::new(self.pos.x, target.y);
        if map.is_open(along_y) {
            self.pos = along_y;
        }
        tracing::trace!(x = self.pos.x, y = self.pos.y, "movement clipped by wall");
    }
}
