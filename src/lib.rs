//! Grid raycasting engine.
//!
//! Casts one ray per screen column through a 2D cell grid and turns each
//! hit into a vertical wall slice. Drawing is left to the caller: the
//! engine only produces [`renderer::DrawInstruction`]s.

pub mod camera;
pub mod config;
pub mod raycaster;
pub mod renderer;
pub mod vector;
pub mod world;

pub use camera::{InputFlags, Player, View};
pub use config::{ConfigError, EngineConfig};
pub use raycaster::{RayHit, Side, cast};
pub use renderer::{
    DrawInstruction, RenderMode, Screen, WallSlice, draw_list, project_column, sweep,
};
pub use vector::Vec2;
pub use world::{GridCoord, GridMap, MapError};
