#![warn(missing_docs)]

//! Tile-based 2D world building blocks for Macroquad: texture atlases,
//! tilesets with animated tiles, layered tilemaps with a derived
//! navigation grid, and sprites driven by JSON animation sheets.

pub mod animation;
pub mod assets;
pub mod atlas;
pub mod config;
pub mod error;
pub mod layer;
mod loader;
pub mod map;
pub mod navigation;
pub mod render;
pub mod sprite;
pub mod tileset;

pub use animation::{Animation, AnimationDraw, AnimationFrame, AnimationPlayer, SheetKind};
pub use assets::{Assets, Handle, Registry, TextureHandle, TextureInfo, TextureProvider};
pub use atlas::TextureAtlas;
pub use config::{TextureConfig, TextureFilter};
pub use error::{Error, Result};
pub use layer::TilemapLayer;
pub use map::{LayerMut, Map};
pub use navigation::NavigationGrid;
pub use render::{Camera, Canvas, RegionDraw};
pub use sprite::Sprite;
pub use tileset::{Tile, Tileset};
