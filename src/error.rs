use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error type for loading definitions and looking up tiles, regions and frames.
#[derive(Debug, Error)]
pub enum Error {
    /// File I/O error while reading a definition or texture
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// File that could not be read
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },
    /// The document is not valid JSON or does not match the expected schema
    #[error("failed to parse {path}: {source}")]
    Json {
        /// Document that failed to parse
        path: PathBuf,
        /// Underlying parse error
        source: serde_json::Error,
    },
    /// The texture cache could not decode an image
    #[error("failed to load texture {path}: {message}")]
    Texture {
        /// Texture path as requested
        path: PathBuf,
        /// Decoder message
        message: String,
    },
    /// A shader failed to compile or link
    #[error("failed to build shader: {0}")]
    Shader(String),
    /// Atlas region index outside `[0, count)`
    #[error("region index {index} out of range (atlas has {count} regions)")]
    RegionOutOfRange {
        /// Requested index
        index: usize,
        /// Number of regions
        count: usize,
    },
    /// Tile id not present in the tileset
    #[error("tile id {id} not found in tileset '{tileset}' ({count} tiles)")]
    TileOutOfRange {
        /// Tileset name
        tileset: String,
        /// Requested 1-based tile id
        id: u32,
        /// Number of tiles
        count: usize,
    },
    /// A tile override key that is not a decimal tile id
    #[error("tile override key '{key}' in tileset '{tileset}' is not a tile id")]
    InvalidTileKey {
        /// Tileset name
        tileset: String,
        /// Offending key
        key: String,
    },
    /// Row/column outside a grid
    #[error("cell ({row}, {col}) outside {width}x{height} grid")]
    CellOutOfBounds {
        /// Requested row
        row: u32,
        /// Requested column
        col: u32,
        /// Grid width in cells
        width: u32,
        /// Grid height in cells
        height: u32,
    },
    /// Animation frame index outside the clip
    #[error("frame {index} out of range for animation '{animation}' ({count} frames)")]
    FrameOutOfRange {
        /// Animation name
        animation: String,
        /// Requested frame index
        index: usize,
        /// Number of frames
        count: usize,
    },
    /// Zero-sized grid cell
    #[error("invalid region size {width}x{height}")]
    InvalidRegionSize {
        /// Region width
        width: u32,
        /// Region height
        height: u32,
    },
    /// Grid with more cells than a `u32` index can address
    #[error("{width}x{height} grid has too many cells")]
    GridTooLarge {
        /// Columns
        width: u32,
        /// Rows
        height: u32,
    },
    /// A handle used with a registry that does not hold it
    #[error("{kind} handle {index} is not in the registry")]
    DanglingHandle {
        /// Resource kind, e.g. "tileset"
        kind: &'static str,
        /// Handle index
        index: usize,
    },
    /// Map layer index outside `[0, count)`
    #[error("layer index {index} out of range (map has {count} layers)")]
    LayerOutOfRange {
        /// Requested index
        index: usize,
        /// Number of layers
        count: usize,
    },
    /// No animation with that name
    #[error("no animation named '{0}'")]
    UnknownAnimation(String),
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
