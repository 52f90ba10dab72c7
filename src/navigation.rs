use crate::assets::Registry;
use crate::atlas::cell_count;
use crate::error::{Error, Result};
use crate::layer::TilemapLayer;
use crate::tileset::Tileset;

/// Open cell.
pub const OPEN: u8 = 0;
/// Blocked cell.
pub const SOLID: u8 = 1;

/// Row-major open/solid grid derived from a map's layers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationGrid {
    width: u32,
    height: u32,
    cells: Vec<u8>,
}

impl NavigationGrid {
    /// All-open grid.
    pub fn open(width: u32, height: u32) -> Result<Self> {
        Ok(NavigationGrid {
            width,
            height,
            cells: vec![OPEN; cell_count(width, height)?],
        })
    }

    /// A cell is solid when any layer holds a solid tile there.
    pub fn from_layers(
        width: u32,
        height: u32,
        layers: &[TilemapLayer],
        tilesets: &Registry<Tileset>,
    ) -> Result<Self> {
        let mut grid = Self::open(width, height)?;

        for layer in layers {
            let tileset = tilesets.get(layer.tileset()).ok_or(Error::DanglingHandle {
                kind: "tileset",
                index: layer.tileset().index(),
            })?;
            // layers always match the map's extent
            for (cell, &id) in grid.cells.iter_mut().zip(layer.tiles()) {
                if *cell == SOLID || id == 0 {
                    continue;
                }
                if tileset.tile_by_id(id)?.solid {
                    *cell = SOLID;
                }
            }
        }
        Ok(grid)
    }

    /// Width in cells.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in cells.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw cells, [`OPEN`] or [`SOLID`].
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Whether `(row, col)` is blocked.
    pub fn is_solid(&self, row: u32, col: u32) -> Result<bool> {
        if row >= self.height || col >= self.width {
            return Err(Error::CellOutOfBounds {
                row,
                col,
                width: self.width,
                height: self.height,
            });
        }
        Ok(self.cells[row as usize * self.width as usize + col as usize] == SOLID)
    }

    /// Number of blocked cells.
    pub fn solid_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c == SOLID).count()
    }
}
