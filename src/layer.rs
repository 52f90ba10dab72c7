use macroquad::math::{vec2, Vec2};

use crate::assets::{Handle, Registry};
use crate::atlas::cell_count;
use crate::error::{Error, Result};
use crate::render::cull::visible_cells;
use crate::render::{Camera, Canvas, RegionDraw};
use crate::tileset::Tileset;

/// One grid of tile ids over a tileset. Id 0 is an empty cell.
#[derive(Debug, Clone)]
pub struct TilemapLayer {
    name: String,
    tileset: Handle<Tileset>,
    width: u32,
    height: u32,
    cell_size: u32,
    grid: Vec<u32>,
}

impl TilemapLayer {
    /// Empty `width`x`height` layer.
    pub fn new(
        name: impl Into<String>,
        tileset: Handle<Tileset>,
        width: u32,
        height: u32,
        cell_size: u32,
    ) -> Result<Self> {
        Ok(TilemapLayer {
            name: name.into(),
            tileset,
            width,
            height,
            cell_size,
            grid: vec![0; cell_count(width, height)?],
        })
    }

    /// Layer name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the layer.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Tileset the ids refer to.
    pub fn tileset(&self) -> Handle<Tileset> {
        self.tileset
    }

    /// Point the layer at another tileset. Ids are kept as they are.
    pub fn set_tileset(&mut self, tileset: Handle<Tileset>) {
        self.tileset = tileset;
    }

    /// Width in cells.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in cells.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Width in pixels.
    pub fn width_in_pixels(&self) -> u32 {
        self.width.saturating_mul(self.cell_size)
    }

    /// Height in pixels.
    pub fn height_in_pixels(&self) -> u32 {
        self.height.saturating_mul(self.cell_size)
    }

    /// Change the width, keeping the overlapping cells.
    pub fn set_width(&mut self, width: u32) -> Result<()> {
        self.resize(width, self.height)
    }

    /// Change the height, keeping the overlapping cells.
    pub fn set_height(&mut self, height: u32) -> Result<()> {
        self.resize(self.width, height)
    }

    /// Cell size in pixels.
    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    /// Change the cell size; the grid is untouched.
    pub fn set_cell_size(&mut self, cell_size: u32) {
        self.cell_size = cell_size;
    }

    /// Raw row-major grid, `width * height` long.
    pub fn tiles(&self) -> &[u32] {
        &self.grid
    }

    #[inline]
    fn index(&self, row: u32, col: u32) -> Result<usize> {
        if row >= self.height || col >= self.width {
            return Err(Error::CellOutOfBounds {
                row,
                col,
                width: self.width,
                height: self.height,
            });
        }
        Ok(row as usize * self.width as usize + col as usize)
    }

    /// Tile id at `(row, col)`.
    pub fn tile(&self, row: u32, col: u32) -> Result<u32> {
        Ok(self.grid[self.index(row, col)?])
    }

    /// Place `tile_id` at `(row, col)`.
    pub fn set_tile(&mut self, tile_id: u32, row: u32, col: u32) -> Result<()> {
        let idx = self.index(row, col)?;
        self.grid[idx] = tile_id;
        Ok(())
    }

    /// Clear `(row, col)`.
    pub fn erase_tile(&mut self, row: u32, col: u32) -> Result<()> {
        self.set_tile(0, row, col)
    }

    /// Reallocate the grid, copying the overlapping top-left block.
    /// Cells outside the new bounds are dropped and new cells are empty.
    /// On error the layer is left as it was.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        let mut grid = vec![0; cell_count(width, height)?];
        let copy_w = self.width.min(width) as usize;
        let copy_h = self.height.min(height) as usize;

        for row in 0..copy_h {
            let src = row * self.width as usize;
            let dst = row * width as usize;
            grid[dst..dst + copy_w].copy_from_slice(&self.grid[src..src + copy_w]);
        }

        self.width = width;
        self.height = height;
        self.grid = grid;
        Ok(())
    }

    /// Advance the tileset's animated tiles.
    pub fn update(&self, tilesets: &mut Registry<Tileset>, dt: f32) -> Result<()> {
        tilesets
            .get_mut(self.tileset)
            .ok_or(Error::DanglingHandle {
                kind: "tileset",
                index: self.tileset.index(),
            })?
            .update(dt);
        Ok(())
    }

    /// Draw the cells a `viewport_w`x`viewport_h` view through `camera` can see.
    pub fn draw(
        &self,
        tilesets: &Registry<Tileset>,
        camera: &Camera,
        viewport_w: f32,
        viewport_h: f32,
        canvas: &mut impl Canvas,
    ) -> Result<()> {
        let tileset = tilesets
            .get(self.tileset)
            .ok_or(Error::DanglingHandle {
                kind: "tileset",
                index: self.tileset.index(),
            })?;
        let Some(range) = visible_cells(
            camera,
            vec2(viewport_w, viewport_h),
            self.cell_size,
            self.width,
            self.height,
        ) else {
            return Ok(());
        };

        let texture = tileset.texture().handle;
        let cs = self.cell_size as f32;
        for (row, col) in range.cells() {
            let id = self.grid[row as usize * self.width as usize + col as usize];
            if id == 0 {
                continue;
            }
            let source = tileset.region_for(id)?;
            let pos: Vec2 = vec2(col as f32 * cs, row as f32 * cs);
            canvas.draw_texture_region(texture, &RegionDraw::at(source, pos));
        }
        Ok(())
    }
}
