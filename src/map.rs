use std::collections::HashSet;

use crate::assets::{Assets, Handle};
use crate::atlas::cell_count;
use crate::error::{Error, Result};
use crate::layer::TilemapLayer;
use crate::navigation::NavigationGrid;
use crate::render::{Camera, Canvas};
use crate::sprite::Sprite;
use crate::tileset::Tileset;

/// Stacked tilemap layers sharing one extent, plus sprites drawn above them.
///
/// Every layer always has the map's width, height and cell size; the
/// setters here push changes down to all layers.
#[derive(Debug, Clone)]
pub struct Map {
    name: String,
    width: u32,
    height: u32,
    cell_size: u32,
    layers: Vec<TilemapLayer>,
    sprites: Vec<Sprite>,
    navigation: NavigationGrid,
}

impl Map {
    /// Map with no layers.
    pub fn new(name: impl Into<String>, width: u32, height: u32, cell_size: u32) -> Self {
        Map {
            name: name.into(),
            width,
            height,
            cell_size,
            layers: Vec::new(),
            sprites: Vec::new(),
            navigation: NavigationGrid::default(),
        }
    }

    /// Map name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the map.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Width in cells.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in cells.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Cell size in pixels.
    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    /// Width in pixels.
    pub fn width_in_pixels(&self) -> u32 {
        self.width.saturating_mul(self.cell_size)
    }

    /// Height in pixels.
    pub fn height_in_pixels(&self) -> u32 {
        self.height.saturating_mul(self.cell_size)
    }

    /// Resize every layer to `width` columns. On error nothing changes.
    pub fn set_width(&mut self, width: u32) -> Result<()> {
        // all layers share the extent, so one check covers them
        cell_count(width, self.height)?;
        for layer in &mut self.layers {
            layer.set_width(width)?;
        }
        self.width = width;
        Ok(())
    }

    /// Resize every layer to `height` rows. On error nothing changes.
    pub fn set_height(&mut self, height: u32) -> Result<()> {
        cell_count(self.width, height)?;
        for layer in &mut self.layers {
            layer.set_height(height)?;
        }
        self.height = height;
        Ok(())
    }

    /// Change the cell size of every layer.
    pub fn set_cell_size(&mut self, cell_size: u32) {
        self.cell_size = cell_size;
        for layer in &mut self.layers {
            layer.set_cell_size(cell_size);
        }
    }

    /// Layers in draw order.
    pub fn layers(&self) -> &[TilemapLayer] {
        &self.layers
    }

    /// Layer at `index`.
    pub fn layer(&self, index: usize) -> Result<&TilemapLayer> {
        let count = self.layers.len();
        self.layers
            .get(index)
            .ok_or(Error::LayerOutOfRange { index, count })
    }

    /// Mutable layer at `index`. Its extent must be changed through the map.
    pub fn layer_mut(&mut self, index: usize) -> Result<LayerMut<'_>> {
        let count = self.layers.len();
        self.layers
            .get_mut(index)
            .map(LayerMut)
            .ok_or(Error::LayerOutOfRange { index, count })
    }

    /// Append an empty layer on top and return its index.
    pub fn add_layer(
        &mut self,
        name: impl Into<String>,
        tileset: Handle<Tileset>,
    ) -> Result<usize> {
        self.layers.push(TilemapLayer::new(
            name,
            tileset,
            self.width,
            self.height,
            self.cell_size,
        )?);
        Ok(self.layers.len() - 1)
    }

    /// Remove the layer at `index`; layers above it move down.
    pub fn remove_layer(&mut self, index: usize) -> Result<TilemapLayer> {
        if index >= self.layers.len() {
            return Err(Error::LayerOutOfRange {
                index,
                count: self.layers.len(),
            });
        }
        Ok(self.layers.remove(index))
    }

    /// Sprites in draw order.
    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    /// Mutable sprites.
    pub fn sprites_mut(&mut self) -> &mut [Sprite] {
        &mut self.sprites
    }

    /// Append a sprite, drawn after every layer.
    pub fn add_sprite(&mut self, sprite: Sprite) -> usize {
        self.sprites.push(sprite);
        self.sprites.len() - 1
    }

    /// The grid from the last [`Map::generate_navigation_map`] call.
    pub fn navigation_map(&self) -> &NavigationGrid {
        &self.navigation
    }

    /// Rebuild the open/solid grid from all layers.
    pub fn generate_navigation_map(&mut self, assets: &Assets) -> Result<&NavigationGrid> {
        self.navigation =
            NavigationGrid::from_layers(self.width, self.height, &self.layers, &assets.tilesets)?;
        Ok(&self.navigation)
    }

    /// Whether `(row, col)` is blocked in the last generated grid.
    pub fn is_solid(&self, row: u32, col: u32) -> Result<bool> {
        self.navigation.is_solid(row, col)
    }

    /// Tick each tileset and animation player used by the map once.
    pub fn update(&self, assets: &mut Assets, dt: f32) -> Result<()> {
        let mut ticked = HashSet::new();
        for layer in &self.layers {
            if ticked.insert(layer.tileset()) {
                layer.update(&mut assets.tilesets, dt)?;
            }
        }

        let mut ticked = HashSet::new();
        for sprite in &self.sprites {
            if ticked.insert(sprite.player()) {
                sprite.update(&mut assets.players, dt)?;
            }
        }
        Ok(())
    }

    /// Draw layers bottom to top, then sprites.
    pub fn draw(
        &self,
        assets: &Assets,
        camera: &Camera,
        viewport_w: f32,
        viewport_h: f32,
        canvas: &mut impl Canvas,
    ) -> Result<()> {
        for layer in &self.layers {
            layer.draw(&assets.tilesets, camera, viewport_w, viewport_h, canvas)?;
        }
        for sprite in &self.sprites {
            sprite.draw(&assets.players, canvas)?;
        }
        Ok(())
    }
}

/// Mutable access to a map layer that cannot change its extent.
pub struct LayerMut<'a>(&'a mut TilemapLayer);

impl LayerMut<'_> {
    /// Place `tile_id` at `(row, col)`.
    pub fn set_tile(&mut self, tile_id: u32, row: u32, col: u32) -> Result<()> {
        self.0.set_tile(tile_id, row, col)
    }

    /// Clear `(row, col)`.
    pub fn erase_tile(&mut self, row: u32, col: u32) -> Result<()> {
        self.0.erase_tile(row, col)
    }

    /// Rename the layer.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.0.set_name(name);
    }

    /// Point the layer at another tileset.
    pub fn set_tileset(&mut self, tileset: Handle<Tileset>) {
        self.0.set_tileset(tileset);
    }
}

impl std::ops::Deref for LayerMut<'_> {
    type Target = TilemapLayer;

    fn deref(&self) -> &TilemapLayer {
        &*self.0
    }
}
