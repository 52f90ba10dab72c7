use macroquad::logging::{info, warn};
use macroquad::math::Rect;
use std::path::{Path, PathBuf};

use crate::assets::{TextureInfo, TextureProvider};
use crate::atlas::TextureAtlas;
use crate::error::{Error, Result};
use crate::loader::tileset_json::{parse_tileset, JsonTileData};
use crate::loader::{document_dir, json_error, read_document};

/// One cell of a tileset.
///
/// `id` is 1-based; 0 means "empty" in layer grids. Animated tiles cycle
/// their region through `frames` (1-based tile ids of the same tileset).
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    id: u32,
    region_index: usize,
    /// Blocks movement in the navigation grid
    pub solid: bool,
    /// Animation frames as tile ids, empty when not animated
    pub frames: Vec<u32>,
    /// Seconds each frame stays on screen
    pub delay: f32,
    timer: f32,
    current_frame: usize,
}

impl Tile {
    fn new(id: u32, region_index: usize) -> Self {
        Tile {
            id,
            region_index,
            solid: false,
            frames: Vec::new(),
            delay: 0.0,
            timer: 0.0,
            current_frame: 0,
        }
    }

    /// 1-based identity, its position in the tileset plus one.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Atlas region currently shown.
    pub fn region_index(&self) -> usize {
        self.region_index
    }

    /// True when the tile has frames to cycle through.
    pub fn is_animated(&self) -> bool {
        !self.frames.is_empty()
    }

    /// Position in `frames` of the frame being shown.
    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    fn tick(&mut self, dt: f32) {
        if self.frames.is_empty() {
            return;
        }

        self.timer += dt;
        if self.timer >= self.delay {
            self.timer = 0.0;
            self.current_frame = (self.current_frame + 1) % self.frames.len();
            self.region_index = (self.frames[self.current_frame] as usize).saturating_sub(1);
        }
    }
}

/// Catalogue of tiles sliced from one texture at a fixed cell size.
#[derive(Debug, Clone)]
pub struct Tileset {
    name: String,
    texture: TextureInfo,
    texture_path: Option<PathBuf>,
    cell_size: u32,
    atlas: TextureAtlas,
    tiles: Vec<Tile>,
}

impl Tileset {
    /// Slice `texture` into `cell_size` squares, one tile per cell.
    pub fn new(name: impl Into<String>, texture: TextureInfo, cell_size: u32) -> Result<Self> {
        let (atlas, tiles) = generate_tiles(&texture, cell_size)?;
        Ok(Tileset {
            name: name.into(),
            texture,
            texture_path: None,
            cell_size,
            atlas,
            tiles,
        })
    }

    /// Load a tileset definition, resolving its texture relative to the
    /// definition's directory.
    pub fn from_file(path: impl AsRef<Path>, textures: &mut impl TextureProvider) -> Result<Self> {
        let p = path.as_ref();
        let txt = read_document(p)?;
        let doc = parse_tileset(&txt).map_err(json_error(p))?;

        let texture_path = document_dir(p).join(&doc.texture);
        let texture = textures.load_texture(&texture_path)?;

        let mut tileset = Tileset::new(doc.name, texture, doc.cell_size)?;
        tileset.texture_path = Some(texture_path);

        for (key, data) in &doc.tile_datas {
            let id = key.trim().parse::<u32>().map_err(|_| Error::InvalidTileKey {
                tileset: tileset.name.clone(),
                key: key.clone(),
            })?;
            tileset.apply_override(id, data)?;
        }

        info!(
            "Loaded tileset '{}' ({} tiles, {} animated) from {}",
            tileset.name,
            tileset.tiles.len(),
            tileset.tiles.iter().filter(|t| t.is_animated()).count(),
            p.display()
        );
        Ok(tileset)
    }

    // Frames are only replaced, and so only checked, when the same entry
    // also sets `solid`.
    fn apply_override(&mut self, id: u32, data: &JsonTileData) -> Result<()> {
        if let (Some(_), Some(frames)) = (data.solid, &data.frames) {
            if let Some(&bad) = frames.iter().find(|&&f| f == 0 || f as usize > self.tiles.len()) {
                return Err(self.missing(bad));
            }
        }

        let name = self.name.clone();
        let tile = self.tile_by_id_mut(id)?;
        if let Some(delay) = data.delay {
            tile.delay = delay;
        }
        match (data.solid, &data.frames) {
            (Some(solid), frames) => {
                tile.solid = solid;
                if let Some(frames) = frames {
                    tile.frames.clear();
                    tile.frames.extend_from_slice(frames);
                }
            }
            (None, Some(_)) => {
                warn!(
                    "Tileset '{}': frames for tile {} ignored, entry has no 'solid' key",
                    name, id
                );
            }
            (None, None) => {}
        }
        Ok(())
    }

    /// Tileset name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the tileset.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Backing texture.
    pub fn texture(&self) -> TextureInfo {
        self.texture
    }

    /// Path the texture was loaded from, when read from a definition file.
    pub fn texture_path(&self) -> Option<&Path> {
        self.texture_path.as_deref()
    }

    /// Swap the texture. All tiles are rebuilt and per-tile overrides are lost.
    pub fn set_texture(&mut self, texture: TextureInfo) -> Result<()> {
        let (atlas, tiles) = generate_tiles(&texture, self.cell_size)?;
        self.texture = texture;
        self.texture_path = None;
        self.atlas = atlas;
        self.tiles = tiles;
        Ok(())
    }

    /// Cell size in pixels.
    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    /// Change the cell size. All tiles are rebuilt and per-tile overrides are lost.
    pub fn set_cell_size(&mut self, cell_size: u32) -> Result<()> {
        let (atlas, tiles) = generate_tiles(&self.texture, cell_size)?;
        self.cell_size = cell_size;
        self.atlas = atlas;
        self.tiles = tiles;
        Ok(())
    }

    /// Number of tile rows in the texture.
    pub fn rows(&self) -> u32 {
        self.texture.height / self.cell_size
    }

    /// Number of tile columns in the texture.
    pub fn columns(&self) -> u32 {
        self.texture.width / self.cell_size
    }

    /// The grid atlas tiles index into.
    pub fn atlas(&self) -> &TextureAtlas {
        &self.atlas
    }

    /// All tiles; `tiles()[i].id() == i + 1`.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Tile at 0-based position `index`.
    pub fn tile(&self, index: usize) -> Result<&Tile> {
        self.tiles.get(index).ok_or_else(|| {
            let id = u32::try_from(index).map_or(u32::MAX, |i| i.saturating_add(1));
            self.missing(id)
        })
    }

    /// Tile with 1-based `id`.
    pub fn tile_by_id(&self, id: u32) -> Result<&Tile> {
        match id.checked_sub(1) {
            Some(index) => self.tile(index as usize),
            None => Err(self.missing(id)),
        }
    }

    /// Mutable tile with 1-based `id`.
    pub fn tile_by_id_mut(&mut self, id: u32) -> Result<&mut Tile> {
        let err = self.missing(id);
        match id.checked_sub(1) {
            Some(index) => self.tiles.get_mut(index as usize).ok_or(err),
            None => Err(err),
        }
    }

    /// Source rectangle currently shown for tile `id`.
    pub fn region_for(&self, id: u32) -> Result<Rect> {
        let tile = self.tile_by_id(id)?;
        self.atlas.region(tile.region_index)
    }

    /// Advance every animated tile by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        for tile in &mut self.tiles {
            tile.tick(dt);
        }
    }

    fn missing(&self, id: u32) -> Error {
        Error::TileOutOfRange {
            tileset: self.name.clone(),
            id,
            count: self.tiles.len(),
        }
    }
}

fn generate_tiles(texture: &TextureInfo, cell_size: u32) -> Result<(TextureAtlas, Vec<Tile>)> {
    let atlas = TextureAtlas::grid(texture.width, texture.height, cell_size, cell_size)?;
    let count = u32::try_from(atlas.len()).map_err(|_| Error::GridTooLarge {
        width: atlas.width() / cell_size,
        height: atlas.height() / cell_size,
    })?;
    let tiles = (1..=count)
        .map(|id| Tile::new(id, id as usize - 1))
        .collect();
    Ok((atlas, tiles))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::TextureHandle;

    fn sheet(width: u32, height: u32) -> TextureInfo {
        TextureInfo {
            handle: TextureHandle(0),
            width,
            height,
        }
    }

    #[test]
    fn ids_are_one_based_positions() {
        let ts = Tileset::new("garden", sheet(48, 32), 16).unwrap();
        assert_eq!(ts.tiles().len(), 6);
        for (i, tile) in ts.tiles().iter().enumerate() {
            assert_eq!(tile.id(), i as u32 + 1);
            assert_eq!(tile.region_index(), i);
        }
        assert_eq!(ts.columns(), 3);
        assert_eq!(ts.rows(), 2);
        assert_eq!(ts.tile_by_id(6).unwrap().region_index(), 5);
    }

    #[test]
    fn id_zero_and_past_end_fail() {
        let ts = Tileset::new("garden", sheet(32, 16), 16).unwrap();
        assert!(matches!(ts.tile_by_id(0), Err(Error::TileOutOfRange { id: 0, .. })));
        assert!(matches!(ts.tile_by_id(3), Err(Error::TileOutOfRange { id: 3, count: 2, .. })));
    }

    #[test]
    fn animated_tile_wraps_through_frames() {
        let mut ts = Tileset::new("water", sheet(128, 16), 16).unwrap();
        {
            let tile = ts.tile_by_id_mut(3).unwrap();
            tile.frames = vec![3, 5, 7];
            tile.delay = 0.5;
        }

        let mut seen = Vec::new();
        for _ in 0..6 {
            ts.update(0.5);
            seen.push(ts.tile_by_id(3).unwrap().region_index());
        }
        assert_eq!(seen, vec![4, 6, 2, 4, 6, 2]);
    }

    #[test]
    fn tile_waits_for_its_delay() {
        let mut ts = Tileset::new("water", sheet(64, 16), 16).unwrap();
        {
            let tile = ts.tile_by_id_mut(1).unwrap();
            tile.frames = vec![1, 2];
            tile.delay = 0.5;
        }
        ts.update(0.25);
        assert_eq!(ts.tile_by_id(1).unwrap().region_index(), 0);
        ts.update(0.25);
        assert_eq!(ts.tile_by_id(1).unwrap().region_index(), 1);
        assert_eq!(ts.region_for(1).unwrap(), Rect::new(16.0, 0.0, 16.0, 16.0));
    }

    #[test]
    fn static_tiles_never_change() {
        let mut ts = Tileset::new("g", sheet(32, 32), 16).unwrap();
        ts.update(10.0);
        assert!(ts.tiles().iter().enumerate().all(|(i, t)| t.region_index() == i));
    }

    #[test]
    fn cell_size_change_regenerates_tiles() {
        let mut ts = Tileset::new("g", sheet(32, 32), 16).unwrap();
        ts.tile_by_id_mut(1).unwrap().solid = true;
        ts.set_cell_size(8).unwrap();

        assert_eq!(ts.tiles().len(), 16);
        assert!(!ts.tile_by_id(1).unwrap().solid);
        assert!(ts.set_cell_size(0).is_err());
        assert_eq!(ts.cell_size(), 8);
    }

    #[test]
    fn mutable_tiles_keep_their_identity() {
        let mut ts = Tileset::new("g", sheet(32, 16), 16).unwrap();
        {
            let tile = ts.tile_by_id_mut(2).unwrap();
            tile.solid = true;
            tile.frames = vec![1, 2];
            tile.delay = 0.25;
        }
        let tile = ts.tile_by_id(2).unwrap();
        assert_eq!((tile.id(), tile.region_index()), (2, 1));
        assert!(tile.solid);
        assert!(ts.tiles().iter().enumerate().all(|(i, t)| t.id() == i as u32 + 1));
    }

    #[test]
    fn oversized_grid_is_an_error() {
        assert!(matches!(
            Tileset::new("huge", sheet(70_000, 70_000), 1),
            Err(Error::GridTooLarge { .. })
        ));
        let ts = Tileset::new("g", sheet(16, 16), 16).unwrap();
        assert!(matches!(
            ts.tile(usize::MAX),
            Err(Error::TileOutOfRange { id: u32::MAX, .. })
        ));
    }

    #[test]
    fn texture_change_regenerates_tiles() {
        let mut ts = Tileset::new("g", sheet(32, 32), 16).unwrap();
        ts.set_texture(sheet(64, 16)).unwrap();
        assert_eq!(ts.tiles().len(), 4);
        assert_eq!(ts.texture().width, 64);
    }
}
