use macroquad::math::Rect;

use crate::error::{Error, Result};

/// Rectangular regions carved out of one texture's pixel area.
///
/// Regions are addressed by position. Removing a region shifts every later
/// index down by one, so indices are not stable across removals.
#[derive(Debug, Clone)]
pub struct TextureAtlas {
    width: u32,
    height: u32,
    region_w: u32,
    region_h: u32,
    regions: Vec<Rect>,
}

impl TextureAtlas {
    /// Empty atlas over a `width`x`height` texture. `region_w`/`region_h`
    /// are only used by [`TextureAtlas::create_grid`].
    pub fn new(width: u32, height: u32, region_w: u32, region_h: u32) -> Self {
        TextureAtlas {
            width,
            height,
            region_w,
            region_h,
            regions: Vec::new(),
        }
    }

    /// Atlas already sliced into a uniform grid.
    pub fn grid(width: u32, height: u32, region_w: u32, region_h: u32) -> Result<Self> {
        let mut atlas = Self::new(width, height, region_w, region_h);
        atlas.create_grid()?;
        Ok(atlas)
    }

    /// Width of the source texture in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of the source texture in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Grid cell width.
    pub fn region_width(&self) -> u32 {
        self.region_w
    }

    /// Grid cell height.
    pub fn region_height(&self) -> u32 {
        self.region_h
    }

    /// All regions in index order.
    pub fn regions(&self) -> &[Rect] {
        &self.regions
    }

    /// Number of regions.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// True when the atlas has no regions.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Region at `index`.
    pub fn region(&self, index: usize) -> Result<Rect> {
        self.regions
            .get(index)
            .copied()
            .ok_or(Error::RegionOutOfRange {
                index,
                count: self.regions.len(),
            })
    }

    /// Append a region and return its index.
    pub fn add_region(&mut self, source: Rect) -> usize {
        self.regions.push(source);
        self.regions.len() - 1
    }

    /// Remove the region at `index`, shifting later regions down.
    pub fn remove_region(&mut self, index: usize) -> Result<Rect> {
        if index >= self.regions.len() {
            return Err(Error::RegionOutOfRange {
                index,
                count: self.regions.len(),
            });
        }
        Ok(self.regions.remove(index))
    }

    /// Append `cols * rows` regions in row-major order starting at (0,0).
    /// Edge pixels that do not fill a whole cell are left out.
    pub fn create_grid(&mut self) -> Result<()> {
        if self.region_w == 0 || self.region_h == 0 {
            return Err(Error::InvalidRegionSize {
                width: self.region_w,
                height: self.region_h,
            });
        }

        let cols = self.width / self.region_w;
        let rows = self.height / self.region_h;
        self.regions.reserve(cell_count(cols, rows)?);

        for row in 0..rows {
            for col in 0..cols {
                self.regions.push(Rect::new(
                    (col * self.region_w) as f32,
                    (row * self.region_h) as f32,
                    self.region_w as f32,
                    self.region_h as f32,
                ));
            }
        }
        Ok(())
    }
}

/// Cell count of a `width`x`height` grid. Every cell must be addressable
/// by a `u32`.
pub(crate) fn cell_count(width: u32, height: u32) -> Result<usize> {
    let cells = u64::from(width) * u64::from(height);
    if cells > u64::from(u32::MAX) {
        return Err(Error::GridTooLarge { width, height });
    }
    Ok(cells as usize)
}
