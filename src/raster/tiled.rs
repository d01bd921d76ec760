//! Tiled images
//!
//! A tiled image is a grid of equally sized rasters. The grid is anchored at
//! a tile grid offset: tile (tx, ty) covers pixels starting at
//! `(offset_x + tx * tile_width, offset_y + ty * tile_height)`. Every tile
//! shares one sample layout.
//!
//! [`TiledSource`] is the read interface iterators are written against.
//! A single [`Raster`] implements it as a one-tile image, which is how a
//! plain raster is handed to the iterator factory.

use log::debug;

use crate::errors::{invalid, TileResult};
use super::data_type::DataType;
use super::region::Region;
use super::sample_layout::SampleLayout;
use super::tile_raster::Raster;

/// Index of the tile column or row containing `pos`
#[inline]
pub fn pos_to_tile(pos: i32, grid_offset: i32, tile_size: i32) -> i32 {
    (pos - grid_offset).div_euclid(tile_size)
}

/// Read access to a tiled image
pub trait TiledSource {
    /// Pixel bounds of the image
    fn bounds(&self) -> Region;

    /// Layout shared by every tile
    fn sample_layout(&self) -> &SampleLayout;

    fn tile_width(&self) -> i32;

    fn tile_height(&self) -> i32;

    fn tile_grid_x_offset(&self) -> i32;

    fn tile_grid_y_offset(&self) -> i32;

    /// The tile at tile index (tile_x, tile_y), if the image has one there
    fn tile(&self, tile_x: i32, tile_y: i32) -> Option<&Raster>;

    fn num_bands(&self) -> usize {
        self.sample_layout().num_bands()
    }

    fn data_type(&self) -> DataType {
        self.sample_layout().data_type()
    }

    fn x_to_tile_x(&self, x: i32) -> i32 {
        pos_to_tile(x, self.tile_grid_x_offset(), self.tile_width())
    }

    fn y_to_tile_y(&self, y: i32) -> i32 {
        pos_to_tile(y, self.tile_grid_y_offset(), self.tile_height())
    }

    fn min_tile_x(&self) -> i32 {
        self.x_to_tile_x(self.bounds().x)
    }

    fn min_tile_y(&self) -> i32 {
        self.y_to_tile_y(self.bounds().y)
    }

    fn num_tiles_x(&self) -> i32 {
        self.x_to_tile_x(self.bounds().end_x() - 1) - self.min_tile_x() + 1
    }

    fn num_tiles_y(&self) -> i32 {
        self.y_to_tile_y(self.bounds().end_y() - 1) - self.min_tile_y() + 1
    }
}

/// Write access to a tiled image
pub trait TiledSourceMut: TiledSource {
    fn tile_mut(&mut self, tile_x: i32, tile_y: i32) -> Option<&mut Raster>;

    /// Every tile, row by row starting at (min_tile_x, min_tile_y)
    fn tiles_mut(&mut self) -> Vec<&mut Raster>;
}

/// An owned grid of tiles
#[derive(Debug, Clone, PartialEq)]
pub struct TiledImage {
    bounds: Region,
    layout: SampleLayout,
    grid_x_offset: i32,
    grid_y_offset: i32,
    min_tile_x: i32,
    min_tile_y: i32,
    tiles_across: i32,
    tiles_down: i32,
    tiles: Vec<Raster>,
}

impl TiledImage {
    /// Create a zero-filled image whose tile grid starts at the top-left corner of `bounds`
    ///
    /// # Arguments
    /// * `bounds` - Pixel bounds of the image
    /// * `tile_layout` - Layout of one tile; its size is the tile size
    pub fn new(bounds: Region, tile_layout: SampleLayout) -> TileResult<Self> {
        TiledImage::with_grid_offset(bounds, tile_layout, bounds.x, bounds.y)
    }

    /// Create a zero-filled image with an explicit tile grid offset
    pub fn with_grid_offset(
        bounds: Region,
        tile_layout: SampleLayout,
        grid_x_offset: i32,
        grid_y_offset: i32,
    ) -> TileResult<Self> {
        if bounds.is_empty() {
            return invalid(format!("image bounds {:?} are empty", bounds));
        }
        let tile_width = tile_layout.width() as i32;
        let tile_height = tile_layout.height() as i32;

        let min_tile_x = pos_to_tile(bounds.x, grid_x_offset, tile_width);
        let min_tile_y = pos_to_tile(bounds.y, grid_y_offset, tile_height);
        let tiles_across = pos_to_tile(bounds.end_x() - 1, grid_x_offset, tile_width) - min_tile_x + 1;
        let tiles_down = pos_to_tile(bounds.end_y() - 1, grid_y_offset, tile_height) - min_tile_y + 1;

        let mut tiles = Vec::with_capacity((tiles_across * tiles_down) as usize);
        for ty in min_tile_y..min_tile_y + tiles_down {
            for tx in min_tile_x..min_tile_x + tiles_across {
                tiles.push(Raster::new(
                    tile_layout.clone(),
                    grid_x_offset + tx * tile_width,
                    grid_y_offset + ty * tile_height,
                )?);
            }
        }

        debug!(
            "Created {}x{} tiled image with {} tiles of {}x{}",
            bounds.width, bounds.height, tiles.len(), tile_width, tile_height
        );

        Ok(TiledImage {
            bounds,
            layout: tile_layout,
            grid_x_offset,
            grid_y_offset,
            min_tile_x,
            min_tile_y,
            tiles_across,
            tiles_down,
            tiles,
        })
    }

    /// Split a raster into tiles of the given size, keeping its layout family
    pub fn from_raster(raster: &Raster, tile_width: usize, tile_height: usize) -> TileResult<Self> {
        let tile_layout = raster.layout().with_size(tile_width, tile_height)?;
        let mut image = TiledImage::new(raster.bounds(), tile_layout)?;
        let bounds = raster.bounds();
        for y in bounds.y..bounds.end_y() {
            for x in bounds.x..bounds.end_x() {
                for b in 0..raster.num_bands() {
                    image.set_sample_double(x, y, b, raster.get_sample_double(x, y, b));
                }
            }
        }
        Ok(image)
    }

    /// Copy the image into one raster covering its bounds
    pub fn to_raster(&self) -> TileResult<Raster> {
        let layout = self.layout.with_size(self.bounds.width as usize, self.bounds.height as usize)?;
        let mut raster = Raster::new(layout, self.bounds.x, self.bounds.y)?;
        for tile in &self.tiles {
            let area = tile.bounds().intersection(&self.bounds);
            for y in area.y..area.end_y() {
                for x in area.x..area.end_x() {
                    for b in 0..tile.num_bands() {
                        raster.set_sample_double(x, y, b, tile.get_sample_double(x, y, b));
                    }
                }
            }
        }
        Ok(raster)
    }

    pub fn tiles(&self) -> &[Raster] {
        &self.tiles
    }

    /// Replace a tile with one of the same bounds and layout
    pub fn put_tile(&mut self, raster: Raster) -> TileResult<()> {
        let tx = self.x_to_tile_x(raster.min_x());
        let ty = self.y_to_tile_y(raster.min_y());
        let layout = self.layout.clone();
        match self.tile_mut(tx, ty) {
            Some(slot) if slot.bounds() == raster.bounds() && *slot.layout() == layout => {
                *slot = raster;
                Ok(())
            }
            Some(slot) => invalid(format!(
                "tile at {:?} does not match the grid tile at {:?}",
                raster.bounds(),
                slot.bounds()
            )),
            None => invalid(format!("no tile at {:?} in this image", raster.bounds())),
        }
    }

    fn tile_index(&self, tile_x: i32, tile_y: i32) -> Option<usize> {
        let col = tile_x - self.min_tile_x;
        let row = tile_y - self.min_tile_y;
        if col < 0 || row < 0 || col >= self.tiles_across || row >= self.tiles_down {
            None
        } else {
            Some((row * self.tiles_across + col) as usize)
        }
    }

    fn tile_at_pixel(&self, x: i32, y: i32) -> &Raster {
        let index = self.tile_index(self.x_to_tile_x(x), self.y_to_tile_y(y));
        match index {
            Some(i) => &self.tiles[i],
            None => panic!("pixel ({}, {}) is outside the image bounds {:?}", x, y, self.bounds),
        }
    }

    fn tile_at_pixel_mut(&mut self, x: i32, y: i32) -> &mut Raster {
        let index = self.tile_index(self.x_to_tile_x(x), self.y_to_tile_y(y));
        match index {
            Some(i) => &mut self.tiles[i],
            None => panic!("pixel ({}, {}) is outside the image bounds {:?}", x, y, self.bounds),
        }
    }

    pub fn get_sample(&self, x: i32, y: i32, band: usize) -> i32 {
        self.tile_at_pixel(x, y).get_sample(x, y, band)
    }

    pub fn get_sample_double(&self, x: i32, y: i32, band: usize) -> f64 {
        self.tile_at_pixel(x, y).get_sample_double(x, y, band)
    }

    pub fn set_sample(&mut self, x: i32, y: i32, band: usize, value: i32) {
        self.tile_at_pixel_mut(x, y).set_sample(x, y, band, value);
    }

    pub fn set_sample_double(&mut self, x: i32, y: i32, band: usize, value: f64) {
        self.tile_at_pixel_mut(x, y).set_sample_double(x, y, band, value);
    }
}

impl TiledSource for TiledImage {
    fn bounds(&self) -> Region {
        self.bounds
    }

    fn sample_layout(&self) -> &SampleLayout {
        &self.layout
    }

    fn tile_width(&self) -> i32 {
        self.layout.width() as i32
    }

    fn tile_height(&self) -> i32 {
        self.layout.height() as i32
    }

    fn tile_grid_x_offset(&self) -> i32 {
        self.grid_x_offset
    }

    fn tile_grid_y_offset(&self) -> i32 {
        self.grid_y_offset
    }

    fn tile(&self, tile_x: i32, tile_y: i32) -> Option<&Raster> {
        self.tile_index(tile_x, tile_y).map(|i| &self.tiles[i])
    }
}

impl TiledSourceMut for TiledImage {
    fn tile_mut(&mut self, tile_x: i32, tile_y: i32) -> Option<&mut Raster> {
        self.tile_index(tile_x, tile_y).map(move |i| &mut self.tiles[i])
    }

    fn tiles_mut(&mut self) -> Vec<&mut Raster> {
        self.tiles.iter_mut().collect()
    }
}

// A raster is a tiled image with exactly one tile whose grid starts at the
// raster origin.
impl TiledSource for Raster {
    fn bounds(&self) -> Region {
        Raster::bounds(self)
    }

    fn sample_layout(&self) -> &SampleLayout {
        self.layout()
    }

    fn tile_width(&self) -> i32 {
        self.width()
    }

    fn tile_height(&self) -> i32 {
        self.height()
    }

    fn tile_grid_x_offset(&self) -> i32 {
        self.min_x()
    }

    fn tile_grid_y_offset(&self) -> i32 {
        self.min_y()
    }

    fn tile(&self, tile_x: i32, tile_y: i32) -> Option<&Raster> {
        (tile_x == 0 && tile_y == 0).then_some(self)
    }
}

impl TiledSourceMut for Raster {
    fn tile_mut(&mut self, tile_x: i32, tile_y: i32) -> Option<&mut Raster> {
        (tile_x == 0 && tile_y == 0).then_some(self)
    }

    fn tiles_mut(&mut self) -> Vec<&mut Raster> {
        vec![self]
    }
}
