//! PNG export functionality for heightmaps.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ImageBuffer, ImageEncoder, Luma};
use thiserror::Error;

use crate::grid::Grid;

/// Errors that can occur during PNG export.
#[derive(Error, Debug)]
pub enum PngExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid height range: min ({0}) >= max ({1})")]
    InvalidHeightRange(f32, f32),
}

/// Options for PNG export.
#[derive(Debug, Clone)]
pub struct PngExportOptions {
    /// Minimum height value for normalization.
    pub min_height: f32,
    /// Maximum height value for normalization.
    pub max_height: f32,
    /// PNG compression type.
    pub compression: CompressionType,
    /// PNG filter type.
    pub filter: FilterType,
}

impl Default for PngExportOptions {
    fn default() -> Self {
        Self {
            min_height: -1.0,
            max_height: 1.0,
            compression: CompressionType::Default,
            filter: FilterType::Adaptive,
        }
    }
}

impl PngExportOptions {
    /// Creates options with the height range taken from the grid.
    ///
    /// A perfectly flat grid gets a tiny range so the export stays valid.
    pub fn auto_range(grid: &Grid) -> Self {
        let (min, max) = grid.height_range();
        let max = if max > min { max } else { min + 1e-6 };
        Self {
            min_height: min,
            max_height: max,
            ..Default::default()
        }
    }
}

/// Exports the grid as a 16-bit grayscale PNG heightmap.
///
/// Image `x` follows the grid column and `y` the grid row.
pub fn export_heightmap_png(
    grid: &Grid,
    path: &Path,
    options: &PngExportOptions,
) -> Result<(), PngExportError> {
    let min = options.min_height;
    let max = options.max_height;

    if min >= max {
        return Err(PngExportError::InvalidHeightRange(min, max));
    }

    let side = grid.resolution() as u32;
    let range = max - min;

    let img: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::from_fn(side, side, |x, y| {
        let height = grid.get(y as usize, x as usize).position.y;
        let normalized = ((height - min) / range).clamp(0.0, 1.0);
        Luma([(normalized * 65535.0) as u16])
    });

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder = PngEncoder::new_with_quality(writer, options.compression, options.filter);

    let byte_slice: &[u8] = bytemuck::cast_slice(img.as_raw());
    encoder.write_image(byte_slice, side, side, image::ExtendedColorType::L16)?;

    Ok(())
}
