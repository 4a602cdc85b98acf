//! Normal map export from the estimated vertex normals.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use glam::Vec3;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ImageBuffer, ImageEncoder, Rgb};
use thiserror::Error;

use crate::grid::Grid;

/// Errors that can occur during normal map export.
#[derive(Error, Debug)]
pub enum NormalMapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Grid has no normals at ({0}, {1}); run normal estimation first")]
    MissingNormals(usize, usize),
}

/// Options for normal map export.
#[derive(Debug, Clone)]
pub struct NormalMapOptions {
    pub compression: CompressionType,
    pub filter: FilterType,
}

impl Default for NormalMapOptions {
    fn default() -> Self {
        Self {
            compression: CompressionType::Default,
            filter: FilterType::Adaptive,
        }
    }
}

/// Encodes a world normal (Y up) as tangent-space RGB with blue "out of the image".
fn encode_normal_rgb8(n: Vec3) -> [u8; 3] {
    let tangent = Vec3::new(n.x, n.z, n.y);
    let c = (tangent * 0.5) + Vec3::splat(0.5);
    [
        (c.x.clamp(0.0, 1.0) * 255.0).round() as u8,
        (c.y.clamp(0.0, 1.0) * 255.0).round() as u8,
        (c.z.clamp(0.0, 1.0) * 255.0).round() as u8,
    ]
}

/// Export the grid normals as an RGB PNG.
///
/// Image `x` follows the grid column and `y` the grid row; a flat grid encodes
/// as (128, 128, 255).
pub fn export_normal_map_png(
    grid: &Grid,
    path: &Path,
    options: &NormalMapOptions,
) -> Result<(), NormalMapError> {
    if let Some(coord) = grid.coords().find(|&c| grid.at(c).normal == Vec3::ZERO) {
        return Err(NormalMapError::MissingNormals(coord.row, coord.col));
    }

    let side = grid.resolution() as u32;
    let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_fn(side, side, |x, y| {
        Rgb(encode_normal_rgb8(grid.get(y as usize, x as usize).normal))
    });

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder = PngEncoder::new_with_quality(writer, options.compression, options.filter);
    encoder.write_image(img.as_raw(), side, side, image::ExtendedColorType::Rgb8)?;
    Ok(())
}
