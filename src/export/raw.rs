//! RAW heightmap export for game engine imports.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

use crate::grid::Grid;

/// Errors that can occur during RAW export.
#[derive(Error, Debug)]
pub enum RawExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid height range: min ({0}) >= max ({1})")]
    InvalidHeightRange(f32, f32),
}

/// RAW export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RawFormat {
    /// 16-bit unsigned integer, little-endian (Unity default).
    #[default]
    R16LittleEndian,
    /// 16-bit unsigned integer, big-endian.
    R16BigEndian,
    /// 32-bit float, little-endian (high precision).
    R32Float,
}

/// Exports the grid heights (Y values) as a RAW heightmap, row-major.
///
/// # Arguments
/// * `grid` - The generated grid
/// * `path` - Output file path
/// * `format` - RAW format (R16 or R32)
/// * `min_height` - Height mapped to 0 (R16 only)
/// * `max_height` - Height mapped to 65535 (R16 only)
pub fn export_heights_raw(
    grid: &Grid,
    path: &Path,
    format: RawFormat,
    min_height: f32,
    max_height: f32,
) -> Result<(), RawExportError> {
    if format != RawFormat::R32Float && min_height >= max_height {
        return Err(RawExportError::InvalidHeightRange(min_height, max_height));
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let range = max_height - min_height;
    let to_u16 = |h: f32| (((h - min_height) / range).clamp(0.0, 1.0) * 65535.0) as u16;

    for vertex in grid.vertices() {
        let height = vertex.position.y;
        match format {
            RawFormat::R16LittleEndian => writer.write_all(&to_u16(height).to_le_bytes())?,
            RawFormat::R16BigEndian => writer.write_all(&to_u16(height).to_be_bytes())?,
            RawFormat::R32Float => writer.write_all(&height.to_le_bytes())?,
        }
    }

    writer.flush()?;
    Ok(())
}

/// Returns the expected file size for a RAW export.
pub fn expected_file_size(resolution: usize, format: RawFormat) -> u64 {
    let pixels = (resolution as u64) * (resolution as u64);
    match format {
        RawFormat::R16LittleEndian | RawFormat::R16BigEndian => pixels * 2,
        RawFormat::R32Float => pixels * 4,
    }
}
