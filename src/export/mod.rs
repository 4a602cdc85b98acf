//! Export module for saving generated terrain to files.
//!
//! Supports Wavefront OBJ meshes, 16-bit PNG and RAW heightmaps for engine
//! imports, and RGB normal maps.

mod normal_map;
mod obj;
mod png;
mod raw;

pub use normal_map::{export_normal_map_png, NormalMapError, NormalMapOptions};
pub use obj::{export_mesh_obj, write_obj, ObjExportError};
pub use png::{export_heightmap_png, PngExportError, PngExportOptions};
pub use raw::{expected_file_size, export_heights_raw, RawExportError, RawFormat};
