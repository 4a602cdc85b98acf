//! terrain-gen CLI - diamond-square heightfield generator.
//!
//! Generates a fractal terrain and exports it as a mesh, heightmap or
//! normal map.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use fractal_terrain::export::{
    export_heightmap_png, export_heights_raw, export_mesh_obj, export_normal_map_png,
    NormalMapOptions, PngExportOptions, RawFormat,
};
use fractal_terrain::terrain::{index_count_for_depth, TerrainConfig};
use fractal_terrain::{MeshVertex, Terrain, Vertex};

/// Diamond-square terrain generator.
#[derive(Parser)]
#[command(name = "terrain-gen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a terrain and export it.
    Generate(GenerateArgs),

    /// Display grid and memory figures for a recursion depth.
    Info {
        /// Recursion depth (grid is 2^depth + 1 vertices wide).
        #[arg(short, long, default_value = "9")]
        depth: u32,
    },
}

#[derive(Args)]
struct GenerateArgs {
    /// TOML file with terrain parameters. Flags override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Recursion depth (grid is 2^depth + 1 vertices wide).
    #[arg(short, long)]
    depth: Option<u32>,

    /// Physical extent along X.
    #[arg(long)]
    size_x: Option<f32>,

    /// Physical extent along Z.
    #[arg(long)]
    size_z: Option<f32>,

    /// Roughness in (2, 3]; higher is smoother.
    #[arg(long)]
    fractal_dimension: Option<f32>,

    /// Scale applied to displacement variance.
    #[arg(long)]
    height_factor: Option<f32>,

    /// Random seed for reproducible generation.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Output directory for generated files.
    #[arg(short, long, default_value = "./output")]
    output: PathBuf,

    /// Base name for output files.
    #[arg(short, long, default_value = "terrain")]
    name: String,

    /// Export format.
    #[arg(short, long, default_value = "obj")]
    format: ExportFormat,

    /// Also export an RGB normal map PNG.
    #[arg(long)]
    normal_map: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    /// Wavefront OBJ mesh with normals.
    Obj,
    /// 16-bit grayscale PNG heightmap.
    Png,
    /// 16-bit RAW little-endian heightmap.
    Raw,
    /// 32-bit float RAW heightmap.
    RawFloat,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => run_generate(args),
        Commands::Info { depth } => run_info(depth),
    }
}

fn fail(context: &str, err: impl std::fmt::Display) -> ! {
    error!("{}: {}", context, err);
    std::process::exit(1);
}

fn resolve_config(args: &GenerateArgs) -> TerrainConfig {
    let mut config = match &args.config {
        Some(path) => TerrainConfig::load(path)
            .unwrap_or_else(|e| fail(&format!("Error loading {}", path.display()), e)),
        None => TerrainConfig::default(),
    };

    if let Some(depth) = args.depth {
        config.recursion_depth = depth;
    }
    if let Some(x) = args.size_x {
        config.size.x = x;
    }
    if let Some(z) = args.size_z {
        config.size.y = z;
    }
    if let Some(d) = args.fractal_dimension {
        config.fractal_dimension = d;
    }
    if let Some(h) = args.height_factor {
        config.height_factor = h;
    }
    config
}

fn run_generate(args: GenerateArgs) {
    let config = resolve_config(&args);

    // Generate seed if not provided
    let seed = args.seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default()
    });

    info!(
        depth = config.recursion_depth,
        size = ?config.size,
        fractal_dimension = config.fractal_dimension,
        height_factor = config.height_factor,
        seed,
        "generating terrain"
    );

    let start = Instant::now();
    let terrain = Terrain::new(config, seed).unwrap_or_else(|e| fail("Error during generation", e));
    let (min_h, max_h) = terrain.height_range();
    info!(
        "Generated {}x{} grid in {:.2?}, height range [{:.4}, {:.4}]",
        terrain.grid().resolution(),
        terrain.grid().resolution(),
        start.elapsed(),
        min_h,
        max_h
    );

    std::fs::create_dir_all(&args.output)
        .unwrap_or_else(|e| fail("Error creating output directory", e));

    let export_start = Instant::now();
    let name = &args.name;

    match args.format {
        ExportFormat::Obj => {
            let path = args.output.join(format!("{}.obj", name));
            export_mesh_obj(&terrain.mesh(), &path).unwrap_or_else(|e| fail("Error exporting OBJ", e));
            info!("Exported mesh: {}", path.display());
        }
        ExportFormat::Png => {
            let path = args.output.join(format!("{}.png", name));
            let options = PngExportOptions::auto_range(terrain.grid());
            export_heightmap_png(terrain.grid(), &path, &options)
                .unwrap_or_else(|e| fail("Error exporting PNG", e));
            info!("Exported heightmap: {}", path.display());
        }
        ExportFormat::Raw | ExportFormat::RawFloat => {
            let format = match args.format {
                ExportFormat::RawFloat => RawFormat::R32Float,
                _ => RawFormat::R16LittleEndian,
            };
            let path = args.output.join(format!("{}.raw", name));
            let max_h = if max_h > min_h { max_h } else { min_h + 1e-6 };
            export_heights_raw(terrain.grid(), &path, format, min_h, max_h)
                .unwrap_or_else(|e| fail("Error exporting RAW", e));
            info!("Exported RAW heightmap ({:?}): {}", format, path.display());
        }
    }

    if args.normal_map {
        let path = args.output.join(format!("{}_normal.png", name));
        export_normal_map_png(terrain.grid(), &path, &NormalMapOptions::default())
            .unwrap_or_else(|e| fail("Error exporting normal map", e));
        info!("Exported normal map: {}", path.display());
    }

    info!("Export completed in {:.2?}", export_start.elapsed());
}

fn run_info(depth: u32) {
    let config = TerrainConfig {
        recursion_depth: depth,
        ..Default::default()
    };
    if let Err(e) = config.validate() {
        fail("Invalid depth", e);
    }

    let side = config.resolution() as u64;
    let vertices = side * side;
    let indices = index_count_for_depth(depth) as u64;

    let bytes_grid = vertices * std::mem::size_of::<Vertex>() as u64;
    let bytes_vertex_buffer = vertices * MeshVertex::STRIDE as u64;
    let bytes_index_buffer = indices * 4;
    let mb = |b: u64| b as f64 / 1024.0 / 1024.0;

    println!("terrain-gen - Grid Configuration Info");
    println!("=====================================");
    println!();
    println!("Recursion depth: {}", depth);
    println!("Grid:            {}x{}", side, side);
    println!("Vertices:        {:>12}", vertices);
    println!("Triangles:       {:>12}", indices / 3);
    println!("Indices:         {:>12}", indices);
    println!();
    println!("Memory usage:");
    println!("  Grid:          {:>12} bytes ({:.2} MB)", bytes_grid, mb(bytes_grid));
    println!("  Vertex buffer: {:>12} bytes ({:.2} MB)", bytes_vertex_buffer, mb(bytes_vertex_buffer));
    println!("  Index buffer:  {:>12} bytes ({:.2} MB)", bytes_index_buffer, mb(bytes_index_buffer));
}
