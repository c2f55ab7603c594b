//! uvtile CLI
//!
//! Normalize tiled mesh UVs and pack textures into seam-safe atlases.

use clap::{Parser, Subcommand};
use image::RgbaImage;
use std::fs;
use std::path::{Path, PathBuf};
use uvtile::atlas::{assess_quality, compose_atlas};
use uvtile::{
    combine_parts, load_mesh, save_mesh, CombineConfig, MeshInfo, MeshPart, ObjExport,
    PackerConfig, SubdivideConfig, UvSubdivider,
};

#[derive(Parser)]
#[command(name = "uvtile")]
#[command(author, version, about = "Split tiled UVs and pack textures into atlases", long_about = None)]
struct Cli {
    /// Log debug detail (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split triangles so every UV fits in the unit square
    Normalize {
        /// Input mesh (.obj or .json)
        #[arg(short, long)]
        input: PathBuf,

        /// Output mesh (.obj or .json)
        #[arg(short, long)]
        output: PathBuf,

        /// UVs above this value (or below 0) trigger subdivision
        #[arg(long, default_value = "1.0")]
        threshold: f32,

        /// Maximum nested splits per source triangle (derived from the UV span by default)
        #[arg(long)]
        max_depth: Option<u32>,
    },

    /// Pack PNG images into one atlas
    Pack {
        /// Input images, in order
        #[arg(short, long, required = true)]
        input: Vec<PathBuf>,

        /// Output atlas PNG
        #[arg(short, long)]
        output: PathBuf,

        /// Atlas side in pixels
        #[arg(long, default_value = "2048")]
        atlas_size: u32,

        /// Minimum padding around each image
        #[arg(long, default_value = "2")]
        padding: u32,

        /// Double the atlas until everything fits
        #[arg(long)]
        grow: bool,

        /// Write the placement data as JSON
        #[arg(long)]
        manifest: Option<PathBuf>,
    },

    /// Show statistics about a mesh
    Info {
        /// Input mesh (.obj or .json)
        #[arg(short, long)]
        input: PathBuf,

        /// UV threshold used to count triangles needing subdivision
        #[arg(long, default_value = "1.0")]
        threshold: f32,
    },

    /// Normalize several mesh parts and merge them onto one atlas
    Combine {
        /// JSON manifest listing textures and parts
        #[arg(short, long)]
        manifest: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,

        /// Base name of the written files
        #[arg(long, default_value = "combined")]
        name: String,

        /// Atlas side in pixels
        #[arg(long, default_value = "2048")]
        atlas_size: u32,

        /// Largest atlas side tried with --grow
        #[arg(long, default_value = "8192")]
        max_atlas_size: u32,

        /// Double the atlas until everything fits
        #[arg(long)]
        grow: bool,

        /// UVs above this value (or below 0) trigger subdivision
        #[arg(long, default_value = "1.0")]
        threshold: f32,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Commands::Normalize {
            input,
            output,
            threshold,
            max_depth,
        } => {
            normalize(&input, &output, threshold, max_depth)?;
        }
        Commands::Pack {
            input,
            output,
            atlas_size,
            padding,
            grow,
            manifest,
        } => {
            let config = PackerConfig::default()
                .with_atlas_size(atlas_size)
                .with_base_padding(padding)
                .with_grow(grow);
            pack(&input, &output, config, manifest.as_deref())?;
        }
        Commands::Info { input, threshold } => {
            show_mesh_info(&input, threshold)?;
        }
        Commands::Combine {
            manifest,
            output,
            name,
            atlas_size,
            max_atlas_size,
            grow,
            threshold,
        } => {
            let config = CombineConfig::default()
                .with_subdivide(SubdivideConfig::default().with_threshold(threshold))
                .with_packer(
                    PackerConfig::default()
                        .with_atlas_size(atlas_size)
                        .with_max_atlas_size(max_atlas_size)
                        .with_grow(grow),
                );
            combine(&manifest, &output, &name, &config)?;
        }
    }

    Ok(())
}

fn normalize(
    input: &Path,
    output: &Path,
    threshold: f32,
    max_depth: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = load_mesh(input)?;

    let mut config = SubdivideConfig::default().with_threshold(threshold);
    if let Some(max_depth) = max_depth {
        config = config.with_max_depth(max_depth);
    }
    let (normalized, stats) = UvSubdivider::with_config(config).subdivide_with_stats(&mesh)?;

    println!(
        "Normalized {} -> {} triangles ({} split, {} shifted, {} vertices added)",
        mesh.triangle_count(),
        normalized.triangle_count(),
        stats.processed_triangles,
        stats.formatted_triangles,
        stats.added_vertices
    );

    save_mesh(&normalized, output)?;
    println!("Wrote {:?}", output);

    Ok(())
}

fn load_images(paths: &[PathBuf]) -> Result<Vec<RgbaImage>, Box<dyn std::error::Error>> {
    paths
        .iter()
        .map(|path| -> Result<RgbaImage, Box<dyn std::error::Error>> {
            let image = image::open(path)
                .map_err(|e| format!("Failed to open {:?}: {}", path, e))?
                .to_rgba8();
            tracing::debug!("Loaded {:?} ({}x{})", path, image.width(), image.height());
            Ok(image)
        })
        .collect()
}

fn pack(
    inputs: &[PathBuf],
    output: &Path,
    config: PackerConfig,
    manifest: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let images = load_images(inputs)?;
    let sizes: Vec<(u32, u32)> = images.iter().map(|image| image.dimensions()).collect();

    let result = config.pack(&sizes)?;
    let atlas = compose_atlas(&result, &images)?;
    atlas.save_png(output)?;

    println!(
        "Packed {} images into {}x{} atlas ({:.1}% used, padding {})",
        images.len(),
        result.atlas_size,
        result.atlas_size,
        result.coverage() * 100.0,
        result.padding
    );
    if let Some(smallest) = sizes.iter().map(|&(w, h)| w.min(h)).min() {
        let report = assess_quality(result.atlas_size, smallest, result.padding);
        println!("  Mipmap quality: {}", report.grade);
        println!("  Recommended minimum texture size: {0}x{0}", report.recommended_min_texture);
    }
    println!("Wrote {:?}", output);

    if let Some(manifest) = manifest {
        fs::write(manifest, serde_json::to_string_pretty(&result)?)?;
        println!("  Manifest: {:?}", manifest);
    }

    Ok(())
}

fn show_mesh_info(input: &Path, threshold: f32) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = load_mesh(input)?;
    let info = MeshInfo::from_mesh(&mesh, threshold);

    println!("\nMesh Info:");
    println!("  Vertices: {}", info.vertex_count);
    println!("  Triangles: {}", info.triangle_count);
    println!(
        "  Attributes: normals={} tangents={} colors={}",
        info.has_normals, info.has_tangents, info.has_colors
    );
    if let Some(bounds) = info.bounds {
        println!("  Bounds: {:?} .. {:?}", bounds.min, bounds.max);
        println!("  Size: {:?}", bounds.dimensions());
        println!("  Center: {:?}", bounds.center());
        println!(
            "  Volume: {:.3}, surface area: {:.3}",
            bounds.volume(),
            bounds.surface_area()
        );
    }
    if let Some(uv_bounds) = info.uv_bounds {
        println!("  UV bounds: {:?} .. {:?}", uv_bounds.min, uv_bounds.max);
    }
    println!("  UVs outside [0,1]: {}", info.out_of_range_uvs);
    println!("  Triangles needing subdivision: {}", info.triangles_over_threshold);

    Ok(())
}

// Combine manifest format
#[derive(serde::Deserialize)]
struct CombineManifest {
    textures: Vec<PathBuf>,
    parts: Vec<PartEntry>,
}

#[derive(serde::Deserialize)]
struct PartEntry {
    mesh: PathBuf,
    #[serde(default)]
    texture: usize,
}

fn combine(
    manifest_path: &Path,
    output_dir: &Path,
    name: &str,
    config: &CombineConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let manifest: CombineManifest = serde_json::from_str(&fs::read_to_string(manifest_path)?)?;
    let base = manifest_path.parent().unwrap_or_else(|| Path::new("."));

    let textures: Vec<PathBuf> = manifest.textures.iter().map(|t| base.join(t)).collect();
    let images = load_images(&textures)?;
    let parts = manifest
        .parts
        .iter()
        .map(|part| -> uvtile::Result<MeshPart> {
            Ok(MeshPart::new(load_mesh(base.join(&part.mesh))?, part.texture))
        })
        .collect::<uvtile::Result<Vec<_>>>()?;

    let output = combine_parts(&parts, &images, config)?;
    println!(
        "Combined {} parts: {} vertices, {} triangles, {}x{} atlas",
        parts.len(),
        output.mesh.vertex_count(),
        output.mesh.triangle_count(),
        output.atlas.width(),
        output.atlas.height()
    );

    let export = ObjExport::from_combined(&output, name)?;
    export.write_to_dir(output_dir)?;
    if let Some(pack) = &output.pack {
        fs::write(
            output_dir.join(format!("{}_pack.json", name)),
            serde_json::to_string_pretty(pack)?,
        )?;
    }
    println!("Exported {}.obj to {:?}", name, output_dir);

    Ok(())
}
