//! gltf-import - glTF static mesh importer
//!
//! Imports every static mesh of a `.gltf` scene and writes the combined raw
//! meshes as JSON.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use gltf_import::{import_file, inspect, ImportOptions, JsonMeshWriter};

#[derive(Parser)]
#[command(name = "gltf-import")]
#[command(about = "glTF static mesh importer")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import the static meshes of a glTF file
    Import {
        /// Input .gltf file
        input: PathBuf,

        /// Output directory (defaults to the input's folder)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Import options TOML file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Mesh scale ratio (overrides config)
        #[arg(long)]
        scale: Option<f32>,

        /// Flip triangle winding and normals
        #[arg(long)]
        invert_normal: bool,

        /// Ignore file normals and let the builder recompute them
        #[arg(long)]
        recompute_normals: bool,

        /// Ignore file tangents and let the builder recompute them
        #[arg(long)]
        recompute_tangents: bool,
    },

    /// Show scenes, meshes and buffers of a glTF file
    Inspect {
        /// Input .gltf file
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Import {
            input,
            output,
            config,
            scale,
            invert_normal,
            recompute_normals,
            recompute_tangents,
        } => {
            let mut options = match config {
                Some(path) => ImportOptions::load(&path)?,
                None => ImportOptions::default(),
            };
            if let Some(scale) = scale {
                options.mesh_scale_ratio = scale;
            }
            options.invert_normal |= invert_normal;
            options.recompute_normals |= recompute_normals;
            options.recompute_tangents |= recompute_tangents;

            let output = output.unwrap_or_else(|| {
                input
                    .parent()
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("."))
            });
            tracing::info!("Importing {:?} -> {:?}", input, output);

            let mut writer = JsonMeshWriter::new(output);
            let report = import_file(&input, &options, &mut writer)?;

            if report.is_empty() {
                anyhow::bail!("No mesh was imported from {:?}", input);
            }
            tracing::info!(
                "Done! {} meshes imported, {} failed",
                report.imported.len(),
                report.failed.len()
            );
        }

        Commands::Inspect { input } => {
            inspect::inspect_file(&input)?;
        }
    }

    Ok(())
}
