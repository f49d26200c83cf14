//! Floor-plan layout generation from the command line.
//!
//! # Commands
//!
//! - `floorplan build-graph <PROGRAM>` - Convert an architectural program
//!   into a node-link constraint graph
//! - `floorplan generate <GRAPH>` - Run the full pipeline and write SVG,
//!   room geometry and optionally a GLB scene
//! - `floorplan extrude <GEOMETRY>` - Extrude a room geometry list to GLB

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Floor-plan layout generation
#[derive(Parser)]
#[command(name = "floorplan")]
#[command(about = "Generate floor-plan layouts from room constraint graphs", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an architectural program (JSON) into a constraint graph
    BuildGraph {
        /// Program JSON file
        #[arg(name = "PROGRAM")]
        program: PathBuf,

        /// Where to write the graph (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate a layout for a constraint graph (node-link JSON)
    Generate {
        /// Constraint graph JSON file
        #[arg(name = "GRAPH")]
        graph: PathBuf,

        /// Pipeline configuration JSON
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Checkpoint directory, overrides the configuration
        #[arg(long)]
        checkpoints: Option<PathBuf>,

        /// Seed for the sampler
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Number of sampling steps, overrides the configuration
        #[arg(long)]
        steps: Option<usize>,

        /// Fail instead of dropping rooms beyond the model capacity
        #[arg(long)]
        strict: bool,

        /// SVG output path
        #[arg(long, default_value = "layout.svg")]
        svg: PathBuf,

        /// Room geometry JSON output path
        #[arg(long)]
        geometry: Option<PathBuf>,

        /// GLB scene output path
        #[arg(long)]
        glb: Option<PathBuf>,
    },

    /// Extrude a room geometry list (JSON) into a GLB scene
    Extrude {
        /// Room geometry JSON file
        #[arg(name = "GEOMETRY")]
        geometry: PathBuf,

        /// GLB output path
        #[arg(short, long, default_value = "layout.glb")]
        output: PathBuf,

        /// Wall height in meters
        #[arg(long, default_value_t = 3.0)]
        wall_height: f64,

        /// Print the asset as base64 instead of writing a file
        #[arg(long)]
        base64: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::BuildGraph { program, output } => {
            commands::build_graph(&program, output.as_deref())
        }
        Commands::Generate {
            graph,
            config,
            checkpoints,
            seed,
            steps,
            strict,
            svg,
            geometry,
            glb,
        } => commands::generate(&commands::GenerateArgs {
            graph,
            config,
            checkpoints,
            seed,
            steps,
            strict,
            svg,
            geometry,
            glb,
        }),
        Commands::Extrude {
            geometry,
            output,
            wall_height,
            base64,
        } => commands::extrude(&geometry, &output, wall_height, base64),
    }
}
