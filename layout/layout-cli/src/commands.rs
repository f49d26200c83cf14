//! Command implementations.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use layout_pipeline::{CapacityPolicy, LayoutOutcome, LayoutService, PipelineConfig};
use layout_scene::{Extruder, ExtrusionConfig};
use layout_types::{ArchitecturalProgram, ConstraintGraph, RoomGeometry};
use owo_colors::OwoColorize;

/// Options of the `generate` command.
pub struct GenerateArgs {
    pub graph: PathBuf,
    pub config: Option<PathBuf>,
    pub checkpoints: Option<PathBuf>,
    pub seed: u64,
    pub steps: Option<usize>,
    pub strict: bool,
    pub svg: PathBuf,
    pub geometry: Option<PathBuf>,
    pub glb: Option<PathBuf>,
}

pub fn build_graph(program: &Path, output: Option<&Path>) -> Result<()> {
    let text = fs::read_to_string(program)
        .with_context(|| format!("reading {}", program.display()))?;
    let program: ArchitecturalProgram =
        serde_json::from_str(&text).context("parsing architectural program")?;
    let graph = program.to_constraint_graph()?;
    let json = graph.to_json()?;

    let Some(output) = output else {
        println!("{json}");
        return Ok(());
    };

    fs::write(output, json).with_context(|| format!("writing {}", output.display()))?;

    let stats = graph.stats();
    println!(
        "{} {} rooms, {} adjacencies, {}",
        "✓".green().bold(),
        stats.node_count,
        stats.edge_count,
        if stats.is_connected {
            "connected".green().to_string()
        } else {
            "disconnected".yellow().to_string()
        }
    );
    println!("  graph: {}", output.display());
    Ok(())
}

pub fn generate(args: &GenerateArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    let config = apply_overrides(config, args);

    let text = fs::read_to_string(&args.graph)
        .with_context(|| format!("reading {}", args.graph.display()))?;
    let graph = ConstraintGraph::from_json(&text).context("parsing constraint graph")?;

    let service = LayoutService::cpu(config)?;
    if !service.is_available() {
        bail!("layout inference is unavailable in this build");
    }

    let outcome = if args.glb.is_some() {
        service.generate_with_scene(&graph, &mut seeded(args.seed))?
    } else {
        service.generate_seeded(&graph, args.seed)?
    };

    fs::write(&args.svg, &outcome.svg)
        .with_context(|| format!("writing {}", args.svg.display()))?;
    if let Some(path) = &args.geometry {
        fs::write(path, serde_json::to_string_pretty(&outcome.rooms)?)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    if let (Some(path), Some(asset)) = (&args.glb, &outcome.scene) {
        asset
            .save(path)
            .with_context(|| format!("writing {}", path.display()))?;
    }

    report(&outcome, args);
    Ok(())
}

/// Applies command-line flags on top of a loaded configuration.
///
/// `--steps` only changes the step count; the beta range stays as loaded.
fn apply_overrides(mut config: PipelineConfig, args: &GenerateArgs) -> PipelineConfig {
    if let Some(dir) = &args.checkpoints {
        config = config.with_checkpoint_dir(dir);
    }
    if let Some(steps) = args.steps {
        config.schedule.steps = steps;
    }
    if args.strict {
        config = config.with_capacity(CapacityPolicy::Reject);
    }
    config
}

pub fn extrude(geometry: &Path, output: &Path, wall_height: f64, base64: bool) -> Result<()> {
    let text = fs::read_to_string(geometry)
        .with_context(|| format!("reading {}", geometry.display()))?;
    let rooms: Vec<RoomGeometry> =
        serde_json::from_str(&text).context("parsing room geometry")?;

    let extruder = Extruder::new(ExtrusionConfig::default().with_wall_height(wall_height));
    let Some(asset) = extruder.extrude(&rooms) else {
        let reason = extruder.status().reason().unwrap_or("disabled");
        bail!("3D export unavailable: {reason}");
    };

    if base64 {
        println!("{}", asset.to_base64());
        return Ok(());
    }

    asset
        .save(output)
        .with_context(|| format!("writing {}", output.display()))?;
    if asset.is_placeholder() {
        println!(
            "{} scene could not be built, wrote placeholder to {}",
            "!".yellow().bold(),
            output.display()
        );
    } else {
        println!(
            "{} {} rooms extruded, {} bytes written to {}",
            "✓".green().bold(),
            rooms.len(),
            asset.len(),
            output.display()
        );
    }
    Ok(())
}

fn seeded(seed: u64) -> rand_chacha::ChaCha8Rng {
    use rand::SeedableRng;
    rand_chacha::ChaCha8Rng::seed_from_u64(seed)
}

fn report(outcome: &LayoutOutcome, args: &GenerateArgs) {
    let mark = if outcome.is_degraded() {
        "!".yellow().bold().to_string()
    } else {
        "✓".green().bold().to_string()
    };
    println!("{mark} {} rooms placed (seed {})", outcome.rooms.len(), args.seed);

    for room in &outcome.rooms {
        println!(
            "  {:<12} {:<14} {:>6.1} x {:<6.1} at ({:.1}, {:.1})",
            room.id.bold(),
            room.room_type,
            room.width,
            room.height,
            room.center_x,
            room.center_y
        );
    }

    println!("  svg: {}", args.svg.display());
    if let Some(path) = &args.geometry {
        println!("  geometry: {}", path.display());
    }
    if let (Some(path), Some(_)) = (&args.glb, &outcome.scene) {
        println!("  glb: {}", path.display());
    }

    for degradation in &outcome.degradations {
        println!("  {} {}", "warning:".yellow().bold(), degradation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layout_models::ScheduleConfig;

    fn args() -> GenerateArgs {
        GenerateArgs {
            graph: PathBuf::from("graph.json"),
            config: None,
            checkpoints: None,
            seed: 0,
            steps: None,
            strict: false,
            svg: PathBuf::from("layout.svg"),
            geometry: None,
            glb: None,
        }
    }

    #[test]
    fn steps_flag_keeps_configured_betas() {
        let loaded = PipelineConfig::default()
            .with_schedule(ScheduleConfig::new(200).with_betas(5e-4, 0.05));
        let args = GenerateArgs {
            steps: Some(12),
            ..args()
        };

        let config = apply_overrides(loaded, &args);
        assert_eq!(config.schedule.steps, 12);
        assert!((config.schedule.beta_start - 5e-4).abs() < 1e-12);
        assert!((config.schedule.beta_end - 0.05).abs() < 1e-12);
    }

    #[test]
    fn flags_left_unset_change_nothing() {
        let loaded = PipelineConfig::default()
            .with_schedule(ScheduleConfig::new(30))
            .with_checkpoint_dir("weights");

        let config = apply_overrides(loaded.clone(), &args());
        assert_eq!(config.schedule, loaded.schedule);
        assert_eq!(config.checkpoints.dir, PathBuf::from("weights"));
        assert_eq!(config.capacity, CapacityPolicy::Truncate);
    }

    #[test]
    fn strict_and_checkpoint_flags_apply() {
        let args = GenerateArgs {
            strict: true,
            checkpoints: Some(PathBuf::from("ckpt")),
            ..args()
        };

        let config = apply_overrides(PipelineConfig::default(), &args);
        assert_eq!(config.capacity, CapacityPolicy::Reject);
        assert_eq!(config.checkpoints.encoder_path(), Path::new("ckpt").join("gnn_encoder_v1.bin"));
    }
}
