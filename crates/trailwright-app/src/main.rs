use std::path::PathBuf;

use clap::Parser;
use glam::Vec3;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use trailwright_core::{CameraBasis, TrailConfig, TrailPreset};
use trailwright_platform::{RecordingSink, TrailHost, TrailRenderer};

#[derive(Debug, Parser)]
#[command(
    name = "trailwright",
    about = "Drive a trail along a simulated path and report the ribbon it builds"
)]
struct Args {
    /// TOML or JSON trail config. Overrides --preset.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Built-in preset: default, comet, ribbon.
    #[arg(long, default_value = "default")]
    preset: String,

    #[arg(long, default_value_t = 240)]
    frames: u32,

    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Write the final mesh and bounds as JSON.
    #[arg(long)]
    dump: Option<PathBuf>,

    /// Write the effective config (format from the extension).
    #[arg(long)]
    write_config: Option<PathBuf>,

    #[arg(long, default_value_t = Level::INFO)]
    log_level: Level,
}

/// Anchor travelling along a rising helix, watched by a fixed camera.
struct HelixHost {
    time: f64,
    radius: f32,
    climb: f32,
    camera: CameraBasis,
}

impl HelixHost {
    fn new() -> Self {
        Self {
            time: 0.0,
            radius: 3.0,
            climb: 0.5,
            camera: CameraBasis::looking_at(Vec3::new(0.0, 4.0, 15.0), Vec3::ZERO),
        }
    }
}

impl TrailHost for HelixHost {
    fn anchor_position(&self) -> Vec3 {
        let t = self.time as f32;
        Vec3::new(self.radius * t.cos(), self.climb * t, self.radius * t.sin())
    }

    fn camera(&self) -> CameraBasis {
        self.camera
    }
}

fn main() {
    let args = Args::parse();

    // Init logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .with_env_filter(args.log_level.as_str().to_ascii_lowercase())
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    info!("Trailwright starting");
    if let Err(e) = run(&args) {
        eprintln!("Trailwright error: {e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = match &args.config {
        Some(path) => TrailConfig::load(path)?,
        None => match TrailPreset::find(&args.preset) {
            Some(preset) => preset.config,
            None => {
                warn!("unknown preset {:?}, using default", args.preset);
                TrailConfig::default()
            }
        },
    };
    if let Some(path) = &args.write_config {
        config.save(path)?;
    }

    let mut renderer = TrailRenderer::new(HelixHost::new(), config)?;
    renderer.activate()?;

    let mut sink = RecordingSink::new();
    let dt = 1.0 / args.fps.max(1.0);
    let report_every = (args.fps.round() as u32).max(1);

    for frame in 0..args.frames {
        let now = f64::from(frame) * dt;
        renderer.host_mut().time = now;
        let out = renderer.per_frame_update(now, None)?;
        if frame % report_every == 0 {
            info!(
                frame,
                points = out.stats.live_points,
                vertices = out.vertices.len(),
                indices = out.indices.len(),
                "frame"
            );
        }
        renderer.submit(&mut sink)?;
    }

    let bounds = renderer.filter().bounds();
    info!(
        submissions = sink.submissions().len(),
        min = ?bounds.min(),
        max = ?bounds.max(),
        "done"
    );

    if let Some(path) = &args.dump {
        let dump = serde_json::json!({
            "mesh": renderer.filter().mesh(),
            "bounds": bounds,
        });
        std::fs::write(path, serde_json::to_string_pretty(&dump)?)?;
        info!("wrote mesh to {}", path.display());
    }

    renderer.destroy();
    Ok(())
}
