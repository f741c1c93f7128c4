/// objview terminal - point view of a Wavefront OBJ model
///
/// Controls:
///   - Left mouse drag: pan the model
///   - R: reset pan and rotation
///   - C: close the model (shows the built-in cube)
///   - Space: pause/resume rotation
///   - P: switch between the flat and rotating projector
///   - Q/ESC: Quit

use anyhow::{Context, Result};
use clap::Parser;
use objview_core::{MalformedLinePolicy, ModelStore, ProjectorKind, ViewerConfig};
use objview_terminal::TerminalApp;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "objview-terminal", about = "Show the vertices of an OBJ model in the terminal")]
struct Cli {
    /// OBJ file to open; the built-in cube is shown when omitted
    path: Option<PathBuf>,

    /// Viewer settings as TOML
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pixels per model unit
    #[arg(long)]
    scale: Option<f64>,

    /// Measure each drag move from the previous pointer position
    #[arg(long)]
    refresh_anchor: bool,

    /// Drop malformed v/f lines instead of refusing the file
    #[arg(long)]
    skip_malformed: bool,

    /// Apply the rotation angles when projecting
    #[arg(long)]
    rotate: bool,

    /// Write logs to this file instead of stderr, keeping them off the screen
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn viewer_config(&self) -> Result<ViewerConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                ViewerConfig::from_toml_str(&text)
                    .with_context(|| format!("failed to parse config {}", path.display()))?
            }
            None => ViewerConfig::default(),
        };

        if let Some(scale) = self.scale {
            config.default_scale = scale;
        }
        if self.refresh_anchor {
            config.refresh_anchor_on_move = true;
        }
        if self.skip_malformed {
            config.parse.malformed = MalformedLinePolicy::Skip;
        }
        if self.rotate {
            config.projector = ProjectorKind::Rotating;
        }
        Ok(config)
    }
}

/// `RUST_LOG` when set, otherwise warnings and errors only
fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let builder = tracing_subscriber::fmt().with_env_filter(log_filter());
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let mut store = ModelStore::with_config(cli.viewer_config()?)?;

    let title = match &cli.path {
        Some(path) => {
            info!("Loading model from {}", path.display());
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            store
                .load(&text)
                .with_context(|| format!("failed to load {}", path.display()))?;
            if !store.skipped_lines().is_empty() {
                info!("Skipped {} malformed lines", store.skipped_lines().len());
            }
            if !store.has_model() {
                warn!("{} has no vertices or faces", path.display());
            }
            path.display().to_string()
        }
        None => {
            store.close();
            "cube".to_string()
        }
    };

    let mut app = TerminalApp::new(store, title)?;
    app.run()?;

    Ok(())
}
