use anyhow::Context;
use clap::{Parser, Subcommand};
use hangar_persist::StateFile;
use hangar_render::{DebugTextRenderer, FrameSequencer, Renderer, Viewport};
use hangar_scene::ProgramState;
use hangar_tools::SceneInspector;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hangar-cli", about = "CLI tool for hangar program state and frame plans")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Program state file to read or write
    #[arg(long, default_value = "resources/program_state.txt")]
    state_file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Show the saved program state
    Inspect {
        /// Print the full state as JSON
        #[arg(long)]
        json: bool,
    },
    /// Overwrite the state file with defaults
    Reset,
    /// Print the frame plan the viewer would issue at a given time
    Plan {
        /// Elapsed time in seconds
        #[arg(short, long, default_value = "0")]
        time: f32,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let state_file = StateFile::new(&cli.state_file);

    match cli.command {
        Commands::Info => {
            let camera = hangar_common::Camera::new(hangar_scene::state::DEFAULT_CAMERA_POSITION);
            println!("hangar-cli v{}", env!("CARGO_PKG_VERSION"));
            println!(
                "camera defaults: yaw={} pitch={} speed={} zoom={}",
                camera.yaw(),
                camera.pitch(),
                camera.speed,
                camera.zoom()
            );
            println!("persist: {}", hangar_persist::crate_info());
            println!("render: {}", hangar_render::crate_info());
            println!("tools: {}", hangar_tools::crate_info());
            println!("state file: {}", state_file.path().display());
        }
        Commands::Inspect { json } => {
            let state = state_file.load();
            if json {
                let text = serde_json::to_string_pretty(&state)
                    .context("failed to serialize program state")?;
                println!("{text}");
            } else {
                println!("{}", SceneInspector::summary(&state));
                println!("{}", SceneInspector::camera(&state));
            }
        }
        Commands::Reset => {
            state_file
                .save(&ProgramState::default())
                .context("failed to reset program state")?;
            tracing::info!(path = %state_file.path().display(), "program state reset");
        }
        Commands::Plan { time } => {
            let mut state = state_file.load();
            let plan = FrameSequencer::new(Viewport::default()).plan(&mut state, time);
            print!("{}", DebugTextRenderer::new().render(&plan));
            for trace in plan.replay() {
                tracing::debug!(
                    pass = trace.kind.name(),
                    changed = trace.before != trace.after,
                    "pass state"
                );
            }
        }
    }

    Ok(())
}
