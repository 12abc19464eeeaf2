use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use winit::event_loop::{ControlFlow, EventLoop};

use gridcaster::renderer::{RenderMode, Screen, camera_x, sweep};
use gridcaster::{EngineConfig, GridMap, Side};

mod app;

#[derive(Parser)]
#[command(name = "gridcaster", about = "First-person grid raycaster")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON engine config; built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Text map file (digits, '#' walls, '.' floor), overrides the config map
    #[arg(long)]
    map: Option<PathBuf>,

    /// Wall rendering mode
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the window and play (default)
    Run,
    /// Cast one frame from the spawn pose and print the column hits
    Cast {
        /// Number of evenly spaced columns to print
        #[arg(short, long, default_value = "16")]
        columns: u32,
    },
    /// Print the effective configuration as JSON
    DumpConfig,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Flat,
    Textured,
}

impl From<ModeArg> for RenderMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Flat => RenderMode::Flat,
            ModeArg::Textured => RenderMode::Textured,
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<EngineConfig> {
    let mut config = EngineConfig::default();
    if let Some(path) = &cli.config {
        let shown = path.display();
        config = EngineConfig::load(path).with_context(|| format!("loading config {shown}"))?;
    }

    if let Some(path) = &cli.map {
        let shown = path.display();
        let text = fs::read_to_string(path).with_context(|| format!("reading map {shown}"))?;
        let map = GridMap::parse(&text).with_context(|| format!("parsing map {shown}"))?;
        config.map = Some(map.to_rows());
    }
    if let Some(mode) = cli.mode {
        config.render.mode = mode.into();
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn cast_report(config: &EngineConfig, map: &GridMap, columns: u32) {
    let screen = Screen {
        width: config.screen.width,
        height: config.screen.height,
    };
    let player = config.spawn_player();
    let view = player.view(&config.camera);
    let slices = sweep(map, &view, screen, config.texture.width);

    println!(
        "pose: x={} y={} angle={} ({}x{} screen)",
        player.pos.x,
        player.pos.y,
        player.angle,
        screen.width,
        screen.height
    );
    println!("   col    cam_x  distance side variant  wall_u   tex");

    let columns = columns.clamp(1, screen.width);
    for i in 0..columns {
        let x = (i as u64 * screen.width as u64 / columns as u64) as usize;
        let s = &slices[x];
        let side = match s.hit.side {
            Side::X => "x",
            Side::Y => "y",
        };
        println!(
            "{:>6} {:>8.3} {:>9.4} {:>4} {:>7} {:>7.3} {:>5}",
            x,
            camera_x(x as u32, screen.width),
            s.hit.distance,
            side,
            s.hit.variant,
            s.hit.wall_u,
            s.hit.texture_column
        );
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new(if cli.verbose { "debug" } else { "info" }),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = load_config(&cli)?;
    let map = config.build_map()?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            tracing::info!(
                width = map.width(),
                height = map.height(),
                mode = ?config.render.mode,
                "starting; WASD to move, M for map, T for texture mode"
            );
            let event_loop = EventLoop::new().context("creating event loop")?;
            // Poll keeps frames coming without waiting for OS events
            event_loop.set_control_flow(ControlFlow::Poll);

            let mut app = app::App::new(config, map);
            event_loop.run_app(&mut app).context("event loop failed")?;
        }
        Commands::Cast { columns } => cast_report(&config, &map, columns),
        Commands::DumpConfig => println!("{}", config.to_json()?),
    }

    Ok(())
}
