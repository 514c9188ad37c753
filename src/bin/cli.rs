//! Locomotion CLI - replay scripted input against a headless physics scene

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use locomotion::config::ControllerConfig;
use locomotion::game::constants::physics as consts;
use locomotion::game::debug::{ground_check_gizmo, WireSphere};
use locomotion::game::input::InputScript;
use locomotion::game::{LayerMask, PhysicsWorld, PlayerController, ScriptedInput, TickReport};

#[derive(Parser)]
#[command(name = "locomotion")]
#[command(about = "Headless player locomotion simulator", long_about = None)]
struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, env = "LOCOMOTION_LOG", default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay an input script and print one JSON line per tick
    Simulate {
        /// Script file with [scene] and [[step]] tables
        script: PathBuf,
        /// Controller config file (defaults when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Number of ticks to run (default: length of the script)
        #[arg(short, long)]
        ticks: Option<u64>,
        /// Seconds per tick
        #[arg(long, default_value_t = consts::TIMESTEP)]
        dt: f32,
        /// Include the ground-check gizmo in each line
        #[arg(long)]
        gizmo: bool,
    },
    /// Validate a controller config file and print it with defaults filled in
    CheckConfig {
        path: PathBuf,
    },
    /// Print the default controller config
    DefaultConfig,
}

fn main() {
    let cli = Cli::parse();
    setup_logging(&cli.log_level);

    match cli.command {
        Commands::Simulate {
            script,
            config,
            ticks,
            dt,
            gizmo,
        } => simulate(&script, config.as_deref(), ticks, dt, gizmo),
        Commands::CheckConfig { path } => check_config(&path),
        Commands::DefaultConfig => print_config(&ControllerConfig::default()),
    }
}

fn setup_logging(level: &str) {
    let level = level.parse::<Level>().unwrap_or_else(|_| {
        eprintln!("Warning: unknown log level '{}', using info", level);
        Level::INFO
    });
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

// =============================================================================
// Scene
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
struct BoxSpec {
    position: [f32; 3],
    half_extents: [f32; 3],
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct SceneSpec {
    gravity: f32,
    spawn: [f32; 3],
    floor_half_extents: [f32; 3],
    #[serde(rename = "platform")]
    platforms: Vec<BoxSpec>,
    #[serde(rename = "ladder")]
    ladders: Vec<BoxSpec>,
}

impl Default for SceneSpec {
    fn default() -> Self {
        Self {
            gravity: consts::DEFAULT_GRAVITY,
            spawn: [0.0, consts::CHARACTER_HEIGHT / 2.0, 0.0],
            floor_half_extents: [50.0, 0.5, 50.0],
            platforms: Vec::new(),
            ladders: Vec::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SceneFile {
    #[serde(default)]
    scene: SceneSpec,
}

impl SceneSpec {
    /// Builds the world: a floor with its top face at y=0, platforms, ladders and the character.
    fn build(&self) -> (PhysicsWorld, rapier3d::prelude::RigidBodyHandle) {
        let mut world = PhysicsWorld::new();
        world.set_gravity(self.gravity);

        let [fx, fy, fz] = self.floor_half_extents;
        world.add_static_box([0.0, -fy, 0.0], [fx, fy, fz], LayerMask::GROUND);
        for platform in &self.platforms {
            world.add_static_box(platform.position, platform.half_extents, LayerMask::GROUND);
        }
        for ladder in &self.ladders {
            world.add_ladder(ladder.position, ladder.half_extents, LayerMask::LADDER);
        }

        let character = world.add_default_character(self.spawn);
        (world, character)
    }
}

// =============================================================================
// Simulate Command
// =============================================================================

#[derive(Serialize)]
struct TickLine {
    tick: u64,
    state: String,
    position: [f32; 3],
    velocity: [f32; 3],
    report: TickReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    gizmo: Option<WireSphere>,
}

fn simulate(script_path: &Path, config_path: Option<&Path>, ticks: Option<u64>, dt: f32, gizmo: bool) {
    if !(dt.is_finite() && dt > 0.0) {
        eprintln!("Error: --dt must be a positive number of seconds");
        std::process::exit(1);
    }

    let config = match config_path {
        Some(path) => ControllerConfig::from_file(path).unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }),
        None => ControllerConfig::default(),
    };

    let script = InputScript::from_file(script_path).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    let scene = load_scene(script_path);

    let total = ticks.unwrap_or_else(|| script.total_ticks());
    let (mut world, character) = scene.build();
    let mut controller = PlayerController::new(config);
    let mut input = ScriptedInput::from_script(script);

    info!(ticks = total, dt, ladders = scene.ladders.len(), "starting simulation");

    for tick in 0..total {
        let (report, gizmo_sphere) = {
            let mut body = world.character(character);
            let gizmo_sphere = gizmo.then(|| ground_check_gizmo(&body, controller.config()));
            (controller.run(dt, &mut input, &mut body), gizmo_sphere)
        };
        world.step(dt);

        let line = TickLine {
            tick,
            state: report.state.to_string(),
            position: world.get_position(character).unwrap_or_default(),
            velocity: world.get_velocity(character).unwrap_or_default(),
            report,
            gizmo: gizmo_sphere,
        };
        match serde_json::to_string(&line) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: failed to encode tick {}: {}", tick, e);
                std::process::exit(1);
            }
        }
    }

    info!(final_state = %controller.state(), "simulation finished");
}

fn load_scene(script_path: &Path) -> SceneSpec {
    // The script was already read successfully; only the [scene] table is parsed here.
    let content = std::fs::read_to_string(script_path).unwrap_or_default();
    match toml::from_str::<SceneFile>(&content) {
        Ok(file) => file.scene,
        Err(e) => {
            eprintln!("Error: invalid [scene] in {}: {}", script_path.display(), e);
            std::process::exit(1);
        }
    }
}

// =============================================================================
// Config Commands
// =============================================================================

fn check_config(path: &Path) {
    match ControllerConfig::from_file(path) {
        Ok(config) => {
            info!(path = %path.display(), "config is valid");
            print_config(&config);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_config(config: &ControllerConfig) {
    match config.to_toml_string() {
        Ok(text) => print!("{}", text),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
