//! Scriptcore headless runner.
//!
//! Builds the sandbox scene, attaches its behaviors and runs a fixed number
//! of frames without a window. The player is driven by a scripted key press
//! so the run exercises impulses, contacts and deferred destruction.
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --frames 300 --fields '{"Player": {"move_speed": {"Float": 8.0}}}'
//! ```

use std::path::PathBuf;

use clap::Parser;
use log::{error, info, warn};

use scriptcore::components::script::Script;
use scriptcore::resources::bridgeconfig::BridgeConfig;
use scriptcore::sandbox;
use scriptcore::scripting::fields::parse_overrides;
use scriptcore::scripting::{KeyCode, ScriptEngine, ScriptRegistry};

/// Scriptcore headless sandbox
#[derive(Parser)]
#[command(version, about = "Runs the scriptcore sandbox scene without a window.")]
struct Cli {
    /// INI configuration file (default: ./scriptcore.ini).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Number of frames to run; overrides the config file.
    #[arg(long)]
    frames: Option<u32>,

    /// Fixed frame delta in seconds; overrides the config file.
    #[arg(long)]
    timestep: Option<f32>,

    /// Lua class file to run on the player instead of the native behavior.
    #[arg(long, value_name = "PATH")]
    lua_script: Option<PathBuf>,

    /// Script field overrides as JSON, keyed by entity name.
    #[arg(long, value_name = "JSON")]
    fields: Option<String>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => BridgeConfig::with_path(path),
        None => BridgeConfig::new(),
    };
    if let Err(e) = config.load_from_file() {
        if cli.config.is_some() {
            warn!("{}; using defaults", e);
        }
    }
    if let Some(frames) = cli.frames {
        config.frames = frames;
    }
    if let Some(timestep) = cli.timestep.filter(|t| *t > 0.0) {
        config.timestep = timestep;
    }

    let mut registry = ScriptRegistry::default();
    sandbox::register_behaviors(&mut registry);
    let mut scene = sandbox::build_scene(&config);

    let player_class = load_lua(&config, cli.lua_script.as_deref(), &mut registry);
    if let Some(class_name) = player_class {
        if let Some(player) = scene.find_entity_by_name("Player") {
            if let Some(mut script) = scene.component_mut::<Script>(player) {
                script.class_name = class_name;
            }
        }
    }

    let mut engine = ScriptEngine::with_registry(scene, registry);
    if let Some(json) = &cli.fields {
        match parse_overrides(json) {
            Ok(overrides) => engine.set_field_overrides(overrides),
            Err(e) => {
                eprintln!("Error: invalid --fields JSON: {e}");
                std::process::exit(2);
            }
        }
    }

    engine.scene_mut().connect_audio();
    engine.start();

    // Hold D for the first quarter of the run
    let push_frames = config.frames / 4;
    let player = engine.scene().find_entity_by_name("Player");
    for frame in 0..config.frames {
        if frame == 0 {
            engine.scene_mut().input_mut().press_key(KeyCode::D.code());
        } else if frame == push_frames {
            engine.scene_mut().input_mut().release_key(KeyCode::D.code());
        }

        engine.update(config.timestep);

        if frame % 60 == 0 {
            let scene = engine.scene();
            let position = player.map(|id| scene.position(id)).unwrap_or_default();
            info!(
                "frame {:>5}  t={:.2}s  entities={}  player=({:.2}, {:.2})",
                frame,
                scene.time().elapsed,
                scene.entity_count(),
                position.x,
                position.y
            );
        }
    }

    engine.stop();
    info!("ran {} frames", config.frames);
}

/// Loads Lua classes from the configured script directory plus `script`,
/// registers them, and returns the class name of `script`.
#[cfg(feature = "lua")]
fn load_lua(
    config: &BridgeConfig,
    script: Option<&std::path::Path>,
    registry: &mut ScriptRegistry,
) -> Option<String> {
    use std::rc::Rc;

    use scriptcore::resources::lua_runtime::{LuaRuntime, register_classes};

    let runtime = match LuaRuntime::with_script_dir(&config.script_dir) {
        Ok(runtime) => Rc::new(runtime),
        Err(e) => {
            error!("Failed to create Lua runtime: {}", e);
            return None;
        }
    };
    if config.script_dir.is_dir() {
        match runtime.load_scripts_dir(&config.script_dir) {
            Ok(names) => info!("loaded {} Lua classes from {:?}", names.len(), config.script_dir),
            Err(e) => warn!("{:?}: {}", config.script_dir, e),
        }
    }
    let class_name = script.and_then(|path| match runtime.load_class_file(path) {
        Ok(name) => Some(name),
        Err(e) => {
            error!("Failed to load {}: {}", path.display(), e);
            None
        }
    });
    register_classes(&runtime, registry);
    class_name
}

#[cfg(not(feature = "lua"))]
fn load_lua(
    _config: &BridgeConfig,
    script: Option<&std::path::Path>,
    _registry: &mut ScriptRegistry,
) -> Option<String> {
    if let Some(path) = script {
        error!("{} ignored: built without Lua support", path.display());
    }
    None
}
