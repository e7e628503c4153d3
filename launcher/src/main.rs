//! Renderer bootstrap launcher
//!
//! Runs the renderer discovery and selection against the shared libraries on
//! this machine and reports what the host would bind to.

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use render_bootstrap::foundation::logging;
use render_bootstrap::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "render_launcher", version, about = "Select and bind a renderer module")]
struct Args {
    /// Bootstrap config file (.toml or .ron)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run as a dedicated server (baseline renderer only)
    #[arg(long)]
    dedicated: bool,

    /// Requested renderer mode, e.g. `renderer_r3` or `r2a`
    #[arg(long)]
    renderer: Option<String>,

    /// Directory searched for renderer modules
    #[arg(long)]
    module_dir: Option<PathBuf>,

    /// Log level when RUST_LOG is not set
    #[arg(long)]
    log_level: Option<String>,

    /// Only build and print the mode list
    #[arg(long)]
    list: bool,

    /// Raw launch parameters forwarded to the host, e.g. `-- -tune`
    #[arg(last = true, allow_hyphen_values = true)]
    params: Vec<String>,
}

fn load_config(args: &Args) -> Result<BootstrapConfig, ConfigError> {
    let mut config = match &args.config {
        Some(path) => BootstrapConfig::load_from_file(path)?,
        None => BootstrapConfig::default(),
    };

    if args.dedicated {
        config.dedicated_server = true;
    }
    if let Some(renderer) = &args.renderer {
        config.renderer = renderer.clone();
    }
    if let Some(dir) = &args.module_dir {
        config.module_dir = Some(dir.clone());
    }
    if let Some(level) = &args.log_level {
        config.log_level = level.clone();
    }

    config.validate()?;
    Ok(config)
}

fn print_modes(api: &EngineApi) {
    println!("Render modes:");
    for token in api.modes().iter().filter(|token| !token.is_terminator()) {
        println!("  [{}] {}", token.id, token.name);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let config = load_config(args)?;
    logging::init(&config.log_level);

    let mut api = EngineApi::new(config);

    if args.list {
        api.create_renderer_list()?;
        print_modes(&api);
        return Ok(());
    }

    let mut console = RendererConsole::new();
    let tier = api.initialize(&mut console, &args.params)?;
    print_modes(&api);

    let binding = api.environment().binding();
    match binding.mode() {
        Some(mode) => println!("Bound renderer: {} ({})", tier, mode),
        None => println!("Bound renderer: {}", tier),
    }
    for command in console.history() {
        println!("Forced: {}", command);
    }
    if api.environment().profiler().is_enabled() {
        println!("Profiler hooks: enabled");
    }

    api.destroy();
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            eprintln!("fatal: {}", err);
            ExitCode::FAILURE
        }
    }
}
