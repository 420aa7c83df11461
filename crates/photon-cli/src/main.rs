//! The `photon` command-line wrapper (spec §6): `photon [filename]`. With a
//! filename, transpiles the file and runs the compiled output; without one,
//! drops into the interactive REPL. Exit code `0` on success, `1` on a
//! syntax or import error reported to stderr -- everything past that
//! (argument parsing, logging, the global allocator) is ambient plumbing,
//! not part of the CORE this wraps.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use mimalloc::MiMalloc;

use photon_common::PhotonError;
use photon_engine::{Engine, EngineConfig};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[command(name = "photon", version, about = "The Photon transpiler core")]
struct Cli {
    /// Source file to transpile and run. Omit to start the interactive REPL.
    filename: Option<PathBuf>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.filename {
        Some(path) => run_file(&path),
        None => run_repl(),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn run_file(path: &PathBuf) -> Result<(), PhotonError> {
    let source = std::fs::read_to_string(path).map_err(|e| PhotonError::Io { path: path.clone(), reason: e.to_string() })?;
    let config = EngineConfig::default();
    let debug = config.debug;
    let blocks = photon_parser::parse_file(path, debug)?;

    let filename = path.display().to_string();
    let mut engine = Engine::new(config, filename);
    if let Err(err) = engine.run(&blocks) {
        err.eprint(&source);
        process::exit(1);
    }

    match photon_backend::find(&engine.config.lang) {
        Some(backend) => {
            let mut out = Vec::new();
            backend.emit(&engine.arena, &engine.sequence, &mut out)?;
            log::info!("emitted {} bytes for target '{}'", out.len(), backend.lang());
        }
        None => log::debug!("no backend registered for lang '{}'; transpiled in memory only", engine.config.lang),
    }
    Ok(())
}

fn run_repl() -> Result<(), PhotonError> {
    let mut repl = photon_repl::Repl::new(EngineConfig::default());
    repl.run()
}
