//! Shared environment configuration for the ladders binaries.
//!
//! Consolidates `LADDERS_*`, `PORT` and `RUST_LOG` reads shared by the history
//! server and the terminal game.

use std::path::PathBuf;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::constants::DEFAULT_PORT;
use crate::error::Result;
use crate::transitions::TransitionGraph;

/// Install the fmt subscriber. `RUST_LOG` overrides the default `info` filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Read `LADDERS_BASE_PATH` (default `"."`) and chdir. Exits on failure.
pub fn init_base_path() -> PathBuf {
    let base_path = std::env::var("LADDERS_BASE_PATH").unwrap_or_else(|_| ".".to_string());
    let path = PathBuf::from(&base_path);
    if let Err(e) = std::env::set_current_dir(&base_path) {
        error!(path = %base_path, error = %e, "failed to change directory");
        std::process::exit(1);
    }
    if let Ok(cwd) = std::env::current_dir() {
        info!(cwd = %cwd.display(), "working directory");
    }
    path
}

/// Read `PORT` (default 3000).
pub fn server_port() -> u16 {
    parse_var("PORT").unwrap_or(DEFAULT_PORT)
}

/// Read `LADDERS_DB` (default `data.sqlite`).
pub fn database_path() -> PathBuf {
    path_var("LADDERS_DB", "data.sqlite")
}

/// Read `LADDERS_STATIC_DIR` (default `public`).
pub fn static_dir() -> PathBuf {
    path_var("LADDERS_STATIC_DIR", "public")
}

/// Read `LADDERS_HISTORY_URL` (default `http://localhost:3000`).
///
/// An empty value disables the remote service; history is then local only.
pub fn history_url() -> Option<String> {
    match std::env::var("LADDERS_HISTORY_URL") {
        Ok(url) if url.trim().is_empty() => None,
        Ok(url) => Some(url),
        Err(_) => Some(format!("http://localhost:{DEFAULT_PORT}")),
    }
}

/// Read `LADDERS_LOCAL_HISTORY` (default `winHistory.json`).
pub fn local_history_path() -> PathBuf {
    path_var("LADDERS_LOCAL_HISTORY", "winHistory.json")
}

/// Read `LADDERS_PLAYER_COUNT` (default 1, minimum 1).
pub fn player_count() -> usize {
    parse_var::<usize>("LADDERS_PLAYER_COUNT")
        .unwrap_or(1)
        .max(1)
}

/// Read `LADDERS_PLAYER_NAME`: the lobby's logged-in player.
pub fn player_name() -> String {
    std::env::var("LADDERS_PLAYER_NAME").unwrap_or_default()
}

/// Board from `LADDERS_BOARD` (a JSON file of pairs), or the standard board.
pub fn board() -> Result<TransitionGraph> {
    match std::env::var("LADDERS_BOARD") {
        Ok(path) if !path.trim().is_empty() => {
            let graph = TransitionGraph::from_json_file(std::path::Path::new(&path))?;
            info!(path = %path, transitions = graph.len(), "custom board loaded");
            Ok(graph)
        }
        _ => Ok(TransitionGraph::standard()),
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|s| s.trim().parse().ok())
}

fn path_var(name: &str, default: &str) -> PathBuf {
    std::env::var(name)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}
