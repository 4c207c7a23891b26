//! Config loading for the binary.
//!
//! The default configuration is embedded at build time. Setting
//! `TETRIS3D_CONFIG=<path>` replaces it with a JSON file; any field the file
//! omits keeps its default. `TETRIS3D_SEED` fixes the RNG seed.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context as _, Result};

use crate::core::{GameConfig, GameFlow};

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV: &str = "TETRIS3D_CONFIG";

/// Environment variable fixing the game seed.
pub const SEED_ENV: &str = "TETRIS3D_SEED";

/// The embedded default configuration.
pub const DEFAULT_CONFIG_JSON: &str = include_str!("../assets/default_config.json");

/// Parse a JSON configuration.
pub fn parse_config(json: &str) -> Result<GameConfig> {
    serde_json::from_str(json).context("invalid game config JSON")
}

/// Read and parse a config file.
pub fn load_config_from(path: &Path) -> Result<GameConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    parse_config(&text).with_context(|| format!("in config file {}", path.display()))
}

/// Config from `TETRIS3D_CONFIG` if set, the embedded default otherwise.
pub fn load_config() -> Result<GameConfig> {
    match std::env::var_os(CONFIG_ENV) {
        Some(path) => {
            let path = Path::new(&path);
            log::info!("loading config from {}", path.display());
            load_config_from(path)
        }
        None => parse_config(DEFAULT_CONFIG_JSON).context("embedded default config"),
    }
}

/// Parse a seed value. Empty input means "no fixed seed".
pub fn parse_seed(value: &str) -> Result<Option<u64>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .with_context(|| format!("{SEED_ENV} must be an unsigned integer (got {value:?})"))
}

/// Seed from `TETRIS3D_SEED`, or from the clock.
pub fn seed_from_env() -> Result<u64> {
    let fixed = match std::env::var(SEED_ENV) {
        Ok(v) => parse_seed(&v)?,
        Err(_) => None,
    };
    Ok(fixed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    }))
}

/// Validate `config` and build an unstarted game.
pub fn build_game(config: GameConfig, seed: u64) -> Result<GameFlow> {
    let (settings, catalog) = config.into_parts().context("invalid game config")?;
    if catalog.is_empty() {
        log::warn!("config defines no shapes; the game will end immediately");
    } else {
        log::info!(
            "loaded {} shapes (total weight {})",
            catalog.len(),
            catalog.total_weight()
        );
    }
    GameFlow::new(settings, catalog, seed).context("failed to create game")
}
