//! Logging.
//!
//! The game owns the terminal, so log lines cannot go to stderr. Logging is off
//! unless `TETRIS3D_LOG` names a file; `TETRIS3D_LOG_LEVEL` picks the level
//! (`error`, `warn`, `info`, `debug`, `trace`; default `info`).

use std::fs::File;
use std::path::Path;

use anyhow::{Context as _, Result};
use simplelog::LevelFilter;

/// Environment variable naming the log file.
pub const LOG_FILE_ENV: &str = "TETRIS3D_LOG";

/// Environment variable selecting the level.
pub const LOG_LEVEL_ENV: &str = "TETRIS3D_LOG_LEVEL";

/// Parse a level name, defaulting to `Info` when unset.
pub fn parse_level(value: Option<&str>) -> Result<LevelFilter> {
    match value.map(str::trim) {
        None | Some("") => Ok(LevelFilter::Info),
        Some(v) => v
            .parse()
            .with_context(|| format!("{LOG_LEVEL_ENV}: unknown log level {v:?}")),
    }
}

/// Install a file logger at `path`.
pub fn install_file(path: &Path, level: LevelFilter) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    simplelog::WriteLogger::init(
        level,
        simplelog::ConfigBuilder::new()
            .set_target_level(LevelFilter::Off)
            .set_location_level(LevelFilter::Off)
            .build(),
        file,
    )
    .context("failed to initialize logging")
}

/// Install the global logger from the environment.
///
/// Returns whether a logger was installed.
pub fn install() -> Result<bool> {
    let Some(path) = std::env::var_os(LOG_FILE_ENV) else {
        return Ok(false);
    };
    let level = parse_level(std::env::var(LOG_LEVEL_ENV).ok().as_deref())?;
    install_file(Path::new(&path), level)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level(None).unwrap(), LevelFilter::Info);
        assert_eq!(parse_level(Some("")).unwrap(), LevelFilter::Info);
        assert_eq!(parse_level(Some("debug")).unwrap(), LevelFilter::Debug);
        assert_eq!(parse_level(Some(" WARN ")).unwrap(), LevelFilter::Warn);
        assert_eq!(parse_level(Some("off")).unwrap(), LevelFilter::Off);
        assert!(parse_level(Some("loud")).is_err());
    }
}
