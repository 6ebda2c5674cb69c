//! trailmap configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::layout::WaveParams;

/// Top-level trailmap configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrailmapConfig {
    /// Where `trailmap report` writes its files.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Report format used when none is given on the command line.
    #[serde(default = "default_format")]
    pub default_format: String,
    /// Number of leaderboard rows shown on dashboards.
    #[serde(default = "default_leaderboard_top")]
    pub leaderboard_top: usize,
    /// Wave shape for pathways longer than five stops.
    #[serde(default)]
    pub layout: WaveParams,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./trailmap-reports")
}
fn default_format() -> String {
    "html".to_string()
}
fn default_leaderboard_top() -> usize {
    10
}

impl Default for TrailmapConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            default_format: default_format(),
            leaderboard_top: default_leaderboard_top(),
            layout: WaveParams::default(),
        }
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `trailmap.toml` in the current directory
/// 2. `~/.config/trailmap/config.toml`
///
/// Environment variable overrides: `TRAILMAP_OUTPUT_DIR`, `TRAILMAP_LEADERBOARD_TOP`.
pub fn load_config() -> Result<TrailmapConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<TrailmapConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("trailmap.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<TrailmapConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            config
        }
        None => TrailmapConfig::default(),
    };

    if let Ok(dir) = std::env::var("TRAILMAP_OUTPUT_DIR") {
        config.output_dir = PathBuf::from(dir);
    }
    if let Ok(top) = std::env::var("TRAILMAP_LEADERBOARD_TOP") {
        config.leaderboard_top = top
            .trim()
            .parse()
            .with_context(|| format!("invalid TRAILMAP_LEADERBOARD_TOP: '{top}'"))?;
    }

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("trailmap"))
}
