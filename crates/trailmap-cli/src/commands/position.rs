//! The `trailmap position` command.

use std::path::PathBuf;

use anyhow::Result;

use trailmap_core::config::load_config_from;
use trailmap_core::layout::compute_position_with;

pub fn execute(order: i64, total: i64, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let item = compute_position_with(order, total, &config.layout)?;
    println!("{:.2} {:.2}", item.x, item.y);
    Ok(())
}
