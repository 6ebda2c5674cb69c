//! The `trailmap progress` command.

use anyhow::Result;

use trailmap_core::progress::compute_progress;

pub fn execute(total: i64, completed: i64) -> Result<()> {
    let percentage = compute_progress(total, completed)?;
    println!("{percentage}%");
    Ok(())
}
