//! The `trailmap validate` command.

use std::path::PathBuf;

use anyhow::Result;

use trailmap_core::parser::{load_datasets, validate_dataset};

pub fn execute(dataset_path: PathBuf) -> Result<()> {
    let loaded = load_datasets(&dataset_path)?;
    for skipped in &loaded.skipped {
        println!("Skipped: {} ({})", skipped.path.display(), skipped.reason);
    }
    anyhow::ensure!(
        !loaded.datasets.is_empty(),
        "no datasets found in {}",
        dataset_path.display()
    );

    let mut total_warnings = 0;

    for set in &loaded.datasets {
        let item_count: usize = set.courses.iter().map(|c| c.item_count()).sum();
        println!(
            "Dataset: {} ({} learners, {} courses, {} items)",
            set.name,
            set.learners.len(),
            set.courses.len(),
            item_count
        );

        let warnings = validate_dataset(set);
        for w in &warnings {
            let prefix = w
                .subject
                .as_ref()
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    let skipped = loaded.skipped.len();
    if total_warnings == 0 && skipped == 0 {
        println!("All datasets valid.");
    } else {
        println!();
        if skipped > 0 {
            println!("{skipped} file(s) skipped.");
        }
        if total_warnings > 0 {
            println!("{total_warnings} warning(s) found.");
        }
    }

    Ok(())
}
