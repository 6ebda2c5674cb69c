//! The `trailmap pathway` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use trailmap_core::config::load_config_from;
use trailmap_core::error::DatasetError;
use trailmap_core::layout::layout_pathway;
use trailmap_core::parser::parse_dataset;

pub fn execute(
    dataset_path: PathBuf,
    user: String,
    course_id: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let dataset = parse_dataset(&dataset_path)?;

    let learner = dataset
        .learner(&user)
        .ok_or_else(|| DatasetError::UnknownLearner(user.clone()))?;
    let course = dataset
        .course(&course_id)
        .ok_or_else(|| DatasetError::UnknownCourse(course_id.clone()))?;

    let nodes = layout_pathway(&dataset.pathway_steps(course, &user), &config.layout)
        .with_context(|| format!("failed to lay out pathway for {}", course.id))?;

    println!("{} — {} ({} stops)", learner.name, course.name, nodes.len());

    let mut table = Table::new();
    table.set_header(vec!["#", "Item", "Status", "x", "y"]);
    for node in &nodes {
        table.add_row(vec![
            Cell::new(node.position.order),
            Cell::new(&node.title),
            Cell::new(node.status),
            Cell::new(format!("{:.2}", node.position.x)),
            Cell::new(format!("{:.2}", node.position.y)),
        ]);
    }
    println!("{table}");

    Ok(())
}
