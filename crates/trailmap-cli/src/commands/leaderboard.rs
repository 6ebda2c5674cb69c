//! The `trailmap leaderboard` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use trailmap_core::config::load_config_from;
use trailmap_core::error::DatasetError;
use trailmap_core::parser::parse_dataset;
use trailmap_core::ranking::Leaderboard;

pub fn execute(
    dataset_path: PathBuf,
    course_id: String,
    user: Option<String>,
    top: Option<usize>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let dataset = parse_dataset(&dataset_path)?;
    let course = dataset
        .course(&course_id)
        .ok_or_else(|| DatasetError::UnknownCourse(course_id.clone()))?;

    let board = Leaderboard::new(dataset.course_scores(course))?;
    let top = top.unwrap_or(config.leaderboard_top);

    println!("{} — {} learners", course.name, board.len());

    let mut table = Table::new();
    table.set_header(vec!["Rank", "Learner", "Score"]);
    for entry in board.top(top) {
        let rank = if entry.is_tied {
            format!("={}", entry.rank)
        } else {
            entry.rank.to_string()
        };
        let name = if user.as_deref() == Some(entry.user_id.as_str()) {
            format!("{} *", entry.name)
        } else {
            entry.name.clone()
        };
        table.add_row(vec![
            Cell::new(rank),
            Cell::new(name),
            Cell::new(format!("{:.1}", entry.score)),
        ]);
    }
    println!("{table}");

    if let Some(user) = &user {
        let standing = board.standing(user);
        if standing.rank == 0 {
            println!("{user} is not on this leaderboard (rank 0, percentile 0)");
        } else {
            println!(
                "{user}: rank {} of {}, percentile {}",
                standing.rank, standing.total, standing.percentile
            );
        }
    }

    Ok(())
}
