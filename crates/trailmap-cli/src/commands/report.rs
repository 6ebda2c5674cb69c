//! The `trailmap report` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use trailmap_core::config::load_config_from;
use trailmap_core::dashboard::{build_dashboard, Dashboard, DashboardOptions};
use trailmap_core::parser::parse_dataset;
use trailmap_report::{renderer_for, write_report, TemplateContext};

pub fn execute(
    dataset_path: PathBuf,
    user: String,
    courses: Option<String>,
    format: Option<String>,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let dataset = parse_dataset(&dataset_path)?;

    let options = DashboardOptions {
        courses: courses
            .map(|c| {
                c.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default(),
        leaderboard_top: config.leaderboard_top,
        wave: config.layout,
    };

    let dashboard = build_dashboard(&dataset, &user, &options)?;
    print_summary(&dashboard);

    let format = format.unwrap_or(config.default_format);
    // Resolve every renderer before writing anything.
    let renderers = report_formats(&format)
        .iter()
        .map(|f| renderer_for(f))
        .collect::<Result<Vec<_>>>()?;

    let output = output.unwrap_or(config.output_dir);
    std::fs::create_dir_all(&output)?;
    let timestamp = dashboard.created_at.format("%Y-%m-%dT%H%M%S");
    let context = TemplateContext::from_dashboard(&dashboard);

    for renderer in &renderers {
        let path = output.join(format!(
            "dashboard-{}-{timestamp}.{}",
            file_stem(&dashboard.learner.id),
            renderer.file_extension()
        ));
        write_report(renderer.as_ref(), &context, &path)?;
        tracing::info!(format = renderer.name(), "wrote {}", path.display());
        eprintln!("{} report: {}", renderer.name().to_uppercase(), path.display());
    }

    Ok(())
}

/// Normalised format names from a `--format` value, in order and without
/// repeats. `all` expands to every format.
fn report_formats(value: &str) -> Vec<String> {
    let mut formats: Vec<String> = Vec::new();
    for name in value.split(',').map(|f| f.trim().to_lowercase()) {
        let expanded = if name == "all" {
            vec!["json".to_string(), "html".to_string()]
        } else {
            vec![name]
        };
        for f in expanded {
            if !formats.contains(&f) {
                formats.push(f);
            }
        }
    }
    formats
}

/// Learner ids come from the dataset, so keep only characters that are safe
/// in a single path component.
fn file_stem(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn print_summary(dashboard: &Dashboard) {
    let mut table = Table::new();
    table.set_header(vec!["Course", "Progress", "Status", "Rank", "Percentile"]);

    for course in &dashboard.courses {
        let overall = &course.progress.overall;
        let rank = if course.standing.rank == 0 {
            "-".to_string()
        } else {
            format!("{}/{}", course.standing.rank, course.standing.total)
        };
        table.add_row(vec![
            Cell::new(&course.progress.name),
            Cell::new(format!(
                "{}% ({}/{})",
                overall.percentage, overall.completed_items, overall.total_items
            )),
            Cell::new(overall.status()),
            Cell::new(rank),
            Cell::new(format!("{}", course.standing.percentile)),
        ]);
    }

    println!("{} — overall {}%", dashboard.learner.name, dashboard.overall.percentage);
    println!("{table}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_are_normalised_and_deduplicated() {
        assert_eq!(report_formats("ALL"), vec!["json", "html"]);
        assert_eq!(report_formats("json, JSON ,json"), vec!["json"]);
        assert_eq!(report_formats("Html,all"), vec!["html", "json"]);
        assert_eq!(report_formats("pdf"), vec!["pdf"]);
    }

    #[test]
    fn file_stem_stays_in_one_component() {
        assert_eq!(file_stem("ada"), "ada");
        assert_eq!(file_stem("user_01-b"), "user_01-b");
        assert_eq!(file_stem("../../escaped/u"), "______escaped_u");
        assert_eq!(file_stem("a\\b c.d"), "a_b_c_d");
    }
}
