//! Per-learner dashboards with JSON persistence.
//!
//! A dashboard runs the progress, layout and ranking calculators over one
//! learner's view of a dataset.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DatasetError;
use crate::layout::{self, PathwayNode, WaveParams};
use crate::model::{Course, Dataset, Learner};
use crate::progress::{self, CourseProgress, ProgressSummary};
use crate::ranking::{Leaderboard, LeaderboardEntry, Standing};

/// Options controlling dashboard assembly.
#[derive(Debug, Clone)]
pub struct DashboardOptions {
    /// Restrict the dashboard to these courses (all courses when empty).
    pub courses: Vec<String>,
    /// Leaderboard rows kept per course.
    pub leaderboard_top: usize,
    pub wave: WaveParams,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            courses: Vec::new(),
            leaderboard_top: 10,
            wave: WaveParams::default(),
        }
    }
}

/// Everything shown for one course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseDashboard {
    pub progress: CourseProgress,
    pub pathway: Vec<PathwayNode>,
    pub standing: Standing,
    pub leaderboard: Vec<LeaderboardEntry>,
}

/// A learner's dashboard across courses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub dataset_id: String,
    pub learner: Learner,
    pub courses: Vec<CourseDashboard>,
    pub overall: ProgressSummary,
}

/// Assemble the dashboard for `user_id`.
pub fn build_dashboard(
    dataset: &Dataset,
    user_id: &str,
    options: &DashboardOptions,
) -> Result<Dashboard, DatasetError> {
    let learner = dataset
        .learner(user_id)
        .ok_or_else(|| DatasetError::UnknownLearner(user_id.to_string()))?;

    let courses: Vec<&Course> = if options.courses.is_empty() {
        dataset.courses.iter().collect()
    } else {
        options
            .courses
            .iter()
            .map(|id| {
                dataset
                    .course(id)
                    .ok_or_else(|| DatasetError::UnknownCourse(id.clone()))
            })
            .collect::<Result<_, _>>()?
    };

    let courses = courses
        .into_iter()
        .map(|course| build_course(dataset, course, user_id, options))
        .collect::<Result<Vec<_>, _>>()?;

    let overall = progress::rollup(courses.iter().map(|c| &c.progress.overall));

    Ok(Dashboard {
        id: Uuid::new_v4(),
        created_at: Utc::now(),
        dataset_id: dataset.id.clone(),
        learner: learner.clone(),
        courses,
        overall,
    })
}

fn build_course(
    dataset: &Dataset,
    course: &Course,
    user_id: &str,
    options: &DashboardOptions,
) -> Result<CourseDashboard, DatasetError> {
    let progress = progress::summarize_course(
        &course.id,
        &course.name,
        dataset.course_records(course, user_id),
    );
    let pathway = layout::layout_pathway(&dataset.pathway_steps(course, user_id), &options.wave)?;
    let board = Leaderboard::new(dataset.course_scores(course))?;

    tracing::debug!(
        course = %course.id,
        user = %user_id,
        percentage = progress.overall.percentage,
        rank = board.user_rank(user_id),
        "assembled course dashboard"
    );

    Ok(CourseDashboard {
        progress,
        pathway,
        standing: board.standing(user_id),
        leaderboard: board.top(options.leaderboard_top).to_vec(),
    })
}

impl Dashboard {
    /// Save the dashboard as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize dashboard")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write dashboard to {}", path.display()))?;
        Ok(())
    }

    /// Load a dashboard from a JSON file.
    ///
    /// Every progress summary in the file must be internally consistent.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read dashboard from {}", path.display()))?;
        let dashboard: Dashboard =
            serde_json::from_str(&content).context("failed to parse dashboard JSON")?;
        Ok(dashboard)
    }

    pub fn course(&self, course_id: &str) -> Option<&CourseDashboard> {
        self.courses
            .iter()
            .find(|c| c.progress.course_id == course_id)
    }
}
