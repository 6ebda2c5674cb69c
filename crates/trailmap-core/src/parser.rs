//! Dataset file parser.
//!
//! Loads datasets from TOML or JSON files and directories, and validates them.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{Completion, Course, Dataset, DatasetFormat, Learner, ScoreRecord};

/// On-disk layout: a `[dataset]` header followed by the collections.
#[derive(Debug, Deserialize)]
struct DatasetFile {
    dataset: DatasetHeader,
    #[serde(default)]
    learners: Vec<Learner>,
    #[serde(default)]
    courses: Vec<Course>,
    #[serde(default)]
    completions: Vec<Completion>,
    #[serde(default)]
    scores: Vec<ScoreRecord>,
}

#[derive(Debug, Deserialize)]
struct DatasetHeader {
    id: String,
    name: String,
}

/// Parse a dataset file, picking the format from its extension.
pub fn parse_dataset(path: &Path) -> Result<Dataset> {
    let format = DatasetFormat::from_path(path).with_context(|| {
        format!(
            "unsupported dataset file (expected .toml or .json): {}",
            path.display()
        )
    })?;
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read dataset file: {}", path.display()))?;

    parse_dataset_str(&content, format, path)
}

/// Parse dataset text in the given format (useful for testing).
pub fn parse_dataset_str(
    content: &str,
    format: DatasetFormat,
    source_path: &Path,
) -> Result<Dataset> {
    let parsed: DatasetFile = match format {
        DatasetFormat::Toml => toml::from_str(content)
            .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?,
        DatasetFormat::Json => serde_json::from_str(content)
            .with_context(|| format!("failed to parse JSON: {}", source_path.display()))?,
    };

    Ok(Dataset {
        id: parsed.dataset.id,
        name: parsed.dataset.name,
        learners: parsed.learners,
        courses: parsed.courses,
        completions: parsed.completions,
        scores: parsed.scores,
    })
}

/// A dataset file that was found but could not be parsed.
#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub path: PathBuf,
    /// The parse error, with its context chain.
    pub reason: String,
}

/// Datasets loaded from a file or directory, plus any files that were skipped.
#[derive(Debug, Default)]
pub struct LoadedDatasets {
    pub datasets: Vec<Dataset>,
    pub skipped: Vec<SkippedFile>,
}

/// Recursively load every `.toml` / `.json` dataset in a directory.
///
/// Files that fail to parse are logged and recorded in
/// [`LoadedDatasets::skipped`].
pub fn load_dataset_directory(dir: &Path) -> Result<LoadedDatasets> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut loaded = LoadedDatasets::default();
    load_into(dir, &mut loaded)?;
    Ok(loaded)
}

fn load_into(dir: &Path, loaded: &mut LoadedDatasets) -> Result<()> {
    let mut paths = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    paths.sort();

    for path in paths {
        if path.is_dir() {
            load_into(&path, loaded)?;
        } else if DatasetFormat::from_path(&path).is_some() {
            match parse_dataset(&path) {
                Ok(set) => loaded.datasets.push(set),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                    loaded.skipped.push(SkippedFile {
                        reason: format!("{e:#}"),
                        path,
                    });
                }
            }
        }
    }

    Ok(())
}

/// Load a single file or every dataset under a directory.
///
/// A single file that fails to parse is an error rather than a skip.
pub fn load_datasets(path: &Path) -> Result<LoadedDatasets> {
    if path.is_dir() {
        load_dataset_directory(path)
    } else {
        Ok(LoadedDatasets {
            datasets: vec![parse_dataset(path)?],
            skipped: Vec::new(),
        })
    }
}

/// A warning from dataset validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The record the warning is about (learner, course, item...), if any.
    pub subject: Option<String>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn about(subject: &str, message: impl Into<String>) -> Self {
        Self {
            subject: Some(subject.to_string()),
            message: message.into(),
        }
    }
}

/// Validate a dataset for duplicate ids and dangling references.
pub fn validate_dataset(set: &Dataset) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut learner_ids = HashSet::new();
    for learner in &set.learners {
        if !learner_ids.insert(learner.id.as_str()) {
            warnings.push(ValidationWarning::about(
                &learner.id,
                format!("duplicate learner ID: {}", learner.id),
            ));
        }
    }

    let mut course_ids = HashSet::new();
    let mut section_ids = HashSet::new();
    // item id -> owning course
    let mut item_ids: HashMap<&str, &str> = HashMap::new();
    for course in &set.courses {
        if !course_ids.insert(course.id.as_str()) {
            warnings.push(ValidationWarning::about(
                &course.id,
                format!("duplicate course ID: {}", course.id),
            ));
        }
        if course.item_count() == 0 {
            warnings.push(ValidationWarning::about(&course.id, "course has no items"));
        }
        for section in &course.sections {
            if !section_ids.insert(section.id.as_str()) {
                warnings.push(ValidationWarning::about(
                    &section.id,
                    format!("duplicate section ID: {}", section.id),
                ));
            }
            for item in &section.items {
                if item_ids.insert(item.id.as_str(), course.id.as_str()).is_some() {
                    warnings.push(ValidationWarning::about(
                        &item.id,
                        format!("duplicate item ID: {}", item.id),
                    ));
                }
            }
        }
    }

    for completion in &set.completions {
        if !learner_ids.contains(completion.user_id.as_str()) {
            warnings.push(ValidationWarning::about(
                &completion.item_id,
                format!("completion for unknown learner: {}", completion.user_id),
            ));
        }
        if !item_ids.contains_key(completion.item_id.as_str()) {
            warnings.push(ValidationWarning::about(
                &completion.item_id,
                format!("completion for unknown item: {}", completion.item_id),
            ));
        }
    }

    let mut scored = HashSet::new();
    for score in &set.scores {
        if !scored.insert((score.user_id.as_str(), score.course_id.as_str())) {
            warnings.push(ValidationWarning::about(
                &score.user_id,
                format!(
                    "duplicate score for {} in {}; the last one is used",
                    score.user_id, score.course_id
                ),
            ));
        }
        if !learner_ids.contains(score.user_id.as_str()) {
            warnings.push(ValidationWarning::about(
                &score.user_id,
                format!("score for unknown learner: {}", score.user_id),
            ));
        }
        if !course_ids.contains(score.course_id.as_str()) {
            warnings.push(ValidationWarning::about(
                &score.user_id,
                format!("score for unknown course: {}", score.course_id),
            ));
        }
        if !score.score.is_finite() || score.score < 0.0 {
            warnings.push(ValidationWarning::about(
                &score.user_id,
                format!(
                    "score in {} must be a non-negative number, got {}",
                    score.course_id, score.score
                ),
            ));
        }
    }

    warnings
}
