//! Learner dataset model.
//!
//! A `Dataset` is the already-fetched snapshot of learners, course structure,
//! completions and scores that the calculators work from.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::layout::PathwayStep;
use crate::progress::{self, CompletionRecord, SectionRecords};
use crate::ranking::ScoreEntry;

/// A learner enrolled in the dataset's courses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Learner {
    pub id: String,
    pub name: String,
}

/// A single activity a learner can complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
}

/// An ordered group of items within a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub items: Vec<Item>,
}

/// A course made of ordered sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Course {
    /// Items in pathway order: section by section.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.sections.iter().flat_map(|s| s.items.iter())
    }

    pub fn item_count(&self) -> usize {
        self.sections.iter().map(|s| s.items.len()).sum()
    }
}

/// A learner finished an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub user_id: String,
    pub item_id: String,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

/// An explicit leaderboard score for a learner in a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub user_id: String,
    pub course_id: String,
    pub score: f64,
}

/// A snapshot of learners, courses and their activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub learners: Vec<Learner>,
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub completions: Vec<Completion>,
    #[serde(default)]
    pub scores: Vec<ScoreRecord>,
}

impl Dataset {
    pub fn learner(&self, id: &str) -> Option<&Learner> {
        self.learners.iter().find(|l| l.id == id)
    }

    pub fn course(&self, id: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == id)
    }

    /// Ids of every item `user_id` has completed.
    pub fn completed_items(&self, user_id: &str) -> HashSet<&str> {
        self.completions
            .iter()
            .filter(|c| c.user_id == user_id)
            .map(|c| c.item_id.as_str())
            .collect()
    }

    /// Per-section completion records of `user_id` in `course`.
    pub fn course_records(&self, course: &Course, user_id: &str) -> Vec<SectionRecords> {
        let done = self.completed_items(user_id);
        course
            .sections
            .iter()
            .map(|section| SectionRecords {
                section_id: section.id.clone(),
                name: section.name.clone(),
                records: section
                    .items
                    .iter()
                    .map(|item| CompletionRecord::new(&item.id, done.contains(item.id.as_str())))
                    .collect(),
            })
            .collect()
    }

    /// The course's items as pathway steps for `user_id`.
    pub fn pathway_steps(&self, course: &Course, user_id: &str) -> Vec<PathwayStep> {
        let done = self.completed_items(user_id);
        course
            .items()
            .map(|item| PathwayStep {
                item_id: item.id.clone(),
                title: item.name.clone(),
                completed: done.contains(item.id.as_str()),
            })
            .collect()
    }

    /// Leaderboard input for `course`, one entry per learner.
    ///
    /// A learner's explicit score record wins; without one their course
    /// completion percentage is used.
    pub fn course_scores(&self, course: &Course) -> Vec<ScoreEntry> {
        let explicit: HashMap<&str, f64> = self
            .scores
            .iter()
            .filter(|s| s.course_id == course.id)
            .map(|s| (s.user_id.as_str(), s.score))
            .collect();

        self.learners
            .iter()
            .map(|learner| {
                let score = match explicit.get(learner.id.as_str()) {
                    Some(score) => *score,
                    None => {
                        let sections = self.course_records(course, &learner.id);
                        let records: Vec<CompletionRecord> =
                            sections.into_iter().flat_map(|s| s.records).collect();
                        f64::from(progress::summarize(&records).percentage)
                    }
                };
                ScoreEntry::new(&learner.id, &learner.name, score)
            })
            .collect()
    }
}

/// On-disk encodings a dataset can be read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetFormat {
    Toml,
    Json,
}

impl DatasetFormat {
    /// Pick a format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

impl fmt::Display for DatasetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetFormat::Toml => write!(f, "toml"),
            DatasetFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for DatasetFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "toml" => Ok(DatasetFormat::Toml),
            "json" => Ok(DatasetFormat::Json),
            other => Err(format!("unknown dataset format: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sample() -> Dataset {
        Dataset {
            id: "d".into(),
            name: "Sample".into(),
            learners: vec![
                Learner {
                    id: "u1".into(),
                    name: "Ada".into(),
                },
                Learner {
                    id: "u2".into(),
                    name: "Bo".into(),
                },
            ],
            courses: vec![Course {
                id: "c1".into(),
                name: "Course".into(),
                sections: vec![
                    Section {
                        id: "s1".into(),
                        name: "One".into(),
                        items: vec![
                            Item {
                                id: "i1".into(),
                                name: "First".into(),
                            },
                            Item {
                                id: "i2".into(),
                                name: "Second".into(),
                            },
                        ],
                    },
                    Section {
                        id: "s2".into(),
                        name: "Two".into(),
                        items: vec![Item {
                            id: "i3".into(),
                            name: "Third".into(),
                        }],
                    },
                ],
            }],
            completions: vec![Completion {
                user_id: "u1".into(),
                item_id: "i2".into(),
                completed_at: None,
            }],
            scores: vec![ScoreRecord {
                user_id: "u2".into(),
                course_id: "c1".into(),
                score: 72.5,
            }],
        }
    }

    #[test]
    fn course_items_are_in_section_order() {
        let data = sample();
        let course = data.course("c1").unwrap();
        let ids: Vec<&str> = course.items().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["i1", "i2", "i3"]);
        assert_eq!(course.item_count(), 3);
    }

    #[test]
    fn course_records_mark_completions() {
        let data = sample();
        let course = data.course("c1").unwrap();
        let sections = data.course_records(course, "u1");
        assert_eq!(sections.len(), 2);
        assert!(!sections[0].records[0].completed);
        assert!(sections[0].records[1].completed);
        assert!(!sections[1].records[0].completed);
    }

    #[test]
    fn pathway_steps_follow_items() {
        let data = sample();
        let course = data.course("c1").unwrap();
        let steps = data.pathway_steps(course, "u1");
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[1].title, "Second");
        assert!(steps[1].completed);
    }

    #[test]
    fn course_scores_prefer_explicit_records() {
        let data = sample();
        let course = data.course("c1").unwrap();
        let scores = data.course_scores(course);
        assert_eq!(scores.len(), 2);
        // u1 has no score record: 1 of 3 items
        assert_eq!(scores[0].score, 33.0);
        assert_eq!(scores[1].score, 72.5);
    }

    #[test]
    fn dataset_format_from_path() {
        assert_eq!(
            DatasetFormat::from_path(&PathBuf::from("a/b.toml")),
            Some(DatasetFormat::Toml)
        );
        assert_eq!(
            DatasetFormat::from_path(&PathBuf::from("b.JSON")),
            Some(DatasetFormat::Json)
        );
        assert_eq!(DatasetFormat::from_path(&PathBuf::from("b.csv")), None);
        assert_eq!(DatasetFormat::Json.to_string(), "json");
    }
}
