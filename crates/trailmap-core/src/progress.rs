//! Progress aggregation.
//!
//! Turns completion records into percentages for a section, a course, or any
//! rollup of those. Percentages round half away from zero and are computed
//! with integer arithmetic, so results never depend on float representation.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ComputeError;

/// Whether a learner finished a single learning item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub item_id: String,
    pub completed: bool,
}

impl CompletionRecord {
    pub fn new(item_id: impl Into<String>, completed: bool) -> Self {
        Self {
            item_id: item_id.into(),
            completed,
        }
    }
}

/// Compute a completion percentage in `[0, 100]`.
///
/// `total == 0` yields `0`. Negative counts and `completed > total` are
/// rejected with [`ComputeError::InvalidArgument`].
pub fn compute_progress(total: i64, completed: i64) -> Result<u8, ComputeError> {
    if total < 0 {
        return Err(ComputeError::invalid(
            "total",
            format!("must be >= 0, got {total}"),
        ));
    }
    if completed < 0 {
        return Err(ComputeError::invalid(
            "completed",
            format!("must be >= 0, got {completed}"),
        ));
    }
    if completed > total {
        return Err(ComputeError::invalid(
            "completed",
            format!("{completed} exceeds total {total}"),
        ));
    }
    Ok(percentage(total as u64, completed as u64))
}

/// Caller guarantees `completed <= total`.
fn percentage(total: u64, completed: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    // round(c / t * 100) == floor((200c + t) / 2t) for non-negative c, t
    let (t, c) = (total as u128, completed as u128);
    ((c * 200 + t) / (t * 2)) as u8
}

/// Coarse completion state shown next to a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressStatus::NotStarted => write!(f, "not_started"),
            ProgressStatus::InProgress => write!(f, "in_progress"),
            ProgressStatus::Completed => write!(f, "completed"),
        }
    }
}

/// Completion totals and the derived percentage.
///
/// Deserialising goes through [`ProgressSummary::new`], so a stored summary
/// with `completed > total` or a percentage that does not match its counts
/// is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "StoredSummary")]
pub struct ProgressSummary {
    pub total_items: u64,
    pub completed_items: u64,
    pub percentage: u8,
}

impl ProgressSummary {
    /// Build a summary, rejecting `completed > total`.
    pub fn new(total: u64, completed: u64) -> Result<Self, ComputeError> {
        if completed > total {
            return Err(ComputeError::invalid(
                "completed",
                format!("{completed} exceeds total {total}"),
            ));
        }
        Ok(Self {
            total_items: total,
            completed_items: completed,
            percentage: percentage(total, completed),
        })
    }

    pub fn remaining(&self) -> u64 {
        self.total_items.saturating_sub(self.completed_items)
    }

    pub fn is_complete(&self) -> bool {
        self.total_items > 0 && self.completed_items == self.total_items
    }

    pub fn status(&self) -> ProgressStatus {
        if self.is_complete() {
            ProgressStatus::Completed
        } else if self.completed_items == 0 {
            ProgressStatus::NotStarted
        } else {
            ProgressStatus::InProgress
        }
    }
}

#[derive(Deserialize)]
struct StoredSummary {
    total_items: u64,
    completed_items: u64,
    percentage: u8,
}

impl TryFrom<StoredSummary> for ProgressSummary {
    type Error = ComputeError;

    fn try_from(stored: StoredSummary) -> Result<Self, Self::Error> {
        let summary = Self::new(stored.total_items, stored.completed_items)?;
        if summary.percentage != stored.percentage {
            return Err(ComputeError::invalid(
                "percentage",
                format!(
                    "{} does not match {}/{} items",
                    stored.percentage, stored.completed_items, stored.total_items
                ),
            ));
        }
        Ok(summary)
    }
}

/// Summarise a set of completion records.
///
/// Records sharing an `item_id` count as one item, which is complete if any
/// of its records is.
pub fn summarize(records: &[CompletionRecord]) -> ProgressSummary {
    let mut items: BTreeMap<&str, bool> = BTreeMap::new();
    for record in records {
        let done = items.entry(record.item_id.as_str()).or_insert(false);
        *done |= record.completed;
    }
    let total = items.len() as u64;
    let completed = items.values().filter(|done| **done).count() as u64;
    ProgressSummary {
        total_items: total,
        completed_items: completed,
        percentage: percentage(total, completed),
    }
}

/// Item-weighted rollup of several summaries.
pub fn rollup<'a>(summaries: impl IntoIterator<Item = &'a ProgressSummary>) -> ProgressSummary {
    let (total, completed) = summaries.into_iter().fold((0u64, 0u64), |(t, c), s| {
        (
            t.saturating_add(s.total_items),
            c.saturating_add(s.completed_items),
        )
    });
    ProgressSummary {
        total_items: total,
        completed_items: completed,
        percentage: percentage(total, completed),
    }
}

/// Completion records for one section of a course.
#[derive(Debug, Clone)]
pub struct SectionRecords {
    pub section_id: String,
    pub name: String,
    pub records: Vec<CompletionRecord>,
}

/// Progress through a single course section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionProgress {
    pub section_id: String,
    pub name: String,
    pub summary: ProgressSummary,
}

/// Per-section progress for a course plus the course-wide figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseProgress {
    pub course_id: String,
    pub name: String,
    pub sections: Vec<SectionProgress>,
    pub overall: ProgressSummary,
}

/// Summarise every section of a course and roll them up by item count.
pub fn summarize_course(
    course_id: impl Into<String>,
    name: impl Into<String>,
    sections: Vec<SectionRecords>,
) -> CourseProgress {
    let sections: Vec<SectionProgress> = sections
        .into_iter()
        .map(|s| SectionProgress {
            summary: summarize(&s.records),
            section_id: s.section_id,
            name: s.name,
        })
        .collect();
    let overall = rollup(sections.iter().map(|s| &s.summary));
    CourseProgress {
        course_id: course_id.into(),
        name: name.into(),
        sections,
        overall,
    }
}
