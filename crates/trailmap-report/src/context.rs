//! Template context: the key-value view of a dashboard handed to renderers.
//!
//! Everything a template needs is precomputed here (labels, status strings,
//! formatted timestamps), so renderers only look values up.

use serde::Serialize;
use serde_json::{json, Map, Value};

use trailmap_core::dashboard::{CourseDashboard, Dashboard};
use trailmap_core::progress::ProgressSummary;
use trailmap_core::ranking::{LeaderboardEntry, Standing};

/// Plain key-value context for a template.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TemplateContext {
    values: Map<String, Value>,
}

impl TemplateContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten a dashboard into a context.
    pub fn from_dashboard(dashboard: &Dashboard) -> Self {
        let learner_id = dashboard.learner.id.as_str();
        let mut ctx = Self::new();
        ctx.insert("learner_id", learner_id);
        ctx.insert("learner_name", dashboard.learner.name.as_str());
        ctx.insert("dataset_id", dashboard.dataset_id.as_str());
        ctx.insert("dashboard_id", dashboard.id.to_string());
        ctx.insert(
            "generated_at",
            dashboard
                .created_at
                .format("%Y-%m-%d %H:%M UTC")
                .to_string(),
        );
        ctx.insert("overall", summary_value(&dashboard.overall));
        ctx.insert(
            "courses",
            Value::Array(
                dashboard
                    .courses
                    .iter()
                    .map(|c| course_value(c, learner_id))
                    .collect(),
            ),
        );
        ctx
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// String value for `key`, or `""` when missing or not a string.
    pub fn str(&self, key: &str) -> &str {
        self.get(key).and_then(Value::as_str).unwrap_or("")
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.values)
    }
}

fn summary_value(summary: &ProgressSummary) -> Value {
    json!({
        "percentage": summary.percentage,
        "completed": summary.completed_items,
        "total": summary.total_items,
        "remaining": summary.remaining(),
        "status": summary.status().to_string(),
        "progress_label": format!("{}/{} items", summary.completed_items, summary.total_items),
    })
}

fn course_value(course: &CourseDashboard, learner_id: &str) -> Value {
    let sections: Vec<Value> = course
        .progress
        .sections
        .iter()
        .map(|s| {
            let mut value = summary_value(&s.summary);
            value["id"] = json!(s.section_id);
            value["name"] = json!(s.name);
            value
        })
        .collect();

    let pathway: Vec<Value> = course
        .pathway
        .iter()
        .map(|node| {
            json!({
                "order": node.position.order,
                "item_id": node.item_id,
                "title": node.title,
                "status": node.status.to_string(),
                "x": node.position.x,
                "y": node.position.y,
            })
        })
        .collect();

    let leaderboard: Vec<Value> = course
        .leaderboard
        .iter()
        .map(|e| leaderboard_row(e, learner_id))
        .collect();

    let mut value = summary_value(&course.progress.overall);
    value["id"] = json!(course.progress.course_id);
    value["name"] = json!(course.progress.name);
    value["sections"] = Value::Array(sections);
    value["pathway"] = Value::Array(pathway);
    value["standing"] = standing_value(&course.standing);
    value["leaderboard"] = Value::Array(leaderboard);
    value
}

fn standing_value(standing: &Standing) -> Value {
    let label = if standing.rank == 0 {
        "unranked".to_string()
    } else {
        format!("#{} of {}", standing.rank, standing.total)
    };
    json!({
        "rank": standing.rank,
        "total": standing.total,
        "percentile": standing.percentile,
        "ranked": standing.rank > 0,
        "label": label,
    })
}

fn leaderboard_row(entry: &LeaderboardEntry, learner_id: &str) -> Value {
    let rank_label = if entry.is_tied {
        format!("={}", entry.rank)
    } else {
        entry.rank.to_string()
    };
    json!({
        "rank": entry.rank,
        "rank_label": rank_label,
        "user_id": entry.user_id,
        "name": entry.name,
        "score": entry.score,
        "score_label": format!("{:.1}", entry.score),
        "is_tied": entry.is_tied,
        "is_current_user": entry.user_id == learner_id,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use trailmap_core::layout::{compute_position, NodeStatus, PathwayNode};
    use trailmap_core::model::Learner;
    use trailmap_core::progress::{summarize_course, CompletionRecord, SectionRecords};
    use trailmap_core::ranking::{Leaderboard, ScoreEntry};
    use uuid::Uuid;

    pub(crate) fn sample_dashboard() -> Dashboard {
        let progress = summarize_course(
            "rust",
            "Rust <Basics>",
            vec![SectionRecords {
                section_id: "s1".into(),
                name: "Intro".into(),
                records: vec![
                    CompletionRecord::new("a", true),
                    CompletionRecord::new("b", false),
                ],
            }],
        );
        let pathway = vec![
            PathwayNode {
                item_id: "a".into(),
                title: "Hello".into(),
                position: compute_position(1, 2).unwrap(),
                status: NodeStatus::Completed,
            },
            PathwayNode {
                item_id: "b".into(),
                title: "Types & Traits".into(),
                position: compute_position(2, 2).unwrap(),
                status: NodeStatus::Current,
            },
        ];
        let board = Leaderboard::new(vec![
            ScoreEntry::new("ada", "Ada", 50.0),
            ScoreEntry::new("bo", "Bo", 50.0),
            ScoreEntry::new("cy", "Cy", 10.0),
        ])
        .unwrap();
        let overall = progress.overall;
        Dashboard {
            id: Uuid::nil(),
            created_at: Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap(),
            dataset_id: "cohort".into(),
            learner: Learner {
                id: "ada".into(),
                name: "Ada".into(),
            },
            courses: vec![CourseDashboard {
                progress,
                pathway,
                standing: board.standing("ada"),
                leaderboard: board.entries().to_vec(),
            }],
            overall,
        }
    }

    #[test]
    fn context_top_level_fields() {
        let ctx = TemplateContext::from_dashboard(&sample_dashboard());
        assert_eq!(ctx.str("learner_name"), "Ada");
        assert_eq!(ctx.str("generated_at"), "2026-03-01 09:30 UTC");
        assert_eq!(ctx.str("missing"), "");
        let overall = ctx.get("overall").unwrap();
        assert_eq!(overall["percentage"], 50);
        assert_eq!(overall["status"], "in_progress");
        assert_eq!(overall["progress_label"], "1/2 items");
    }

    #[test]
    fn context_course_fields() {
        let ctx = TemplateContext::from_dashboard(&sample_dashboard());
        let course = &ctx.get("courses").unwrap()[0];
        assert_eq!(course["id"], "rust");
        assert_eq!(course["sections"][0]["name"], "Intro");
        assert_eq!(course["pathway"][1]["status"], "current");
        assert_eq!(course["pathway"][1]["x"], 90.0);
        assert_eq!(course["standing"]["label"], "#1 of 3");
        assert_eq!(course["standing"]["percentile"], 100);

        let rows = course["leaderboard"].as_array().unwrap();
        assert_eq!(rows[0]["rank_label"], "=1");
        assert_eq!(rows[0]["is_current_user"], true);
        assert_eq!(rows[2]["rank_label"], "3");
        assert_eq!(rows[2]["score_label"], "10.0");
    }

    #[test]
    fn summary_with_more_completed_than_total() {
        let mut dashboard = sample_dashboard();
        dashboard.overall.completed_items = 5;
        let ctx = TemplateContext::from_dashboard(&dashboard);
        let overall = ctx.get("overall").unwrap();
        assert_eq!(overall["remaining"], 0);
        assert_eq!(overall["progress_label"], "5/2 items");
    }

    #[test]
    fn unranked_standing_label() {
        let standing = Standing {
            user_id: "x".into(),
            rank: 0,
            total: 0,
            percentile: 0,
        };
        let value = standing_value(&standing);
        assert_eq!(value["label"], "unranked");
        assert_eq!(value["ranked"], false);
    }
}
