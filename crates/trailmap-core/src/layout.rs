//! Pathway layout: places ordered activities along a winding road.
//!
//! Coordinates live in a 100x100 display box. X runs linearly from 10 to 90;
//! Y comes from hand-placed tables for short paths and from a descending sine
//! wave once a path has more than five stops.

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ComputeError;

const X_START: f64 = 10.0;
const X_SPAN: f64 = 80.0;

const SHORT_PATH_Y: [f64; 3] = [85.0, 50.0, 25.0];
const MEDIUM_PATH_Y: [f64; 5] = [85.0, 60.0, 70.0, 40.0, 25.0];

/// Shape of the sine wave used for pathways longer than five stops.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveParams {
    #[serde(default = "default_base_y")]
    pub base_y: f64,
    #[serde(default = "default_end_y")]
    pub end_y: f64,
    #[serde(default = "default_amplitude")]
    pub amplitude: f64,
    #[serde(default = "default_frequency")]
    pub frequency: f64,
}

fn default_base_y() -> f64 {
    85.0
}
fn default_end_y() -> f64 {
    25.0
}
fn default_amplitude() -> f64 {
    20.0
}
fn default_frequency() -> f64 {
    2.0
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            base_y: default_base_y(),
            end_y: default_end_y(),
            amplitude: default_amplitude(),
            frequency: default_frequency(),
        }
    }
}

impl WaveParams {
    fn validate(&self) -> Result<(), ComputeError> {
        let fields = [
            ("base_y", self.base_y),
            ("end_y", self.end_y),
            ("amplitude", self.amplitude),
            ("frequency", self.frequency),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(ComputeError::invalid(
                    "wave",
                    format!("{name} must be finite, got {value}"),
                ));
            }
        }
        Ok(())
    }
}

/// Display position of one stop on a pathway.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathwayItem {
    pub order: u64,
    pub total_count: u64,
    pub x: f64,
    pub y: f64,
}

/// Position of stop `order` (1-based) on a pathway of `total` stops, using
/// the default wave.
pub fn compute_position(order: i64, total: i64) -> Result<PathwayItem, ComputeError> {
    compute_position_with(order, total, &WaveParams::default())
}

/// Same as [`compute_position`] with an explicit wave shape. The lookup
/// tables for paths of up to five stops are not affected by `wave`.
pub fn compute_position_with(
    order: i64,
    total: i64,
    wave: &WaveParams,
) -> Result<PathwayItem, ComputeError> {
    if total < 1 {
        return Err(ComputeError::invalid(
            "total",
            format!("must be >= 1, got {total}"),
        ));
    }
    if order < 1 || order > total {
        return Err(ComputeError::invalid(
            "order",
            format!("must be within [1, {total}], got {order}"),
        ));
    }
    wave.validate()?;

    let index = (order - 1) as usize;
    let progress = if total > 1 {
        (order - 1) as f64 / (total - 1) as f64
    } else {
        0.0
    };

    let x = X_START + progress * X_SPAN;
    let y = match total {
        1..=3 => SHORT_PATH_Y[index],
        4..=5 => MEDIUM_PATH_Y[index],
        _ => {
            wave.base_y - progress * (wave.base_y - wave.end_y)
                + (progress * wave.frequency * PI).sin() * wave.amplitude
        }
    };

    Ok(PathwayItem {
        order: order as u64,
        total_count: total as u64,
        x,
        y,
    })
}

/// State of a pathway stop for the learner viewing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    Completed,
    /// The first stop not yet completed.
    Current,
    Upcoming,
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeStatus::Completed => write!(f, "completed"),
            NodeStatus::Current => write!(f, "current"),
            NodeStatus::Upcoming => write!(f, "upcoming"),
        }
    }
}

/// An activity to place on a pathway, in pathway order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathwayStep {
    pub item_id: String,
    pub title: String,
    pub completed: bool,
}

/// A placed pathway stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathwayNode {
    pub item_id: String,
    pub title: String,
    pub position: PathwayItem,
    pub status: NodeStatus,
}

/// Lay out `steps` in order and mark the first incomplete one as current.
pub fn layout_pathway(
    steps: &[PathwayStep],
    wave: &WaveParams,
) -> Result<Vec<PathwayNode>, ComputeError> {
    let total = steps.len() as i64;
    let mut current_assigned = false;

    steps
        .iter()
        .enumerate()
        .map(|(i, step)| {
            let position = compute_position_with(i as i64 + 1, total, wave)?;
            let status = if step.completed {
                NodeStatus::Completed
            } else if !current_assigned {
                current_assigned = true;
                NodeStatus::Current
            } else {
                NodeStatus::Upcoming
            };
            Ok(PathwayNode {
                item_id: step.item_id.clone(),
                title: step.title.clone(),
                position,
                status,
            })
        })
        .collect()
}
