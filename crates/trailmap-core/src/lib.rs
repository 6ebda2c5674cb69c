//! trailmap-core — progress, pathway layout and leaderboard ranking.
//!
//! The three calculators (`progress`, `layout`, `ranking`) are pure functions
//! over in-memory inputs. The remaining modules load learner datasets and
//! assemble them into per-learner dashboards.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod layout;
pub mod model;
pub mod parser;
pub mod progress;
pub mod ranking;
