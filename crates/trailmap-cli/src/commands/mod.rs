pub mod init;
pub mod leaderboard;
pub mod pathway;
pub mod position;
pub mod progress;
pub mod report;
pub mod validate;
