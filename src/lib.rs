pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod server;

pub use api::{BlogOutline, BlogPlanner, OutlineOutcome, PlannerError, TopicOutcome};
pub use crate::core::config::AppConfig;
