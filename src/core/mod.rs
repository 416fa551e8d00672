//! Process-level configuration.

pub mod config;
