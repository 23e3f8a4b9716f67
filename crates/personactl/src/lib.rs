//! personactl library - exposes modules for testing

pub mod commands;
pub mod config;
pub mod history;
