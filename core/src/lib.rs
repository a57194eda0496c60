//! Shared core for the breathwork service: the technique catalog, the active
//! breathing-pattern configuration and the conversation-to-recommendation engine.

pub mod catalog;
pub mod chat;
pub mod config;
pub mod engine;
pub mod error;
pub mod heuristics;
pub mod inference;
pub mod pattern;
pub mod plan;
pub mod prompt;
