pub mod catalog;
pub mod chat;
pub mod config;
pub mod health;
pub mod pattern;
