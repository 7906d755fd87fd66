//! CLI shell for agent-gui.
//!
//! This crate is the thin surface over the core subsystems: argument
//! parsing, output formatting, and the platform ports for capture and
//! input synthesis. The algorithmic weight lives in the library crates.

#![deny(clippy::all)]

pub mod commands;
pub mod config;
pub mod handlers;
pub mod platform;
pub mod telemetry;
