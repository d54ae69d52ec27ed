//! CLI module for nino
//!
//! Handles command-line argument parsing and configuration resolution.

pub mod args;
pub mod config;

pub use args::{normalize_args, Args};
pub use config::Config;
