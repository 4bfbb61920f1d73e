//! Terminal front end for the workflow client
//!
//! This module is only available when the "cli" feature is enabled.

mod commands;
mod config;
#[path = "main.rs"]
mod main_impl;

pub use main_impl::{main, Cli};
