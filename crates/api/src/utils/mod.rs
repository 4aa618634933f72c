//! Shared helpers for command implementations

pub mod command_helpers;
pub mod logging;
