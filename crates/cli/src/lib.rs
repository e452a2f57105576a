//! csutil CLI library
//!
//! Exports the CLI components used by the binary and by integration tests.

pub mod commands;
pub mod exit_code;
pub mod output;
