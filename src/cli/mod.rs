// file: src/cli/mod.rs
// version: 1.0.0
// guid: 794f714c-0669-459a-9178-8796b12cb598

//! Command line interface for pi-board-info

pub mod args;
pub mod commands;

pub use args::Cli;
pub use commands::*;
