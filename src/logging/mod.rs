// file: src/logging/mod.rs
// version: 1.0.0
// guid: c3f6d045-3857-474a-888b-171df1417946

//! Logging setup for pi-board-info; everything goes to stderr

pub mod logger;

pub use logger::{init_json_logger, init_logger};
