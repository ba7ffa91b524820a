//! Core types, errors, and utilities for building shader programs.
//!
//! This crate provides the foundational pieces shared by the program builder
//! and the backends:
//! - Shader stage and source types
//! - The [`GraphicsContext`] trait every backend implements
//! - Error types and diagnostics
//! - Line-numbered source dumps and info log parsing

pub mod context;
pub mod dump;
pub mod errors;
pub mod info_log;
pub mod stage;

pub use context::*;
pub use dump::dump_source;
pub use errors::*;
pub use info_log::{parse_info_log, LogEntry, Severity};
pub use stage::*;
