//! Error types for shader program building.

use thiserror::Error;

use crate::info_log::{parse_info_log, LogEntry};
use crate::stage::ShaderStage;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Result type for program building operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// A failed build, formatted for direct display in a console or log.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// A shader stage failed to compile.
    #[error("Shader compilation failed\n\n{log}\n\n{source_dump}")]
    Compile {
        stage: ShaderStage,
        /// Raw compiler info log.
        log: String,
        /// Line-numbered rendering of the full stage source.
        source_dump: String,
    },

    /// Both stages compiled but the program failed to link.
    #[error("Program link failed\n\n{log}")]
    Link { log: String },

    /// The program linked but did not pass validation.
    #[error("Program validation failed\n\n{log}")]
    Validation { log: String },

    /// The source text for a stage was empty.
    #[error("Empty {stage} shader source")]
    EmptySource { stage: ShaderStage },

    /// The context could not create a shader or program object.
    #[error(transparent)]
    Context(#[from] ContextError),
}

/// Failure kinds of a [`BuildError`], for callers that branch on the cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum DiagnosticKind {
    Compile,
    Link,
    Validation,
    EmptySource,
    Context,
}

impl BuildError {
    /// Create a compile error, rendering the numbered dump of `source`.
    pub fn compile(stage: ShaderStage, log: impl Into<String>, source: &str) -> Self {
        Self::Compile {
            stage,
            log: log.into(),
            source_dump: crate::dump::dump_source(source),
        }
    }

    /// Create a link error.
    pub fn link(log: impl Into<String>) -> Self {
        Self::Link { log: log.into() }
    }

    /// Create a validation error.
    pub fn validation(log: impl Into<String>) -> Self {
        Self::Validation { log: log.into() }
    }

    pub fn kind(&self) -> DiagnosticKind {
        match self {
            BuildError::Compile { .. } => DiagnosticKind::Compile,
            BuildError::Link { .. } => DiagnosticKind::Link,
            BuildError::Validation { .. } => DiagnosticKind::Validation,
            BuildError::EmptySource { .. } => DiagnosticKind::EmptySource,
            BuildError::Context(_) => DiagnosticKind::Context,
        }
    }

    /// The stage the failure belongs to, if it is stage specific.
    pub fn stage(&self) -> Option<ShaderStage> {
        match self {
            BuildError::Compile { stage, .. } | BuildError::EmptySource { stage } => Some(*stage),
            BuildError::Context(ContextError::ShaderCreation { stage, .. }) => Some(*stage),
            _ => None,
        }
    }

    /// Raw backend log text, if the failure came with one.
    pub fn log(&self) -> Option<&str> {
        match self {
            BuildError::Compile { log, .. }
            | BuildError::Link { log }
            | BuildError::Validation { log } => Some(log),
            _ => None,
        }
    }

    /// Numbered source dump, only present for compile failures.
    pub fn source_dump(&self) -> Option<&str> {
        match self {
            BuildError::Compile { source_dump, .. } => Some(source_dump),
            _ => None,
        }
    }

    /// Structured entries parsed from the raw log.
    pub fn log_entries(&self) -> Vec<LogEntry> {
        self.log().map(parse_info_log).unwrap_or_default()
    }
}

/// Errors reported by a graphics context backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("Failed to create {stage} shader object: {reason}")]
    ShaderCreation { stage: ShaderStage, reason: String },

    #[error("Failed to create program object: {reason}")]
    ProgramCreation { reason: String },
}
