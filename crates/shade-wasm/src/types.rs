//! JavaScript-facing types for the WASM bindings.

use serde::{Deserialize, Serialize};
use shade_core::{BuildError, DiagnosticKind, LogEntry, ShaderStage};
use shade_program::{BuildOptions, ValidationPolicy};

/// A build failure as a plain JavaScript object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticJs {
    pub kind: DiagnosticKind,
    pub stage: Option<ShaderStage>,
    /// Ready-to-print message, same as the thrown error text.
    pub message: String,
    pub log: Option<String>,
    pub source_dump: Option<String>,
    pub entries: Vec<LogEntry>,
}

impl From<&BuildError> for DiagnosticJs {
    fn from(err: &BuildError) -> Self {
        Self {
            kind: err.kind(),
            stage: err.stage(),
            message: err.to_string(),
            log: err.log().map(str::to_string),
            source_dump: err.source_dump().map(str::to_string),
            entries: err.log_entries(),
        }
    }
}

/// Build options from JavaScript. Missing fields fall back to the defaults
/// of the calling function.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildOptionsJs {
    #[serde(default)]
    pub activate: Option<bool>,
    #[serde(default)]
    pub validation: Option<ValidationPolicy>,
}

impl BuildOptionsJs {
    /// Apply the fields that were set on top of `defaults`.
    pub fn merge_into(self, defaults: BuildOptions) -> BuildOptions {
        BuildOptions {
            activate: self.activate.unwrap_or(defaults.activate),
            validation: self.validation.unwrap_or(defaults.validation),
        }
    }
}
