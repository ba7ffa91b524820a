//! Build configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What to do when a linked program fails validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum ValidationPolicy {
    /// Record the outcome on the program and say nothing.
    Ignore,
    /// Record the outcome and log a warning.
    #[default]
    Warn,
    /// Fail the build with a validation error.
    Deny,
}

/// Options for building a program.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct BuildOptions {
    /// Make the program current on the context after a successful build.
    pub activate: bool,
    /// Handling of validation failures.
    pub validation: ValidationPolicy,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            activate: true,
            validation: ValidationPolicy::Warn,
        }
    }
}

impl BuildOptions {
    /// Create default build options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether the built program becomes current.
    pub fn with_activate(mut self, activate: bool) -> Self {
        self.activate = activate;
        self
    }

    /// Set the validation policy.
    pub fn with_validation(mut self, validation: ValidationPolicy) -> Self {
        self.validation = validation;
        self
    }
}
