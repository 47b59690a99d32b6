// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Error taxonomy shared by every stage of the bridge pipeline.

use thiserror::Error;

/// Result type alias using the bridge error
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Malformed or conflicting declarations. Always raised before any native
/// tool is invoked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("adapter `{adapter}` declares arg count {arg_count}, expected at least 1")]
    InvalidArgCount { adapter: String, arg_count: u32 },

    #[error("adapter name must not be empty")]
    EmptyAdapterName,

    #[error("`{site}` in method `{method}` carries conflicting adapters `{first}` and `{second}`")]
    AmbiguousAdapter {
        method: String,
        site: String,
        first: String,
        second: String,
    },

    #[error("adapter `{adapter}` referenced by `{method}` is not registered")]
    UnknownAdapter { adapter: String, method: String },

    #[error("no binding for managed type `{managed_type}` in method `{method}`")]
    UnresolvedType { managed_type: String, method: String },

    #[error("invalid managed type name `{0}`")]
    InvalidTypeName(String),

    #[error("adapter `{adapter}` has no native counterpart type")]
    MissingCounterpart { adapter: String },

    #[error("adapter `{adapter}` needs an element type to bridge `{managed_type}` in method `{method}`")]
    UntypedBuffer {
        adapter: String,
        managed_type: String,
        method: String,
    },

    #[error("parameter `{site}` of method `{method}` cannot have type void")]
    VoidParameter { method: String, site: String },
}

/// Internal invariant violations in the pipeline. These point at a defect in
/// an earlier stage rather than at user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("signature `{method}` references adapter `{adapter}` which is not registered")]
    DanglingAdapter { method: String, adapter: String },

    #[error("signature `{method}` has an inconsistent marshaling sequence: {reason}")]
    InconsistentSteps { method: String, reason: String },

    #[error("class `{0}` has no exported methods")]
    EmptyUnit(String),
}

/// Failure of an external native tool.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolchainError {
    #[error("`{program}` exited with status {status}\n{stdout}\n{stderr}")]
    NonZeroExit {
        program: String,
        status: i32,
        stdout: String,
        stderr: String,
    },

    #[error("`{program}` was terminated by a signal\n{stderr}")]
    Terminated { program: String, stderr: String },

    #[error("failed to launch `{program}`: {reason}")]
    Spawn { program: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Toolchain(#[from] ToolchainError),
}
