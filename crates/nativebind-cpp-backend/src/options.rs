// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

/// Options of the C++ glue generator. Usually filled from the platform
/// properties by the build orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorOptions {
    /// Also emit a companion header declaring every glue function
    pub header: bool,
    /// Suffix of generated translation units, including the dot
    pub source_suffix: String,
    /// Suffix of generated headers, including the dot
    pub header_suffix: String,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            header: false,
            source_suffix: ".cpp".to_string(),
            header_suffix: ".h".to_string(),
        }
    }
}
