// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Loads the type mapping table, optionally extended by a TOML file.
//!
//! ```toml
//! [adapters.PointsAdapter]
//! arg_count = 2
//! include = "points_adapter.h"
//! counterpart = "geo::Points"
//!
//! [types."com.example.Points"]
//! adapter = "PointsAdapter"
//!
//! [types."com.example.Handle"]
//! native = "void*"
//! ```

use anyhow::{Context, Result};
use nativebind_ir::{BridgeError, ManagedType, TypeConfig, TypeMappingTable, STRING_ADAPTER};
use std::fs;
use std::path::Path;

pub fn parse_type_config(text: &str) -> Result<TypeConfig> {
    Ok(toml::from_str(text)?)
}

/// Built-in adapters with `String` bridged through the string adapter,
/// extended by the type configuration file when one is given.
pub fn load_type_table(path: Option<&Path>) -> Result<TypeMappingTable> {
    let mut builder = TypeMappingTable::builder()
        .with_builtin_adapters()
        .bind_adapter(ManagedType::String, STRING_ADAPTER);
    if let Some(path) = path {
        let text = fs::read_to_string(path).with_context(|| format!("Failed to read type config {}", path.display()))?;
        let config =
            parse_type_config(&text).with_context(|| format!("Failed to parse type config {}", path.display()))?;
        builder = builder
            .apply(config)
            .map_err(BridgeError::from)
            .with_context(|| format!("Invalid type config {}", path.display()))?;
    }
    Ok(builder.build().map_err(BridgeError::from)?)
}
