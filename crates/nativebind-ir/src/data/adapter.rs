// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Adapter descriptors and the bridging markers that pre-fill them.
//!
//! An adapter is a native helper class that converts between a managed
//! representation (pointer + size groups) and a native counterpart such as
//! `std::string`. It must provide:
//! - a constructor taking `arg_count` pointer/size pairs
//! - a constructor taking a reference to the counterpart
//! - `static void deallocate(void*)`
//! - conversion operators to pointer and reference forms of both sides
//! - `void assign(pointer, size, ...)`
//! - `size` and `owner` members

use crate::error::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const STRING_ADAPTER: &str = "StringAdapter";
pub const VECTOR_ADAPTER: &str = "VectorAdapter";

fn default_arg_count() -> u32 {
    1
}

#[derive(Deserialize)]
struct RawAdapterDescriptor {
    name: String,
    #[serde(default = "default_arg_count")]
    arg_count: u32,
}

/// Names an adapter class and the number of pointer/size groups its
/// constructor takes. Validated on construction, immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawAdapterDescriptor")]
pub struct AdapterDescriptor {
    name: String,
    arg_count: u32,
}

impl AdapterDescriptor {
    pub fn new(name: impl Into<String>, arg_count: u32) -> Result<Self, ConfigurationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ConfigurationError::EmptyAdapterName);
        }
        if arg_count < 1 {
            return Err(ConfigurationError::InvalidArgCount {
                adapter: name,
                arg_count,
            });
        }
        Ok(Self { name, arg_count })
    }

    pub fn single(name: impl Into<String>) -> Result<Self, ConfigurationError> {
        Self::new(name, 1)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arg_count(&self) -> u32 {
        self.arg_count
    }

    pub(crate) fn builtin(builtin: BuiltinAdapter) -> Self {
        Self {
            name: builtin.name().to_string(),
            arg_count: 1,
        }
    }
}

impl TryFrom<RawAdapterDescriptor> for AdapterDescriptor {
    type Error = ConfigurationError;

    fn try_from(raw: RawAdapterDescriptor) -> Result<Self, Self::Error> {
        Self::new(raw.name, raw.arg_count)
    }
}

impl fmt::Display for AdapterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.arg_count == 1 {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}(argc = {})", self.name, self.arg_count)
        }
    }
}

/// Adapters shipped with the generator; their definitions are emitted inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BuiltinAdapter {
    /// pointer + length <-> owned text
    String,
    /// pointer + length <-> contiguous native buffer
    Vector,
}

impl BuiltinAdapter {
    pub fn name(&self) -> &'static str {
        match self {
            BuiltinAdapter::String => STRING_ADAPTER,
            BuiltinAdapter::Vector => VECTOR_ADAPTER,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            STRING_ADAPTER => Some(BuiltinAdapter::String),
            VECTOR_ADAPTER => Some(BuiltinAdapter::Vector),
            _ => None,
        }
    }
}

/// Marker attached to a parameter or method. Higher-level markers resolve to
/// a concrete descriptor; composition is a closed set, not introspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BridgingMarker {
    StdString,
    StdVector,
    Adapter(AdapterDescriptor),
}

impl BridgingMarker {
    pub fn resolve(&self) -> AdapterDescriptor {
        match self {
            BridgingMarker::StdString => AdapterDescriptor::builtin(BuiltinAdapter::String),
            BridgingMarker::StdVector => AdapterDescriptor::builtin(BuiltinAdapter::Vector),
            BridgingMarker::Adapter(descriptor) => descriptor.clone(),
        }
    }
}
