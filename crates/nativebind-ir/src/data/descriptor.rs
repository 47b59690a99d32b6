// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Class and method descriptors produced by the discovery collaborator.

use crate::data::adapter::BridgingMarker;
use crate::data::types::ManagedType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Data flow of a parameter across the boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    In,
    Out,
    #[serde(alias = "in_out")]
    InOut,
}

impl Direction {
    /// Whether native-side changes flow back to the managed side
    pub fn propagates(&self) -> bool {
        matches!(self, Direction::Out | Direction::InOut)
    }

    /// Whether the managed value is read before the call
    pub fn reads_input(&self) -> bool {
        matches!(self, Direction::In | Direction::InOut)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::In => write!(f, "in"),
            Direction::Out => write!(f, "out"),
            Direction::InOut => write!(f, "inout"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub managed_type: ManagedType,
    #[serde(default)]
    pub direction: Direction,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub markers: Vec<BridgingMarker>,
}

impl ParameterDescriptor {
    pub fn new(managed_type: ManagedType) -> Self {
        Self {
            name: None,
            managed_type,
            direction: Direction::In,
            markers: vec![],
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_marker(mut self, marker: BridgingMarker) -> Self {
        self.markers.push(marker);
        self
    }
}

fn void_type() -> ManagedType {
    ManagedType::Void
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub name: String,
    /// Native function to call; defaults to the method name
    #[serde(default)]
    pub native_name: Option<String>,
    #[serde(default)]
    pub parameters: Vec<ParameterDescriptor>,
    #[serde(default = "void_type")]
    pub return_type: ManagedType,
    /// Markers on the method itself apply to the return value
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub return_markers: Vec<BridgingMarker>,
}

impl MethodDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            native_name: None,
            parameters: vec![],
            return_type: ManagedType::Void,
            return_markers: vec![],
        }
    }

    pub fn param(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn returns(mut self, return_type: ManagedType) -> Self {
        self.return_type = return_type;
        self
    }

    pub fn return_marker(mut self, marker: BridgingMarker) -> Self {
        self.return_markers.push(marker);
        self
    }

    pub fn calls(mut self, native_name: impl Into<String>) -> Self {
        self.native_name = Some(native_name.into());
        self
    }

    pub fn native_target(&self) -> &str {
        self.native_name.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDescriptor {
    /// Fully qualified managed class name
    pub name: String,
    /// Library this class is linked into, when not overridden by the build
    #[serde(default)]
    pub library: Option<String>,
    /// Native headers declaring the bridged functions
    #[serde(default)]
    pub includes: Vec<String>,
    #[serde(default)]
    pub methods: Vec<MethodDescriptor>,
}

impl ClassDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            library: None,
            includes: vec![],
            methods: vec![],
        }
    }

    pub fn include(mut self, header: impl Into<String>) -> Self {
        self.includes.push(header.into());
        self
    }

    pub fn method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// Package part of the name; empty for the default package
    pub fn package(&self) -> &str {
        self.name.rsplit_once('.').map_or("", |(package, _)| package)
    }

    pub fn library_name(&self) -> String {
        self.library
            .clone()
            .unwrap_or_else(|| format!("jni{}", self.simple_name()))
    }
}

/// Top-level shape of a descriptor file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptorDocument {
    #[serde(default)]
    pub classes: Vec<ClassDescriptor>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::types::Primitive;

    #[test]
    fn test_class_names() {
        let class = ClassDescriptor::new("com.example.io.Files");
        assert_eq!(class.simple_name(), "Files");
        assert_eq!(class.package(), "com.example.io");
        assert_eq!(class.library_name(), "jniFiles");
        assert_eq!(ClassDescriptor::new("Top").package(), "");
    }

    #[test]
    fn test_deserialize_method() {
        let json = r#"{
            "name": "fill",
            "parameters": [
                {"name": "data", "type": "int[]", "direction": "inout", "markers": [{"kind": "std_vector"}]},
                {"type": "long"}
            ],
            "return_type": "boolean"
        }"#;
        let method: MethodDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(method.parameters.len(), 2);
        assert_eq!(method.parameters[0].direction, Direction::InOut);
        assert_eq!(method.parameters[0].markers, vec![BridgingMarker::StdVector]);
        assert_eq!(method.parameters[1].direction, Direction::In);
        assert_eq!(method.return_type, ManagedType::Primitive(Primitive::Boolean));
        assert_eq!(method.native_target(), "fill");
    }
}
