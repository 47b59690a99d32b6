// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Managed and native type representations

use crate::error::ConfigurationError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Package that hosts the managed pointer classes.
pub const POINTER_PACKAGE: &str = "org.bytedeco.javacpp";

static QUALIFIED_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*(\.[A-Za-z_$][A-Za-z0-9_$]*)*$")
        .expect("qualified name pattern is valid")
});

/// Managed primitive kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Primitive {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl Primitive {
    pub const ALL: [Primitive; 8] = [
        Primitive::Boolean,
        Primitive::Byte,
        Primitive::Char,
        Primitive::Short,
        Primitive::Int,
        Primitive::Long,
        Primitive::Float,
        Primitive::Double,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Managed spelling (e.g. "int")
    pub fn name(&self) -> &'static str {
        match self {
            Primitive::Boolean => "boolean",
            Primitive::Byte => "byte",
            Primitive::Char => "char",
            Primitive::Short => "short",
            Primitive::Int => "int",
            Primitive::Long => "long",
            Primitive::Float => "float",
            Primitive::Double => "double",
        }
    }

    pub fn native_type(&self) -> NativeType {
        NativeType::new(match self {
            Primitive::Boolean => "bool",
            Primitive::Byte => "int8_t",
            Primitive::Char => "uint16_t",
            Primitive::Short => "int16_t",
            Primitive::Int => "int32_t",
            Primitive::Long => "int64_t",
            Primitive::Float => "float",
            Primitive::Double => "double",
        })
    }

    /// Single letter used in managed method signatures
    pub fn signature_code(&self) -> char {
        match self {
            Primitive::Boolean => 'Z',
            Primitive::Byte => 'B',
            Primitive::Char => 'C',
            Primitive::Short => 'S',
            Primitive::Int => 'I',
            Primitive::Long => 'J',
            Primitive::Float => 'F',
            Primitive::Double => 'D',
        }
    }

    /// Name of the managed pointer class addressing elements of this kind
    pub fn pointer_class(&self) -> &'static str {
        match self {
            Primitive::Boolean => "BooleanPointer",
            Primitive::Byte => "BytePointer",
            Primitive::Char => "CharPointer",
            Primitive::Short => "ShortPointer",
            Primitive::Int => "IntPointer",
            Primitive::Long => "LongPointer",
            Primitive::Float => "FloatPointer",
            Primitive::Double => "DoublePointer",
        }
    }
}

/// A type as it appears in a managed method signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ManagedType {
    Void,
    Primitive(Primitive),
    String,
    /// Managed array of primitives
    Array(Primitive),
    /// Externally owned memory handle; `None` for the untyped base pointer
    Pointer(Option<Primitive>),
    /// Any other managed class, by qualified name
    Object(String),
}

impl ManagedType {
    pub fn is_void(&self) -> bool {
        matches!(self, ManagedType::Void)
    }

    /// Native element type of a buffer-like managed type.
    pub fn element_native(&self) -> Option<NativeType> {
        match self {
            ManagedType::String => Some(NativeType::new("char")),
            ManagedType::Array(p) | ManagedType::Pointer(Some(p)) => Some(p.native_type()),
            _ => None,
        }
    }

    /// Descriptor string in managed signature notation (e.g. `[I`, `Ljava/lang/String;`).
    pub fn signature_code(&self) -> String {
        match self {
            ManagedType::Void => "V".to_string(),
            ManagedType::Primitive(p) => p.signature_code().to_string(),
            ManagedType::String => "Ljava/lang/String;".to_string(),
            ManagedType::Array(p) => format!("[{}", p.signature_code()),
            ManagedType::Pointer(elem) => {
                let class = elem.map_or("Pointer", |p| p.pointer_class());
                format!("L{}/{};", POINTER_PACKAGE.replace('.', "/"), class)
            }
            ManagedType::Object(name) => format!("L{};", name.replace('.', "/")),
        }
    }

    fn parse_pointer(name: &str) -> Option<Self> {
        let simple = name
            .strip_prefix(POINTER_PACKAGE)
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(name);
        if simple == "Pointer" {
            return Some(ManagedType::Pointer(None));
        }
        Primitive::ALL
            .into_iter()
            .find(|p| p.pointer_class() == simple)
            .map(|p| ManagedType::Pointer(Some(p)))
    }
}

impl FromStr for ManagedType {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if let Some(elem) = name.strip_suffix("[]") {
            return Primitive::from_name(elem.trim())
                .map(ManagedType::Array)
                .ok_or_else(|| ConfigurationError::InvalidTypeName(s.to_string()));
        }
        if name == "void" {
            return Ok(ManagedType::Void);
        }
        if let Some(p) = Primitive::from_name(name) {
            return Ok(ManagedType::Primitive(p));
        }
        if name == "String" || name == "java.lang.String" {
            return Ok(ManagedType::String);
        }
        if let Some(pointer) = Self::parse_pointer(name) {
            return Ok(pointer);
        }
        if QUALIFIED_NAME.is_match(name) {
            Ok(ManagedType::Object(name.to_string()))
        } else {
            Err(ConfigurationError::InvalidTypeName(s.to_string()))
        }
    }
}

impl TryFrom<String> for ManagedType {
    type Error = ConfigurationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ManagedType> for String {
    fn from(value: ManagedType) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ManagedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManagedType::Void => write!(f, "void"),
            ManagedType::Primitive(p) => write!(f, "{}", p.name()),
            ManagedType::String => write!(f, "java.lang.String"),
            ManagedType::Array(p) => write!(f, "{}[]", p.name()),
            ManagedType::Pointer(None) => write!(f, "Pointer"),
            ManagedType::Pointer(Some(p)) => write!(f, "{}", p.pointer_class()),
            ManagedType::Object(name) => write!(f, "{}", name),
        }
    }
}

/// Spelling of a native (C++) type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NativeType(String);

impl NativeType {
    pub fn new(spelling: impl Into<String>) -> Self {
        Self(spelling.into())
    }

    pub fn void() -> Self {
        Self::new("void")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_void(&self) -> bool {
        self.0 == "void"
    }

    pub fn pointer(&self) -> Self {
        Self(format!("{}*", self.0))
    }
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
