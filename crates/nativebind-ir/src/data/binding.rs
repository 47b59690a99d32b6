// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Type mapping table: resolves managed types to native representations and
//! the adapters needed to cross the boundary.

use crate::data::adapter::{AdapterDescriptor, BuiltinAdapter, STRING_ADAPTER, VECTOR_ADAPTER};
use crate::data::types::{ManagedType, NativeType};
use crate::error::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Placeholder for the element type in adapter and counterpart spellings
pub const ELEMENT_PLACEHOLDER: &str = "{E}";

/// Where the declaration of an adapter class comes from
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AdapterSource {
    /// Definition emitted by the generator
    Prelude(BuiltinAdapter),
    /// Header to include
    Include(String),
    /// Declared by the class's own includes
    External,
}

/// A registered adapter class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterDefinition {
    pub descriptor: AdapterDescriptor,
    pub source: AdapterSource,
    /// Spelling of the adapter type, may contain `{E}`
    pub instance: String,
    /// Native counterpart type, may contain `{E}`
    pub counterpart: String,
    /// Element type override; otherwise derived from the managed type
    pub element: Option<NativeType>,
}

impl AdapterDefinition {
    pub fn builtin(builtin: BuiltinAdapter) -> Self {
        let (instance, counterpart, element) = match builtin {
            BuiltinAdapter::String => (STRING_ADAPTER.to_string(), "std::string", Some(NativeType::new("char"))),
            BuiltinAdapter::Vector => (
                format!("{}<{}>", VECTOR_ADAPTER, ELEMENT_PLACEHOLDER),
                "std::vector<{E}>",
                None,
            ),
        };
        Self {
            descriptor: AdapterDescriptor::builtin(builtin),
            source: AdapterSource::Prelude(builtin),
            instance,
            counterpart: counterpart.to_string(),
            element,
        }
    }

    pub fn external(descriptor: AdapterDescriptor, counterpart: impl Into<String>) -> Self {
        Self {
            instance: descriptor.name().to_string(),
            descriptor,
            source: AdapterSource::External,
            counterpart: counterpart.into(),
            element: None,
        }
    }

    pub fn with_include(mut self, header: impl Into<String>) -> Self {
        self.source = AdapterSource::Include(header.into());
        self
    }

    pub fn with_element(mut self, element: NativeType) -> Self {
        self.element = Some(element);
        self
    }
}

/// An adapter bound to one site, with every placeholder filled in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoundAdapter {
    pub descriptor: AdapterDescriptor,
    pub source: AdapterSource,
    /// Adapter type as written in generated code (e.g. `VectorAdapter<int32_t>`)
    pub instance: String,
    /// Native type the adapter converts to (e.g. `std::vector<int32_t>`)
    pub counterpart: NativeType,
    /// Element type of the pointer/size groups
    pub element: NativeType,
}

/// Resolved mapping from a managed type to its native representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeBinding {
    pub managed_type: ManagedType,
    /// Native type of the glue parameter, or the adapter counterpart
    pub native_type: NativeType,
    pub adapter: Option<BoundAdapter>,
}

impl TypeBinding {
    pub fn direct(managed_type: ManagedType, native_type: NativeType) -> Self {
        Self {
            managed_type,
            native_type,
            adapter: None,
        }
    }

    pub fn is_bridged(&self) -> bool {
        self.adapter.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum RegisteredType {
    Direct(NativeType),
    Adapter(String),
}

/// Frozen registry of adapters and per-type bindings. Built once per build
/// through [`TypeMappingTableBuilder`] and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMappingTable {
    bindings: BTreeMap<ManagedType, RegisteredType>,
    adapters: BTreeMap<String, AdapterDefinition>,
}

impl TypeMappingTable {
    pub fn builder() -> TypeMappingTableBuilder {
        TypeMappingTableBuilder::default()
    }

    /// Built-in adapters, with `String` bridged through the string adapter.
    pub fn standard() -> Self {
        Self::builder()
            .with_builtin_adapters()
            .bind_adapter(ManagedType::String, STRING_ADAPTER)
            .build()
            .expect("standard table only references built-in adapters")
    }

    pub fn adapter(&self, name: &str) -> Option<&AdapterDefinition> {
        self.adapters.get(name)
    }

    pub fn has_adapter(&self, name: &str) -> bool {
        self.adapters.contains_key(name)
    }

    pub fn adapters(&self) -> impl Iterator<Item = &AdapterDefinition> {
        self.adapters.values()
    }

    /// Resolve a managed type at one site.
    ///
    /// Order: explicit adapter at the site, then the per-type registered
    /// binding, then the direct built-in mapping. Anything else fails with
    /// [`ConfigurationError::UnresolvedType`].
    pub fn resolve(
        &self,
        managed_type: &ManagedType,
        explicit: Option<&AdapterDescriptor>,
        method: &str,
    ) -> Result<TypeBinding, ConfigurationError> {
        if let Some(descriptor) = explicit {
            let definition =
                self.adapters
                    .get(descriptor.name())
                    .ok_or_else(|| ConfigurationError::UnknownAdapter {
                        adapter: descriptor.name().to_string(),
                        method: method.to_string(),
                    })?;
            return Self::bind(managed_type, descriptor, definition, method);
        }

        match self.bindings.get(managed_type) {
            Some(RegisteredType::Direct(native)) => {
                return Ok(TypeBinding::direct(managed_type.clone(), native.clone()));
            }
            Some(RegisteredType::Adapter(name)) => {
                // build() guarantees the adapter exists
                let definition = self.adapters.get(name).ok_or_else(|| ConfigurationError::UnknownAdapter {
                    adapter: name.clone(),
                    method: method.to_string(),
                })?;
                return Self::bind(managed_type, &definition.descriptor, definition, method);
            }
            None => {}
        }

        Self::direct_mapping(managed_type)
            .map(|native| TypeBinding::direct(managed_type.clone(), native))
            .ok_or_else(|| ConfigurationError::UnresolvedType {
                managed_type: managed_type.to_string(),
                method: method.to_string(),
            })
    }

    fn direct_mapping(managed_type: &ManagedType) -> Option<NativeType> {
        match managed_type {
            ManagedType::Void => Some(NativeType::void()),
            ManagedType::Primitive(p) => Some(p.native_type()),
            ManagedType::Array(p) | ManagedType::Pointer(Some(p)) => Some(p.native_type().pointer()),
            ManagedType::Pointer(None) => Some(NativeType::void().pointer()),
            ManagedType::String | ManagedType::Object(_) => None,
        }
    }

    fn bind(
        managed_type: &ManagedType,
        descriptor: &AdapterDescriptor,
        definition: &AdapterDefinition,
        method: &str,
    ) -> Result<TypeBinding, ConfigurationError> {
        let element = definition
            .element
            .clone()
            .or_else(|| managed_type.element_native())
            .ok_or_else(|| ConfigurationError::UntypedBuffer {
                adapter: descriptor.name().to_string(),
                managed_type: managed_type.to_string(),
                method: method.to_string(),
            })?;
        let fill = |template: &str| template.replace(ELEMENT_PLACEHOLDER, element.as_str());
        let counterpart = NativeType::new(fill(&definition.counterpart));

        Ok(TypeBinding {
            managed_type: managed_type.clone(),
            native_type: counterpart.clone(),
            adapter: Some(BoundAdapter {
                descriptor: descriptor.clone(),
                source: definition.source.clone(),
                instance: fill(&definition.instance),
                counterpart,
                element,
            }),
        })
    }
}

#[derive(Debug, Default)]
pub struct TypeMappingTableBuilder {
    bindings: BTreeMap<ManagedType, RegisteredType>,
    adapters: BTreeMap<String, AdapterDefinition>,
}

impl TypeMappingTableBuilder {
    pub fn with_builtin_adapters(self) -> Self {
        self.register_adapter(AdapterDefinition::builtin(BuiltinAdapter::String))
            .register_adapter(AdapterDefinition::builtin(BuiltinAdapter::Vector))
    }

    pub fn register_adapter(mut self, definition: AdapterDefinition) -> Self {
        self.adapters
            .insert(definition.descriptor.name().to_string(), definition);
        self
    }

    pub fn bind_direct(mut self, managed_type: ManagedType, native_type: NativeType) -> Self {
        self.bindings
            .insert(managed_type, RegisteredType::Direct(native_type));
        self
    }

    pub fn bind_adapter(mut self, managed_type: ManagedType, adapter: impl Into<String>) -> Self {
        self.bindings
            .insert(managed_type, RegisteredType::Adapter(adapter.into()));
        self
    }

    /// Apply a user type configuration on top of what is registered so far.
    pub fn apply(mut self, config: TypeConfig) -> Result<Self, ConfigurationError> {
        for (name, adapter) in config.adapters {
            let descriptor = AdapterDescriptor::new(name, adapter.arg_count)?;
            let counterpart = adapter.counterpart.ok_or_else(|| ConfigurationError::MissingCounterpart {
                adapter: descriptor.name().to_string(),
            })?;
            let mut definition = AdapterDefinition::external(descriptor, counterpart);
            if let Some(instance) = adapter.instance {
                definition.instance = instance;
            }
            if let Some(include) = adapter.include {
                definition = definition.with_include(include);
            }
            if let Some(element) = adapter.element {
                definition = definition.with_element(NativeType::new(element));
            }
            self = self.register_adapter(definition);
        }
        for (managed_type, binding) in config.types {
            self = match binding {
                TypeBindingConfig::Direct { native } => self.bind_direct(managed_type, NativeType::new(native)),
                TypeBindingConfig::Adapter { adapter } => self.bind_adapter(managed_type, adapter),
            };
        }
        Ok(self)
    }

    /// Freeze the table. Every per-type adapter binding must name a
    /// registered adapter.
    pub fn build(self) -> Result<TypeMappingTable, ConfigurationError> {
        for (managed_type, registered) in &self.bindings {
            if let RegisteredType::Adapter(name) = registered {
                if !self.adapters.contains_key(name) {
                    return Err(ConfigurationError::UnknownAdapter {
                        adapter: name.clone(),
                        method: format!("<binding for {}>", managed_type),
                    });
                }
            }
        }
        Ok(TypeMappingTable {
            bindings: self.bindings,
            adapters: self.adapters,
        })
    }
}

fn default_arg_count() -> u32 {
    1
}

/// User adapter declaration as read from a type configuration file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdapterConfig {
    #[serde(default = "default_arg_count")]
    pub arg_count: u32,
    #[serde(default)]
    pub include: Option<String>,
    #[serde(default)]
    pub counterpart: Option<String>,
    #[serde(default)]
    pub element: Option<String>,
    #[serde(default)]
    pub instance: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeBindingConfig {
    Direct { native: String },
    Adapter { adapter: String },
}

/// Type configuration file: user adapters and per-type bindings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TypeConfig {
    pub adapters: BTreeMap<String, AdapterConfig>,
    pub types: BTreeMap<ManagedType, TypeBindingConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::types::Primitive;

    #[test]
    fn test_standard_string_binding() {
        let table = TypeMappingTable::standard();
        let binding = table.resolve(&ManagedType::String, None, "f").unwrap();
        let adapter = binding.adapter.unwrap();
        assert_eq!(adapter.instance, "StringAdapter");
        assert_eq!(adapter.counterpart.as_str(), "std::string");
        assert_eq!(adapter.element.as_str(), "char");
    }

    #[test]
    fn test_vector_fills_element() {
        let table = TypeMappingTable::standard();
        let vector = AdapterDescriptor::single(VECTOR_ADAPTER).unwrap();
        let binding = table
            .resolve(&ManagedType::Array(Primitive::Float), Some(&vector), "f")
            .unwrap();
        assert_eq!(binding.native_type.as_str(), "std::vector<float>");
        assert_eq!(binding.adapter.unwrap().instance, "VectorAdapter<float>");
    }

    #[test]
    fn test_resolution_order() {
        let table = TypeMappingTable::builder()
            .with_builtin_adapters()
            .bind_direct(ManagedType::Array(Primitive::Int), NativeType::new("const int32_t*"))
            .build()
            .unwrap();
        let ints = ManagedType::Array(Primitive::Int);

        // registered binding beats the direct mapping
        let registered = table.resolve(&ints, None, "f").unwrap();
        assert_eq!(registered.native_type.as_str(), "const int32_t*");

        // explicit adapter beats the registered binding
        let vector = AdapterDescriptor::single(VECTOR_ADAPTER).unwrap();
        assert!(table.resolve(&ints, Some(&vector), "f").unwrap().is_bridged());

        // direct primitive mapping when nothing is registered
        let long = table.resolve(&ManagedType::Primitive(Primitive::Long), None, "f").unwrap();
        assert_eq!(long.native_type.as_str(), "int64_t");
    }

    #[test]
    fn test_unresolved_object_names_type_and_method() {
        let table = TypeMappingTable::standard();
        let err = table
            .resolve(&ManagedType::Object("com.example.Handle".into()), None, "open")
            .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::UnresolvedType {
                managed_type: "com.example.Handle".to_string(),
                method: "open".to_string()
            }
        );
    }

    #[test]
    fn test_untyped_pointer_cannot_use_vector() {
        let table = TypeMappingTable::standard();
        let vector = AdapterDescriptor::single(VECTOR_ADAPTER).unwrap();
        let err = table.resolve(&ManagedType::Pointer(None), Some(&vector), "f").unwrap_err();
        assert!(matches!(err, ConfigurationError::UntypedBuffer { .. }));
    }

    #[test]
    fn test_build_rejects_unknown_adapter_binding() {
        let err = TypeMappingTable::builder()
            .bind_adapter(ManagedType::String, "MissingAdapter")
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::UnknownAdapter { .. }));
    }

    #[test]
    fn test_apply_type_config() {
        let mut config = TypeConfig::default();
        config.adapters.insert(
            "WideAdapter".to_string(),
            AdapterConfig {
                arg_count: 1,
                include: Some("wide_adapter.h".to_string()),
                counterpart: Some("std::wstring".to_string()),
                element: Some("wchar_t".to_string()),
                instance: None,
            },
        );
        config.types.insert(
            ManagedType::Object("com.example.WideText".to_string()),
            TypeBindingConfig::Adapter {
                adapter: "WideAdapter".to_string(),
            },
        );
        let table = TypeMappingTable::builder()
            .with_builtin_adapters()
            .apply(config)
            .unwrap()
            .build()
            .unwrap();
        let binding = table
            .resolve(&ManagedType::Object("com.example.WideText".into()), None, "f")
            .unwrap();
        let adapter = binding.adapter.unwrap();
        assert_eq!(adapter.source, AdapterSource::Include("wide_adapter.h".to_string()));
        assert_eq!(adapter.element.as_str(), "wchar_t");
        assert_eq!(adapter.counterpart.as_str(), "std::wstring");
    }
}
