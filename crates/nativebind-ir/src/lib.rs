// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! nativebind intermediate representation
//!
//! Descriptor model for managed classes with native methods, the type mapping
//! table that decides how each managed type crosses the boundary, and the
//! translator that turns descriptors into adapter-aware method signatures.
//! Source generation lives in backend crates (nativebind-cpp-backend).

pub mod analysis;
mod data;
pub mod error;
pub mod translation;

pub use analysis::{collect_adapter_declarations, collect_includes, overloaded_methods, validate_steps, AdapterDeclaration};

// Descriptors (from data/descriptor.rs)
pub use data::descriptor::{ClassDescriptor, DescriptorDocument, Direction, MethodDescriptor, ParameterDescriptor};

// Adapters and markers (from data/adapter.rs)
pub use data::adapter::{AdapterDescriptor, BridgingMarker, BuiltinAdapter, STRING_ADAPTER, VECTOR_ADAPTER};

// Type mapping (from data/binding.rs)
pub use data::binding::{
    AdapterConfig, AdapterDefinition, AdapterSource, BoundAdapter, TypeBinding, TypeBindingConfig, TypeConfig,
    TypeMappingTable, TypeMappingTableBuilder, ELEMENT_PLACEHOLDER,
};

// Signatures (from data/signature.rs)
pub use data::signature::{CallResult, GlueParam, MarshalStep, MethodSignature, ParameterSpec, ReturnSpec};

// Types (from data/types.rs)
pub use data::types::{ManagedType, NativeType, Primitive, POINTER_PACKAGE};

pub use error::{BridgeError, ConfigurationError, GenerationError, Result, ToolchainError};
pub use translation::{glue_symbol, mangle, SignatureTranslator};
