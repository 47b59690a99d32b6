// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Collects the adapter declarations and headers a unit needs

use crate::data::adapter::BuiltinAdapter;
use crate::data::binding::AdapterSource;
use crate::data::descriptor::ClassDescriptor;
use crate::data::signature::MethodSignature;
use indexmap::IndexSet;

/// A declaration the generated unit must carry exactly once
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AdapterDeclaration {
    /// Inline definition of a built-in adapter template
    Prelude(BuiltinAdapter),
    /// `#include` of a user adapter header
    Include(String),
}

/// Adapter declarations in first-use order. Adapters declared by the
/// class's own includes contribute nothing.
pub fn collect_adapter_declarations(signatures: &[MethodSignature]) -> IndexSet<AdapterDeclaration> {
    signatures
        .iter()
        .flat_map(|s| s.adapters())
        .filter_map(|adapter| match &adapter.source {
            AdapterSource::Prelude(builtin) => Some(AdapterDeclaration::Prelude(*builtin)),
            AdapterSource::Include(header) => Some(AdapterDeclaration::Include(header.clone())),
            AdapterSource::External => None,
        })
        .collect()
}

/// Class headers followed by adapter headers, without duplicates
pub fn collect_includes(class: &ClassDescriptor, declarations: &IndexSet<AdapterDeclaration>) -> IndexSet<String> {
    let adapter_headers = declarations.iter().filter_map(|d| match d {
        AdapterDeclaration::Include(header) => Some(header.clone()),
        AdapterDeclaration::Prelude(_) => None,
    });
    class.includes.iter().cloned().chain(adapter_headers).collect()
}
