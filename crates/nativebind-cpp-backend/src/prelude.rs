// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Built-in adapter definitions emitted inline into generated units.

use indexmap::IndexSet;
use nativebind_ir::{AdapterDeclaration, BuiltinAdapter};

const EXPORT_MACRO: &str = include_str!("prelude/export.h");
const STRING_ADAPTER: &str = include_str!("prelude/string_adapter.h");
const VECTOR_ADAPTER: &str = include_str!("prelude/vector_adapter.h");

/// Macro marking glue functions as exported from the shared library
pub const EXPORT_MACRO_NAME: &str = "NATIVEBIND_EXPORT";

/// Standard headers every unit needs
const BASE_HEADERS: &[&str] = &["<cstddef>", "<cstdint>"];

pub fn export_macro() -> &'static str {
    EXPORT_MACRO
}

/// Source text of a built-in adapter class
pub fn adapter_source(adapter: BuiltinAdapter) -> &'static str {
    match adapter {
        BuiltinAdapter::String => STRING_ADAPTER,
        BuiltinAdapter::Vector => VECTOR_ADAPTER,
    }
}

fn adapter_headers(adapter: BuiltinAdapter) -> &'static [&'static str] {
    match adapter {
        BuiltinAdapter::String => &["<cstring>", "<string>"],
        BuiltinAdapter::Vector => &["<algorithm>", "<vector>"],
    }
}

/// Standard headers required by the base unit and the built-in adapters it
/// declares, in a fixed order.
pub fn standard_headers(declarations: &IndexSet<AdapterDeclaration>) -> IndexSet<&'static str> {
    let mut headers: IndexSet<&'static str> = BASE_HEADERS.iter().copied().collect();
    for declaration in declarations {
        if let AdapterDeclaration::Prelude(builtin) = declaration {
            headers.extend(adapter_headers(*builtin).iter().copied());
        }
    }
    headers
}
