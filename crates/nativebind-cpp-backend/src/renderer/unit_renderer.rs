// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Renders a complete translation unit for one class.

use super::code_writer::CodeWriter;
use super::function_renderer::render_glue_function;
use crate::escape::include_operand;
use crate::prelude::{adapter_source, export_macro, standard_headers};
use indexmap::IndexSet;
use nativebind_ir::{AdapterDeclaration, MethodSignature};

pub struct UnitParts<'a> {
    pub class_name: &'a str,
    pub includes: &'a IndexSet<String>,
    pub declarations: &'a IndexSet<AdapterDeclaration>,
    /// Already sorted by ordinal
    pub signatures: &'a [&'a MethodSignature],
}

pub fn render_unit(parts: &UnitParts<'_>, w: &mut CodeWriter) {
    w.line(&format!("// Generated by nativebind for {}. Do not edit.", parts.class_name));
    w.newline();

    for header in standard_headers(parts.declarations) {
        w.line(&format!("#include {}", header));
    }
    for header in parts.includes {
        w.line(&format!("#include {}", include_operand(header)));
    }
    w.newline();

    w.text(export_macro());

    for declaration in parts.declarations {
        if let AdapterDeclaration::Prelude(builtin) = declaration {
            w.newline();
            w.text(adapter_source(*builtin));
        }
    }

    w.newline();
    w.line("extern \"C\" {");
    for signature in parts.signatures {
        w.newline();
        render_glue_function(signature, w);
    }
    w.newline();
    w.line("}");
}
