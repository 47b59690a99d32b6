// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Renders the companion header declaring every glue function of a unit.

use super::code_writer::CodeWriter;
use super::function_renderer::render_prototype;
use crate::escape::include_guard;
use nativebind_ir::MethodSignature;

pub fn render_header(class_name: &str, signatures: &[&MethodSignature], w: &mut CodeWriter) {
    let guard = include_guard(class_name);
    w.line(&format!("// Generated by nativebind for {}. Do not edit.", class_name));
    w.line(&format!("#ifndef {}", guard));
    w.line(&format!("#define {}", guard));
    w.newline();
    w.line("#include <stddef.h>");
    w.line("#include <stdint.h>");
    w.line("#ifndef __cplusplus");
    w.line("#include <stdbool.h>");
    w.line("#endif");
    w.newline();
    w.line("#ifdef __cplusplus");
    w.line("extern \"C\" {");
    w.line("#endif");
    w.newline();
    for signature in signatures {
        render_prototype(signature, w);
        w.line(";");
    }
    w.newline();
    w.line("#ifdef __cplusplus");
    w.line("}");
    w.line("#endif");
    w.newline();
    w.line(&format!("#endif // {}", guard));
}
