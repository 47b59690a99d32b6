// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Glue symbol naming, following the managed runtime's native method
//! naming convention so the symbols can be bound without registration.

use crate::data::types::ManagedType;

/// Prefix of every exported glue symbol
pub const GLUE_PREFIX: &str = "Java_";

/// Escape a qualified name or signature into a symbol fragment.
pub fn mangle(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '.' | '/' => out.push('_'),
            '_' => out.push_str("_1"),
            ';' => out.push_str("_2"),
            '[' => out.push_str("_3"),
            c if c.is_ascii_alphanumeric() => out.push(c),
            c => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    out.push_str(&format!("_0{:04x}", unit));
                }
            }
        }
    }
    out
}

/// Symbol name of the glue function. The long form, with the mangled
/// parameter signature, is only used when the method is overloaded.
pub fn glue_symbol(class_name: &str, method_name: &str, overload: Option<&[ManagedType]>) -> String {
    let mut symbol = format!("{}{}_{}", GLUE_PREFIX, mangle(class_name), mangle(method_name));
    if let Some(parameters) = overload {
        let signature: String = parameters.iter().map(ManagedType::signature_code).collect();
        symbol.push_str("__");
        symbol.push_str(&mangle(&signature));
    }
    symbol
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::types::Primitive;

    #[test]
    fn test_mangle_escapes() {
        assert_eq!(mangle("com.example.my_lib"), "com_example_my_1lib");
        assert_eq!(mangle("Outer$Inner"), "Outer_00024Inner");
        assert_eq!(mangle("[ILjava/lang/String;"), "_3ILjava_lang_String_2");
    }

    #[test]
    fn test_glue_symbol_forms() {
        assert_eq!(glue_symbol("com.example.Math", "add", None), "Java_com_example_Math_add");
        let params = [ManagedType::Primitive(Primitive::Int), ManagedType::String];
        assert_eq!(
            glue_symbol("com.example.Math", "add", Some(&params)),
            "Java_com_example_Math_add__ILjava_lang_String_2"
        );
        assert_eq!(glue_symbol("Top", "run", Some(&[])), "Java_Top_run__");
    }
}
