// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Naming helpers for generated files and preprocessor symbols

/// File stem of the unit generated for a class: `com.example.Codec` -> `jnicom_example_Codec`
pub fn unit_file_stem(class_name: &str) -> String {
    format!("jni{}", sanitize(class_name))
}

/// Include guard of a companion header
pub fn include_guard(class_name: &str) -> String {
    format!("NATIVEBIND_{}_H", sanitize(class_name).to_ascii_uppercase())
}

/// `#include` operand: bracketed and quoted names are kept, bare names are quoted
pub fn include_operand(header: &str) -> String {
    let header = header.trim();
    if (header.starts_with('<') && header.ends_with('>')) || (header.starts_with('"') && header.ends_with('"')) {
        header.to_string()
    } else {
        format!("\"{}\"", header)
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names() {
        assert_eq!(unit_file_stem("com.example.Codec"), "jnicom_example_Codec");
        assert_eq!(include_guard("com.example.Codec"), "NATIVEBIND_COM_EXAMPLE_CODEC_H");
    }

    #[test]
    fn test_include_operand() {
        assert_eq!(include_operand("codec.h"), "\"codec.h\"");
        assert_eq!(include_operand("<vector>"), "<vector>");
        assert_eq!(include_operand("\"a/b.h\""), "\"a/b.h\"");
    }
}
