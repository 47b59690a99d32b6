// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Assembles translated signatures into one C++ translation unit per class.

use crate::escape::unit_file_stem;
use crate::options::GeneratorOptions;
use crate::renderer::{render_header, render_to_string, render_unit, UnitParts};
use anyhow::{Context, Result};
use indexmap::IndexSet;
use log::{debug, info};
use nativebind_ir::{
    collect_adapter_declarations, collect_includes, validate_steps, AdapterDeclaration, BridgeError, ClassDescriptor,
    GenerationError, MethodSignature, SignatureTranslator, TypeMappingTable,
};
use std::fs;
use std::path::{Path, PathBuf};

/// Generated source for one class plus the manifest of what it declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    pub class_name: String,
    /// File name without suffix, shared by the source and the header
    pub file_stem: String,
    pub source: String,
    pub header: Option<String>,
    /// Adapter declarations carried by the unit, each exactly once
    pub declarations: IndexSet<AdapterDeclaration>,
    /// Exported glue symbols in declaration order
    pub symbols: Vec<String>,
}

/// Files written for a unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenUnit {
    pub source: PathBuf,
    pub header: Option<PathBuf>,
}

fn check_signature(signature: &MethodSignature, table: &TypeMappingTable) -> std::result::Result<(), GenerationError> {
    for adapter in signature.adapters() {
        if !table.has_adapter(adapter.descriptor.name()) {
            return Err(GenerationError::DanglingAdapter {
                method: format!("{}.{}", signature.class_name, signature.method_name),
                adapter: adapter.descriptor.name().to_string(),
            });
        }
    }
    validate_steps(signature)
}

/// Emit the translation unit of a class.
///
/// Fails before rendering anything if a signature references an adapter the
/// table does not know or carries a malformed step sequence.
pub fn emit(
    class: &ClassDescriptor,
    signatures: &[MethodSignature],
    table: &TypeMappingTable,
    options: &GeneratorOptions,
) -> Result<GeneratedUnit> {
    if signatures.is_empty() {
        return Err(BridgeError::from(GenerationError::EmptyUnit(class.name.clone())).into());
    }
    for signature in signatures {
        check_signature(signature, table).map_err(BridgeError::from)?;
    }

    let mut ordered: Vec<&MethodSignature> = signatures.iter().collect();
    ordered.sort_by_key(|s| s.ordinal);

    let declarations = collect_adapter_declarations(signatures);
    let includes = collect_includes(class, &declarations);
    let parts = UnitParts {
        class_name: &class.name,
        includes: &includes,
        declarations: &declarations,
        signatures: &ordered,
    };
    let source = render_to_string(|w| render_unit(&parts, w));
    let header = options
        .header
        .then(|| render_to_string(|w| render_header(&class.name, &ordered, w)));

    debug!(
        "emitted {} glue functions and {} adapter declarations for {}",
        ordered.len(),
        declarations.len(),
        class.name
    );

    Ok(GeneratedUnit {
        class_name: class.name.clone(),
        file_stem: unit_file_stem(&class.name),
        source,
        header,
        declarations,
        symbols: ordered.iter().map(|s| s.glue_name.clone()).collect(),
    })
}

/// Translate and emit a class in one go.
pub fn generate_class(
    class: &ClassDescriptor,
    table: &TypeMappingTable,
    options: &GeneratorOptions,
) -> Result<GeneratedUnit> {
    let signatures = SignatureTranslator::new(table)
        .translate_class(class)
        .map_err(BridgeError::from)
        .with_context(|| format!("failed to translate class {}", class.name))?;
    emit(class, &signatures, table, options)
        .with_context(|| format!("failed to generate glue for class {}", class.name))
}

/// Write a unit's source (and header, when present) into `output_dir`.
pub fn write_unit(unit: &GeneratedUnit, output_dir: &Path, options: &GeneratorOptions) -> Result<WrittenUnit> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

    let source = output_dir.join(format!("{}{}", unit.file_stem, options.source_suffix));
    fs::write(&source, &unit.source).with_context(|| format!("Failed to write {}", source.display()))?;
    info!("Generating {}", source.display());

    let header = match &unit.header {
        Some(text) => {
            let path = output_dir.join(format!("{}{}", unit.file_stem, options.header_suffix));
            fs::write(&path, text).with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Generating {}", path.display());
            Some(path)
        }
        None => None,
    };

    Ok(WrittenUnit { source, header })
}
