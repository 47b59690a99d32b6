// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Class descriptor discovery.
//!
//! Descriptors are produced by a separate scanner as JSON documents
//! (`{"classes": [...]}`) and picked up from the class paths.

use crate::logger::BuildLogger;
use crate::scope::ClassScope;
use anyhow::{Context, Result};
use indexmap::IndexMap;
use nativebind_ir::{ClassDescriptor, DescriptorDocument};
use std::fs;
use std::path::{Path, PathBuf};

/// Supplies class descriptors to the orchestrator.
pub trait MetadataSource: Send + Sync {
    fn load_classes(&self, logger: &dyn BuildLogger) -> Result<Vec<ClassDescriptor>>;
}

/// Reads `*.json` descriptor documents from files or directories (recursively).
#[derive(Debug, Clone)]
pub struct DescriptorDiscovery {
    class_paths: Vec<PathBuf>,
}

impl DescriptorDiscovery {
    pub fn new<I, P>(class_paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            class_paths: class_paths.into_iter().map(Into::into).collect(),
        }
    }

    fn descriptor_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = vec![];
        for class_path in &self.class_paths {
            if class_path.is_file() {
                files.push(class_path.clone());
                continue;
            }
            let pattern = class_path.join("**").join("*.json");
            let pattern = pattern.to_string_lossy();
            let matches = glob::glob(&pattern).with_context(|| format!("Invalid class path {}", class_path.display()))?;
            for entry in matches {
                files.push(entry.with_context(|| format!("Failed to read class path {}", class_path.display()))?);
            }
        }
        Ok(files)
    }
}

fn read_document(path: &Path) -> Result<DescriptorDocument> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse class descriptors in {}", path.display()))
}

impl MetadataSource for DescriptorDiscovery {
    fn load_classes(&self, logger: &dyn BuildLogger) -> Result<Vec<ClassDescriptor>> {
        let mut classes: IndexMap<String, ClassDescriptor> = IndexMap::new();
        for path in self.descriptor_files()? {
            logger.debug(&format!("Loading descriptors from {}", path.display()));
            for class in read_document(&path)?.classes {
                if classes.contains_key(&class.name) {
                    logger.warn(&format!(
                        "Ignoring duplicate descriptor of {} in {}",
                        class.name,
                        path.display()
                    ));
                    continue;
                }
                classes.insert(class.name.clone(), class);
            }
        }
        Ok(classes.into_values().collect())
    }
}

/// Descriptors known up front, e.g. produced in-process.
#[derive(Debug, Clone, Default)]
pub struct StaticMetadata {
    pub classes: Vec<ClassDescriptor>,
}

impl MetadataSource for StaticMetadata {
    fn load_classes(&self, _logger: &dyn BuildLogger) -> Result<Vec<ClassDescriptor>> {
        Ok(self.classes.clone())
    }
}

/// Classes selected by the scopes, in discovery order.
pub fn select_classes(classes: Vec<ClassDescriptor>, scopes: &[ClassScope]) -> Vec<ClassDescriptor> {
    classes
        .into_iter()
        .filter(|class| ClassScope::any_matches(scopes, &class.name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::LogFacadeLogger;

    fn write(path: &Path, classes: &[&str]) {
        let document = DescriptorDocument {
            classes: classes.iter().map(|name| ClassDescriptor::new(*name)).collect(),
        };
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, serde_json::to_string(&document).unwrap()).unwrap();
    }

    #[test]
    fn test_discovers_nested_documents() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("a.json"), &["com.example.A"]);
        write(&dir.path().join("nested/deeper/b.json"), &["com.example.io.B", "com.example.A"]);
        fs::write(dir.path().join("notes.txt"), "not a descriptor").unwrap();

        let classes = DescriptorDiscovery::new([dir.path()])
            .load_classes(&LogFacadeLogger)
            .unwrap();
        let names: Vec<_> = classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["com.example.A", "com.example.io.B"]);
    }

    #[test]
    fn test_single_file_class_path() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("only.json");
        write(&file, &["Top"]);
        let classes = DescriptorDiscovery::new([file]).load_classes(&LogFacadeLogger).unwrap();
        assert_eq!(classes.len(), 1);
    }

    #[test]
    fn test_invalid_document_names_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.json"), "{\"classes\": 3}").unwrap();
        let err = DescriptorDiscovery::new([dir.path()])
            .load_classes(&LogFacadeLogger)
            .unwrap_err();
        assert!(format!("{:#}", err).contains("bad.json"));
    }

    #[test]
    fn test_select_classes() {
        let classes = vec![
            ClassDescriptor::new("a.X"),
            ClassDescriptor::new("a.b.Y"),
            ClassDescriptor::new("c.Z"),
        ];
        let scopes: Vec<ClassScope> = vec!["a.*".parse().unwrap(), "c.Z".parse().unwrap()];
        let names: Vec<_> = select_classes(classes.clone(), &scopes)
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["a.X", "c.Z"]);
        assert_eq!(select_classes(classes, &[]).len(), 3);
    }
}
