// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Copies runtime dependencies next to the built libraries.

use crate::logger::BuildLogger;
use crate::properties::{Properties, LINK, LINK_PATH, PRELOAD, PRELOAD_PATH};
use crate::toolchain::library_file_name;
use anyhow::{Context, Result};
use itertools::Itertools;
use std::fs;
use std::path::{Path, PathBuf};

/// Library names may carry a version after `@` (`opencv_core@.4.5`),
/// which is appended after the platform suffix when looking for files.
fn split_version(library: &str) -> (&str, &str) {
    library.split_once('@').unwrap_or((library, ""))
}

/// Candidate files for a library in one directory: the exact name first,
/// then any versioned variant such as `libz.so.1` (sorted by name).
fn find_library(dir: &Path, file_name: &str, version: &str) -> Result<Vec<PathBuf>> {
    let exact = dir.join(format!("{}{}", file_name, version));
    if exact.is_file() {
        return Ok(vec![exact]);
    }
    if !dir.is_dir() {
        return Ok(vec![]);
    }
    let versioned_prefix = format!("{}.", file_name);
    let mut found = vec![];
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.starts_with(&versioned_prefix) && path.is_file() {
            found.push(path);
        }
    }
    found.sort();
    Ok(found.into_iter().take(1).collect())
}

/// Copy every library named by `platform.link` and `platform.preload` found
/// in the link and preload paths into `output_dir`. Missing libraries are
/// reported but not fatal.
pub fn copy_libraries(properties: &Properties, output_dir: &Path, logger: &dyn BuildLogger) -> Result<Vec<PathBuf>> {
    let search_paths: Vec<PathBuf> = properties
        .list(LINK_PATH)
        .into_iter()
        .chain(properties.list(PRELOAD_PATH))
        .unique()
        .map(PathBuf::from)
        .collect();
    let libraries: Vec<String> = properties
        .list(LINK)
        .into_iter()
        .chain(properties.list(PRELOAD))
        .unique()
        .collect();

    let mut copied = vec![];
    'libraries: for library in &libraries {
        let (name, version) = split_version(library);
        let file_name = library_file_name(properties, name);
        for dir in &search_paths {
            let found = find_library(dir, &file_name, version)?;
            if let Some(source) = found.first() {
                let Some(base) = source.file_name() else {
                    continue;
                };
                let target = output_dir.join(base);
                if target != *source {
                    logger.info(&format!("Copying {}", source.display()));
                    fs::copy(source, &target)
                        .with_context(|| format!("Failed to copy {} to {}", source.display(), target.display()))?;
                }
                copied.push(target);
                continue 'libraries;
            }
        }
        logger.warn(&format!("Could not find library {}", file_name));
    }
    Ok(copied)
}
