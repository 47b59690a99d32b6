// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Platform properties: built-in platform resources, property files and
//! explicit key/value overrides.

use crate::paths::{merge_paths, split_paths};
use anyhow::{anyhow, bail, Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const PLATFORM: &str = "platform";
pub const PATH_SEPARATOR: &str = "platform.path.separator";
pub const COMPILER: &str = "platform.compiler";
pub const COMPILER_DEFAULT: &str = "platform.compiler.default";
pub const COMPILER_OUTPUT: &str = "platform.compiler.output";
pub const INCLUDE_PATH: &str = "platform.includepath";
pub const INCLUDE_PATH_PREFIX: &str = "platform.includepath.prefix";
pub const LINK_PATH: &str = "platform.linkpath";
pub const LINK_PATH_PREFIX: &str = "platform.linkpath.prefix";
pub const LINK_PATH_PREFIX2: &str = "platform.linkpath.prefix2";
pub const LINK: &str = "platform.link";
pub const LINK_PREFIX: &str = "platform.link.prefix";
pub const LINK_SUFFIX: &str = "platform.link.suffix";
pub const PRELOAD: &str = "platform.preload";
pub const PRELOAD_PATH: &str = "platform.preloadpath";
pub const LIBRARY_PREFIX: &str = "platform.library.prefix";
pub const LIBRARY_SUFFIX: &str = "platform.library.suffix";
pub const SOURCE_SUFFIX: &str = "platform.source.suffix";
pub const HEADER_SUFFIX: &str = "platform.header.suffix";
pub const PACKAGER: &str = "platform.packager";

const PLATFORM_RESOURCES: &[(&str, &str)] = &[
    ("linux-x86_64", include_str!("../resources/platforms/linux-x86_64.toml")),
    ("linux-arm64", include_str!("../resources/platforms/linux-arm64.toml")),
    ("macosx-x86_64", include_str!("../resources/platforms/macosx-x86_64.toml")),
    ("macosx-arm64", include_str!("../resources/platforms/macosx-arm64.toml")),
    ("windows-x86_64", include_str!("../resources/platforms/windows-x86_64.toml")),
];

/// Name of the platform resource matching the host, if one is built in.
pub fn host_platform() -> Option<String> {
    let os = match std::env::consts::OS {
        "linux" => "linux",
        "macos" => "macosx",
        "windows" => "windows",
        _ => return None,
    };
    let arch = match std::env::consts::ARCH {
        "x86_64" => "x86_64",
        "aarch64" => "arm64",
        _ => return None,
    };
    Some(format!("{}-{}", os, arch))
}

/// Names of the built-in platform resources
pub fn platform_names() -> impl Iterator<Item = &'static str> {
    PLATFORM_RESOURCES.iter().map(|(name, _)| *name)
}

/// Flat string properties, ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    values: BTreeMap<String, String>,
}

impl Properties {
    /// Properties of a built-in platform resource
    pub fn platform(name: &str) -> Result<Self> {
        let (_, text) = PLATFORM_RESOURCES
            .iter()
            .find(|(platform, _)| *platform == name)
            .ok_or_else(|| {
                anyhow!(
                    "unknown platform properties `{}` (expected one of: {})",
                    name,
                    platform_names().collect::<Vec<_>>().join(", ")
                )
            })?;
        let values: BTreeMap<String, String> =
            toml::from_str(text).with_context(|| format!("Failed to parse platform properties {}", name))?;
        Ok(Self { values })
    }

    /// Base properties in merge order: platform resource, then property file,
    /// then explicit key/values.
    pub fn load<'a>(
        platform: Option<&str>,
        property_file: Option<&Path>,
        explicit: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self> {
        let platform = match platform {
            Some(name) => name.to_string(),
            None => host_platform().ok_or_else(|| anyhow!("no built-in platform properties for this host"))?,
        };
        let mut properties = Self::platform(&platform)?;
        if let Some(path) = property_file {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read property file {}", path.display()))?;
            properties.extend(parse_property_file(&text)?);
        }
        for (key, value) in explicit {
            properties.set(key, value);
        }
        Ok(properties)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn extend(&mut self, other: Properties) {
        self.values.extend(other.values);
    }

    pub fn separator(&self) -> &str {
        self.get_or(PATH_SEPARATOR, if cfg!(windows) { ";" } else { ":" })
    }

    /// Append path values to a path-list property, keeping what is there.
    pub fn merge_paths(&mut self, key: &str, values: &[String]) {
        let merged = merge_paths(self.get_or(key, ""), values, self.separator());
        self.set(key, merged);
    }

    /// Entries of a separator-joined list property
    pub fn list(&self, key: &str) -> Vec<String> {
        split_paths(self.get_or(key, ""), self.separator())
            .map(str::to_string)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Parse `key=value` (or `key: value`) lines. Blank lines and lines starting
/// with `#` or `!` are ignored.
pub fn parse_property_file(text: &str) -> Result<Properties> {
    let mut properties = Properties::default();
    for (number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }
        let Some(split) = line.find(|c| c == '=' || c == ':') else {
            bail!("line {}: expected `key=value`, found `{}`", number + 1, line);
        };
        let (key, value) = line.split_at(split);
        properties.set(key.trim(), value[1..].trim());
    }
    Ok(properties)
}
