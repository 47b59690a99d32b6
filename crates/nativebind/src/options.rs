// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Build options, from the command line or a TOML configuration file.

use crate::logger::BuildLogger;
use crate::paths::merge_list;
use anyhow::{bail, Context, Result};
use clap::Args;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// A `KEY=VALUE` pair, used for properties and environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

impl FromStr for KeyValue {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let Some((key, value)) = s.split_once('=') else {
            bail!("expected KEY=VALUE, found `{}`", s);
        };
        if key.trim().is_empty() {
            bail!("empty key in `{}`", s);
        }
        Ok(Self {
            key: key.trim().to_string(),
            value: value.to_string(),
        })
    }
}

impl TryFrom<String> for KeyValue {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<KeyValue> for String {
    fn from(kv: KeyValue) -> Self {
        kv.to_string()
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Build options
#[derive(Args, Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[clap(next_help_heading = "Build Options")]
#[serde(default, deny_unknown_fields)]
pub struct BuildOptions {
    /// Directory or file containing class descriptors
    #[clap(long = "class-path")]
    pub class_path: Option<String>,

    /// Directories or files containing class descriptors
    #[clap(long = "class-paths", value_delimiter = ',')]
    pub class_paths: Vec<String>,

    /// Additional include path
    #[clap(long = "include-path")]
    pub include_path: Option<String>,

    /// Additional include paths
    #[clap(long = "include-paths", value_delimiter = ',')]
    pub include_paths: Vec<String>,

    /// Additional link path
    #[clap(long = "link-path")]
    pub link_path: Option<String>,

    /// Additional link paths
    #[clap(long = "link-paths", value_delimiter = ',')]
    pub link_paths: Vec<String>,

    /// Additional preload path
    #[clap(long = "preload-path")]
    pub preload_path: Option<String>,

    /// Additional preload paths
    #[clap(long = "preload-paths", value_delimiter = ',')]
    pub preload_paths: Vec<String>,

    /// Output directory of generated sources, libraries and archives
    #[clap(long = "output-directory", short = 'd')]
    pub output_directory: Option<PathBuf>,

    /// Compile every class into one library with this name
    #[clap(long = "output-name", short = 'o')]
    pub output_name: Option<String>,

    /// Compile generated sources and delete them afterwards (default true)
    #[clap(long, action = clap::ArgAction::Set)]
    pub compile: Option<bool>,

    /// Also generate a header declaring the glue functions
    #[clap(long)]
    pub header: bool,

    /// Copy libraries named by platform.link and platform.preload to the output directory
    #[clap(long = "copy-libs")]
    pub copy_libs: bool,

    /// Package produced files into `<prefix>-<platform>.jar`
    #[clap(long = "jar-prefix")]
    pub jar_prefix: Option<String>,

    /// Name of the built-in platform properties (defaults to the host)
    #[clap(long)]
    pub properties: Option<String>,

    /// File of `key=value` properties applied over the platform properties
    #[clap(long = "property-file")]
    pub property_file: Option<PathBuf>,

    /// Property applied last (repeatable)
    #[clap(long = "property", short = 'P')]
    pub property: Vec<KeyValue>,

    /// Class or package to process (`pkg.*` direct members, `pkg.**` recursive)
    #[clap(long = "class-or-package-name")]
    pub class_or_package_name: Option<String>,

    /// Classes or packages to process
    #[clap(long = "class-or-package-names", value_delimiter = ',')]
    pub class_or_package_names: Vec<String>,

    /// Environment variable for the native toolchain (repeatable)
    #[clap(long = "env", short = 'E')]
    pub environment_variables: Vec<KeyValue>,

    /// Extra option passed to the compiler (repeatable)
    #[clap(long = "compiler-option", short = 'X', allow_hyphen_values = true)]
    pub compiler_options: Vec<String>,

    /// Do nothing
    #[clap(long)]
    pub skip: bool,

    /// TOML file with user adapters and type bindings
    #[clap(long = "type-config")]
    pub type_config: Option<PathBuf>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            class_path: None,
            class_paths: vec![],
            include_path: None,
            include_paths: vec![],
            link_path: None,
            link_paths: vec![],
            preload_path: None,
            preload_paths: vec![],
            output_directory: None,
            output_name: None,
            compile: None,
            header: false,
            copy_libs: false,
            jar_prefix: None,
            properties: None,
            property_file: None,
            property: vec![],
            class_or_package_name: None,
            class_or_package_names: vec![],
            environment_variables: vec![],
            compiler_options: vec![],
            skip: false,
            type_config: None,
        }
    }
}

impl BuildOptions {
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("Failed to parse build options in {}", path.display()))
    }

    /// Layer `other` (typically the command line) over these options: lists
    /// are appended, and any value `other` changes from its default wins.
    pub fn overlay(mut self, other: BuildOptions) -> Self {
        let defaults = BuildOptions::default();
        macro_rules! replace {
            ($($field:ident),*) => {
                $(if other.$field != defaults.$field {
                    self.$field = other.$field;
                })*
            };
        }
        macro_rules! append {
            ($($field:ident),*) => {
                $(self.$field.extend(other.$field);)*
            };
        }
        replace!(
            class_path,
            include_path,
            link_path,
            preload_path,
            output_directory,
            output_name,
            compile,
            header,
            copy_libs,
            jar_prefix,
            properties,
            property_file,
            class_or_package_name,
            skip,
            type_config
        );
        append!(
            class_paths,
            include_paths,
            link_paths,
            preload_paths,
            property,
            class_or_package_names,
            environment_variables,
            compiler_options
        );
        self
    }

    pub fn compiles(&self) -> bool {
        self.compile.unwrap_or(true)
    }

    pub fn all_class_paths(&self) -> Vec<String> {
        merge_list(&self.class_paths, self.class_path.as_ref())
    }

    pub fn all_include_paths(&self) -> Vec<String> {
        merge_list(&self.include_paths, self.include_path.as_ref())
    }

    pub fn all_link_paths(&self) -> Vec<String> {
        merge_list(&self.link_paths, self.link_path.as_ref())
    }

    pub fn all_preload_paths(&self) -> Vec<String> {
        merge_list(&self.preload_paths, self.preload_path.as_ref())
    }

    pub fn all_class_or_package_names(&self) -> Vec<String> {
        merge_list(&self.class_or_package_names, self.class_or_package_name.as_ref())
    }

    /// Dump every option at debug level.
    pub fn log_debug(&self, logger: &dyn BuildLogger) {
        logger.debug(&format!("classPath: {:?}", self.class_path));
        logger.debug(&format!("classPaths: {:?}", self.class_paths));
        logger.debug(&format!("includePath: {:?}", self.include_path));
        logger.debug(&format!("includePaths: {:?}", self.include_paths));
        logger.debug(&format!("linkPath: {:?}", self.link_path));
        logger.debug(&format!("linkPaths: {:?}", self.link_paths));
        logger.debug(&format!("preloadPath: {:?}", self.preload_path));
        logger.debug(&format!("preloadPaths: {:?}", self.preload_paths));
        logger.debug(&format!("outputDirectory: {:?}", self.output_directory));
        logger.debug(&format!("outputName: {:?}", self.output_name));
        logger.debug(&format!("compile: {}", self.compiles()));
        logger.debug(&format!("header: {}", self.header));
        logger.debug(&format!("copyLibs: {}", self.copy_libs));
        logger.debug(&format!("jarPrefix: {:?}", self.jar_prefix));
        logger.debug(&format!("properties: {:?}", self.properties));
        logger.debug(&format!("propertyFile: {:?}", self.property_file));
        logger.debug(&format!(
            "propertyKeysAndValues: [{}]",
            self.property.iter().map(KeyValue::to_string).collect::<Vec<_>>().join(", ")
        ));
        logger.debug(&format!("classOrPackageName: {:?}", self.class_or_package_name));
        logger.debug(&format!("classOrPackageNames: {:?}", self.class_or_package_names));
        logger.debug(&format!(
            "environmentVariables: [{}]",
            self.environment_variables
                .iter()
                .map(KeyValue::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        ));
        logger.debug(&format!("compilerOptions: {:?}", self.compiler_options));
        logger.debug(&format!("skip: {}", self.skip));
        logger.debug(&format!("typeConfig: {:?}", self.type_config));
    }
}
