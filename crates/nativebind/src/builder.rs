// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Build orchestrator: discovery, translation, generation, compilation,
//! library staging and packaging.

use crate::discovery::{select_classes, DescriptorDiscovery, MetadataSource};
use crate::logger::{BuildLogger, LogFacadeLogger};
use crate::options::BuildOptions;
use crate::properties::{
    Properties, HEADER_SUFFIX, INCLUDE_PATH, LINK_PATH, PLATFORM, PRELOAD_PATH, SOURCE_SUFFIX,
};
use crate::scope::ClassScope;
use crate::staging::copy_libraries;
use crate::toolchain::{archive_name, compile_command, library_file_name, package_command};
use crate::type_config::load_type_table;
use anyhow::{Context, Result};
use indexmap::IndexMap;
use nativebind_cpp_backend::{
    generate_class, write_unit, CommandSpec, GeneratorOptions, ProcessExecutor, ToolchainExecutor, WrittenUnit,
};
use nativebind_ir::{BridgeError, ClassDescriptor};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

/// Default output location, relative to the working directory
const DEFAULT_OUTPUT_DIRECTORY: &str = "target/nativebind";

/// Classes linked into one shared library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryPlan {
    pub name: String,
    pub classes: Vec<ClassDescriptor>,
}

/// One library named by `output_name`, otherwise one per class library name
/// (`jni<SimpleName>` unless the descriptor names one), in discovery order.
pub fn plan_libraries(classes: Vec<ClassDescriptor>, output_name: Option<&str>) -> Vec<LibraryPlan> {
    if let Some(name) = output_name {
        return vec![LibraryPlan {
            name: name.to_string(),
            classes,
        }];
    }
    let mut plans: IndexMap<String, Vec<ClassDescriptor>> = IndexMap::new();
    for class in classes {
        plans.entry(class.library_name()).or_default().push(class);
    }
    plans
        .into_iter()
        .map(|(name, classes)| LibraryPlan { name, classes })
        .collect()
}

pub struct Builder {
    options: BuildOptions,
    executor: Arc<dyn ToolchainExecutor>,
    logger: Arc<dyn BuildLogger>,
    metadata: Option<Arc<dyn MetadataSource>>,
}

impl Builder {
    pub fn new(options: BuildOptions) -> Self {
        Self {
            options,
            executor: Arc::new(ProcessExecutor),
            logger: Arc::new(LogFacadeLogger),
            metadata: None,
        }
    }

    pub fn with_executor(mut self, executor: Arc<dyn ToolchainExecutor>) -> Self {
        self.executor = executor;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn BuildLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Use this source instead of reading descriptors from the class paths.
    pub fn with_metadata(mut self, metadata: Arc<dyn MetadataSource>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Platform properties with the include, link and preload paths of the
    /// options merged in.
    pub fn properties(&self) -> Result<Properties> {
        let explicit = self
            .options
            .property
            .iter()
            .map(|kv| (kv.key.as_str(), kv.value.as_str()));
        let mut properties = Properties::load(
            self.options.properties.as_deref(),
            self.options.property_file.as_deref(),
            explicit,
        )?;
        properties.merge_paths(INCLUDE_PATH, &self.options.all_include_paths());
        properties.merge_paths(LINK_PATH, &self.options.all_link_paths());
        properties.merge_paths(PRELOAD_PATH, &self.options.all_preload_paths());
        Ok(properties)
    }

    /// Always absolute: toolchain commands run with it as working directory.
    fn output_directory(&self, properties: &Properties) -> Result<PathBuf> {
        let dir = self.options.output_directory.clone().unwrap_or_else(|| {
            PathBuf::from(DEFAULT_OUTPUT_DIRECTORY).join(properties.get_or(PLATFORM, "unknown"))
        });
        std::path::absolute(&dir).with_context(|| format!("Failed to resolve output directory {}", dir.display()))
    }

    /// Run the whole pipeline. Returns the produced files.
    pub async fn execute(&self) -> Result<Vec<PathBuf>> {
        let logger = self.logger.as_ref();
        logger.info("Executing nativebind Builder");
        self.options.log_debug(logger);

        if self.options.skip {
            logger.info("Skipped execution of nativebind Builder");
            return Ok(vec![]);
        }

        let outputs = self
            .build()
            .await
            .context("Failed to execute nativebind Builder")?;

        logger.info("Successfully executed nativebind Builder");
        logger.debug(&format!("outputFiles: {:?}", outputs));
        Ok(outputs)
    }

    async fn build(&self) -> Result<Vec<PathBuf>> {
        let logger = self.logger.as_ref();
        let properties = self.properties()?;
        let table = load_type_table(self.options.type_config.as_deref())?;

        let scopes: Vec<ClassScope> = self
            .options
            .all_class_or_package_names()
            .iter()
            .filter_map(|name| name.parse().ok())
            .collect();
        let classes = match &self.metadata {
            Some(source) => source.load_classes(logger)?,
            None => DescriptorDiscovery::new(self.options.all_class_paths()).load_classes(logger)?,
        };
        let classes: Vec<ClassDescriptor> = select_classes(classes, &scopes)
            .into_iter()
            .filter(|class| {
                if class.methods.is_empty() {
                    logger.warn(&format!("Skipping {}: no native methods", class.name));
                }
                !class.methods.is_empty()
            })
            .collect();
        if classes.is_empty() {
            logger.warn("No classes found to process");
            return Ok(vec![]);
        }

        let output_dir = self.output_directory(&properties)?;
        let generator_options = GeneratorOptions {
            header: self.options.header,
            source_suffix: properties.get_or(SOURCE_SUFFIX, ".cpp").to_string(),
            header_suffix: properties.get_or(HEADER_SUFFIX, ".h").to_string(),
        };

        // Every unit is generated before the first tool runs.
        let mut libraries: Vec<(String, Vec<WrittenUnit>)> = vec![];
        for plan in plan_libraries(classes, self.options.output_name.as_deref()) {
            let mut units = vec![];
            for class in &plan.classes {
                let unit = generate_class(class, &table, &generator_options)?;
                logger.info(&format!("Generating glue for {}", class.name));
                units.push(write_unit(&unit, &output_dir, &generator_options)?);
            }
            libraries.push((plan.name, units));
        }

        let mut outputs = vec![];
        for (name, units) in &libraries {
            if self.options.compiles() {
                let library = output_dir.join(library_file_name(&properties, name));
                let sources: Vec<PathBuf> = units.iter().map(|u| u.source.clone()).collect();
                let command = compile_command(
                    &properties,
                    &sources,
                    &library,
                    &self.options.compiler_options,
                    &self.options.environment_variables,
                )?;
                logger.info(&format!("Compiling {}", library.display()));
                self.run(&command)
                    .await
                    .with_context(|| format!("Failed to build library {}", library.display()))?;
                for source in &sources {
                    fs::remove_file(source).with_context(|| format!("Failed to delete {}", source.display()))?;
                }
                outputs.push(library);
            } else {
                outputs.extend(units.iter().map(|u| u.source.clone()));
            }
            outputs.extend(units.iter().filter_map(|u| u.header.clone()));
        }

        if self.options.compiles() && self.options.copy_libs {
            outputs.extend(copy_libraries(&properties, &output_dir, logger)?);
        }

        if let Some(prefix) = &self.options.jar_prefix {
            let archive = output_dir.join(archive_name(&properties, prefix));
            let command = package_command(
                &properties,
                &output_dir,
                &archive,
                &outputs,
                &self.options.environment_variables,
            );
            logger.info(&format!("Creating {}", archive.display()));
            self.run(&command)
                .await
                .with_context(|| format!("Failed to create archive {}", archive.display()))?;
            outputs.push(archive);
        }

        Ok(outputs)
    }

    async fn run(&self, command: &CommandSpec) -> Result<()> {
        self.logger.debug(&command.to_string());
        let output = self.executor.execute(command).await.map_err(BridgeError::from)?;
        if !output.stdout.trim().is_empty() {
            self.logger.debug(output.stdout.trim_end());
        }
        if output.success() && !output.stderr.trim().is_empty() {
            self.logger.warn(output.stderr.trim_end());
        }
        output.check(&command.program).map_err(BridgeError::from)?;
        Ok(())
    }
}

/// Build with the default executor and logger.
pub async fn execute(options: BuildOptions) -> Result<Vec<PathBuf>> {
    Builder::new(options).execute().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_per_class_library() {
        let mut shared = ClassDescriptor::new("b.Two");
        shared.library = Some("jnishared".to_string());
        let mut also_shared = ClassDescriptor::new("c.Three");
        also_shared.library = Some("jnishared".to_string());
        let classes = vec![ClassDescriptor::new("a.One"), shared, also_shared];

        let plans = plan_libraries(classes.clone(), None);
        let names: Vec<_> = plans.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["jniOne", "jnishared"]);
        assert_eq!(plans[1].classes.len(), 2);

        let single = plan_libraries(classes, Some("jniall"));
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].classes.len(), 3);
    }
}
