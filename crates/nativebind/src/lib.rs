// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! nativebind build orchestration
//!
//! Discovers class descriptors, generates C++ glue through the backend and
//! drives the native toolchain to produce loadable libraries.

pub mod builder;
pub mod discovery;
pub mod logger;
pub mod options;
pub mod paths;
pub mod properties;
pub mod scope;
pub mod staging;
pub mod toolchain;
pub mod type_config;

pub use builder::{execute, plan_libraries, Builder, LibraryPlan};
pub use discovery::{DescriptorDiscovery, MetadataSource, StaticMetadata};
pub use logger::{BuildLogger, LogFacadeLogger};
pub use options::{BuildOptions, KeyValue};
pub use properties::Properties;
pub use scope::ClassScope;
