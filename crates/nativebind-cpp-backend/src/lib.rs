// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! C++ backend for nativebind
//!
//! Renders translated method signatures into C++ translation units with
//! extern-callable glue functions, and runs the native toolchain.

pub mod escape;
pub mod generator;
pub mod options;
pub mod prelude;
pub mod renderer;
pub mod runtime;

pub use generator::{emit, generate_class, write_unit, GeneratedUnit, WrittenUnit};
pub use options::GeneratorOptions;
pub use runtime::{CommandOutput, CommandSpec, ProcessExecutor, ToolchainExecutor};
