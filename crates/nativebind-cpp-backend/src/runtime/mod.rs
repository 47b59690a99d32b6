// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Runtime execution of the native toolchain

pub mod command;
pub mod process_executor;

pub use command::{CommandOutput, CommandSpec};
pub use process_executor::{ProcessExecutor, ToolchainExecutor};
