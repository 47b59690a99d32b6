// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Toolchain execution through tokio subprocesses

use super::command::{CommandOutput, CommandSpec};
use async_trait::async_trait;
use log::debug;
use nativebind_ir::ToolchainError;
use tokio::process::Command;

/// Narrow interface for running a native tool and collecting its result.
/// The exit status is reported, not judged; callers decide via
/// [`CommandOutput::check`].
#[async_trait]
pub trait ToolchainExecutor: Send + Sync {
    async fn execute(&self, spec: &CommandSpec) -> Result<CommandOutput, ToolchainError>;
}

/// Runs commands as child processes and waits for them to finish.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExecutor;

#[async_trait]
impl ToolchainExecutor for ProcessExecutor {
    async fn execute(&self, spec: &CommandSpec) -> Result<CommandOutput, ToolchainError> {
        debug!("running {}", spec);

        let mut command = Command::new(&spec.program);
        command.args(&spec.args).envs(&spec.env);
        if let Some(dir) = &spec.current_dir {
            command.current_dir(dir);
        }

        let output = command.output().await.map_err(|e| ToolchainError::Spawn {
            program: spec.program.clone(),
            reason: e.to_string(),
        })?;

        Ok(CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}
