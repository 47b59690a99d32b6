// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Toolchain command specification and captured result

use nativebind_ir::ToolchainError;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// One external tool invocation: program, ordered arguments and an
/// environment overlay on top of the inherited environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub env: BTreeMap<String, String>,
    pub current_dir: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Default::default()
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn envs(mut self, env: impl IntoIterator<Item = (String, String)>) -> Self {
        self.env.extend(env);
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.contains(char::is_whitespace) {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Exit status and captured output of a finished command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the process was terminated by a signal
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// Turn a failed exit into a [`ToolchainError`] carrying the captured output.
    pub fn check(self, program: &str) -> Result<CommandOutput, ToolchainError> {
        match self.status {
            Some(0) => Ok(self),
            Some(status) => Err(ToolchainError::NonZeroExit {
                program: program.to_string(),
                status,
                stdout: self.stdout,
                stderr: self.stderr,
            }),
            None => Err(ToolchainError::Terminated {
                program: program.to_string(),
                stderr: self.stderr,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_quotes_whitespace() {
        let spec = CommandSpec::new("g++").arg("-I/usr/include").arg("/tmp/my dir/a.cpp");
        assert_eq!(spec.to_string(), "g++ -I/usr/include \"/tmp/my dir/a.cpp\"");
    }

    #[test]
    fn test_check_keeps_diagnostics() {
        let output = CommandOutput {
            status: Some(1),
            stdout: String::new(),
            stderr: "a.cpp:1: error: boom".to_string(),
        };
        assert_eq!(
            output.check("g++"),
            Err(ToolchainError::NonZeroExit {
                program: "g++".to_string(),
                status: 1,
                stdout: String::new(),
                stderr: "a.cpp:1: error: boom".to_string(),
            })
        );
    }
}
