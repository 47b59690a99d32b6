// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Logging sink injected into the build orchestrator

/// Receives the orchestrator's progress and diagnostics.
pub trait BuildLogger: Send + Sync {
    fn debug(&self, message: &str);
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Forwards every message to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFacadeLogger;

impl BuildLogger for LogFacadeLogger {
    fn debug(&self, message: &str) {
        log::debug!("{}", message);
    }

    fn info(&self, message: &str) {
        log::info!("{}", message);
    }

    fn warn(&self, message: &str) {
        log::warn!("{}", message);
    }

    fn error(&self, message: &str) {
        log::error!("{}", message);
    }
}
