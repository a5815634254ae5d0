use anyhow::{Context, Result};
use std::process::{Command, Stdio};

#[cfg(target_os = "macos")]
pub(crate) const DEFAULT_OPENER: &str = "open";
#[cfg(windows)]
pub(crate) const DEFAULT_OPENER: &str = "explorer";
#[cfg(not(any(target_os = "macos", windows)))]
pub(crate) const DEFAULT_OPENER: &str = "xdg-open";

/// External program that opens a document location.
#[derive(Debug, Clone)]
pub(crate) struct Opener {
    program: String,
}

impl Opener {
    pub(crate) fn new(program: Option<String>) -> Self {
        Self {
            program: program.unwrap_or_else(|| DEFAULT_OPENER.to_string()),
        }
    }

    pub(crate) fn program(&self) -> &str {
        &self.program
    }

    /// Runs the opener with `location` as its only argument and waits for it.
    /// Returns whether it exited successfully.
    pub(crate) fn launch(&self, location: &str) -> Result<bool> {
        log::debug!("Launching {} {location}", self.program());
        let status = Command::new(&self.program)
            .arg(location)
            .stdin(Stdio::null())
            .status()
            .with_context(|| format!("Failed to run opener '{}'", self.program))?;

        if !status.success() {
            log::warn!("{} exited with {status}", self.program);
        }
        Ok(status.success())
    }
}
