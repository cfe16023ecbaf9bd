// SPDX-License-Identifier: GPL-3.0-only

use std::process::Command;

use tracing::{debug, warn};
use which::which;

use crate::error::{Result, SysError};

pub fn render(command: &str, args: &[&str]) -> String {
    if args.is_empty() {
        command.to_string()
    } else {
        format!("{} {}", command, args.join(" "))
    }
}

/// Run a tool from PATH to completion and return its stdout
pub fn run(command: &str, args: &[&str]) -> Result<String> {
    let program = which(command).map_err(|_| SysError::ToolNotFound(command.to_string()))?;
    let rendered = render(command, args);
    debug!("Running {}", rendered);

    let output = Command::new(&program)
        .args(args)
        .output()
        .map_err(|error| SysError::CommandFailed {
            command: rendered.clone(),
            stderr: error.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        warn!("{} failed: {}", rendered, stderr.trim());
        return Err(SysError::CommandFailed {
            command: rendered,
            stderr,
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_command_context() {
        let rendered = render("flash_erase", &["/dev/mtd/mtd3", "0", "0"]);
        assert_eq!(rendered, "flash_erase /dev/mtd/mtd3 0 0");
        assert_eq!(render("sync", &[]), "sync");
    }

    #[test]
    fn missing_tool_is_reported() {
        let error = run("definitely-not-a-recovery-tool", &[]).unwrap_err();
        assert!(matches!(error, SysError::ToolNotFound(_)));
    }
}
