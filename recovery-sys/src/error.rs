// SPDX-License-Identifier: GPL-3.0-only

use recovery_contracts::BackendError;
use thiserror::Error;

/// Error types for system-level operations
#[derive(Error, Debug)]
pub enum SysError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("System call failed: {0}")]
    Errno(#[from] nix::errno::Errno),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Command failed: {command}; stderr: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("Invalid volume table line {line}: {reason}")]
    InvalidVolumeTable { line: usize, reason: String },

    #[error("Unsupported: {0}")]
    Unsupported(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

/// Result type alias for system operations
pub type Result<T> = std::result::Result<T, SysError>;

impl From<SysError> for BackendError {
    fn from(error: SysError) -> Self {
        BackendError::new(error.to_string())
    }
}
