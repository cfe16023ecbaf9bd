// SPDX-License-Identifier: GPL-3.0-only

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    UnknownVolume,
    UnsafeTarget,
    UnsupportedFsType,
    MountFailure,
    UnmountFailure,
    FlashIoFailure,
    ImageBuildFailure,
    DirectoryUnavailable,
}

impl ErrorKind {
    /// Stable outcome code surfaced to operators and scripts
    pub fn code(self) -> u16 {
        match self {
            Self::UnknownVolume => 10,
            Self::UnsafeTarget => 11,
            Self::UnsupportedFsType => 12,
            Self::MountFailure => 20,
            Self::UnmountFailure => 21,
            Self::FlashIoFailure => 30,
            Self::ImageBuildFailure => 31,
            Self::DirectoryUnavailable => 40,
        }
    }
}

/// Failure of a storage operation.
///
/// Backend detail never appears here; it is logged where the backend error is
/// translated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecoveryError {
    #[error("unknown volume \"{0}\"")]
    UnknownVolume(String),

    #[error("refusing to format protected volume \"{0}\"")]
    UnsafeTarget(String),

    #[error("can't format \"{mount_point}\" as {fs_type}")]
    UnsupportedFsType { mount_point: String, fs_type: String },

    #[error("can't mount {0}")]
    MountFailure(String),

    #[error("can't unmount {0}")]
    UnmountFailure(String),

    #[error("flash {operation} failed on \"{device}\"")]
    FlashIoFailure {
        device: String,
        operation: &'static str,
    },

    #[error("failed to build {fs_type} filesystem on {device}")]
    ImageBuildFailure { device: String, fs_type: String },

    #[error("can't open directory {0}")]
    DirectoryUnavailable(String),
}

impl RecoveryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownVolume(_) => ErrorKind::UnknownVolume,
            Self::UnsafeTarget(_) => ErrorKind::UnsafeTarget,
            Self::UnsupportedFsType { .. } => ErrorKind::UnsupportedFsType,
            Self::MountFailure(_) => ErrorKind::MountFailure,
            Self::UnmountFailure(_) => ErrorKind::UnmountFailure,
            Self::FlashIoFailure { .. } => ErrorKind::FlashIoFailure,
            Self::ImageBuildFailure { .. } => ErrorKind::ImageBuildFailure,
            Self::DirectoryUnavailable(_) => ErrorKind::DirectoryUnavailable,
        }
    }

    pub fn code(&self) -> u16 {
        self.kind().code()
    }
}

/// Result of a format request; all-or-nothing from the caller's side
pub type FormatOutcome = Result<(), RecoveryError>;

/// Opaque failure reported by a backend collaborator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct BackendError {
    pub message: String,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub type BackendResult<T> = Result<T, BackendError>;
