// SPDX-License-Identifier: GPL-3.0-only

//! In-memory collaborators for exercising the recovery core
//!
//! Every fake records what it was asked to do so tests can assert on the
//! exact backend calls a decision produced, including "none at all".

pub mod backends;
pub mod catalog;
pub mod collaborators;
pub mod mounts;
pub mod prompt;
pub mod tempdir;

pub use backends::{BackendCall, RecordingBackends};
pub use catalog::FakeCatalog;
pub use collaborators::{RecordingInstaller, RecordingNandroid};
pub use mounts::{FakeMounts, MountCall};
pub use prompt::ScriptedPrompt;
pub use tempdir::TempDir;
