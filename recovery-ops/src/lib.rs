// SPDX-License-Identifier: GPL-3.0-only

//! Storage decision core of the recovery environment
//!
//! Decides whether a volume may be formatted, routes format requests to the
//! right erase/mkfs backend, lets the operator browse storage for packages
//! and backups, and drives the storage menus. All system access goes through
//! the traits in `recovery-contracts`.

pub mod browser;
pub mod config;
pub mod format;
pub mod fstab;
pub mod menu;
pub mod safety;

pub use browser::{BrowseResult, DirEntry, EntryKind, choose_file_menu, gather_files};
pub use config::{ConfigError, DEFAULT_CONFIG_PATH, RecoveryConfig, StorageLayout};
pub use format::{FormatDispatcher, SD_EXT, wipe_contents};
pub use fstab::{create_fstab, render_fstab};
pub use menu::MenuContext;
pub use menu::partitions::{MenuAction, VolumeMenuBuilder};
pub use safety::{DEFAULT_FORBID_FORMAT, FORBID_FORMAT_PROPERTY, SafetyGate};
