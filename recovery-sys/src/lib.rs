// SPDX-License-Identifier: GPL-3.0-only

//! Low-level system operations for the recovery environment
//!
//! This crate provides the real implementations of the recovery contracts:
//! - Volume table loading from the recovery fstab
//! - Mount state from the kernel mount table, mount(2)/umount(2)
//! - Raw flash partition discovery and erase
//! - Filesystem creation through the mkfs tools shipped in the image
//! - System property files
//! - Package installer and nandroid helpers run as external programs
//!
//! These operations require root and must only be called from the recovery
//! process itself.

pub mod cmd;
pub mod error;
pub mod fstab;
pub mod installer;
pub mod mkfs;
pub mod mounts;
pub mod mtd;
pub mod props;

pub use error::{Result, SysError};
pub use fstab::FstabCatalog;
pub use installer::{CommandInstaller, CommandNandroid};
pub use mkfs::{E2fsTools, MakeExt4fs, RfsTool, SysRawEraser};
pub use mounts::{MountEntry, SysMountControl, parse_mount_table};
pub use mtd::{MtdPartitions, parse_proc_mtd};
pub use props::PropertyFiles;
