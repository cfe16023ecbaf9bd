// SPDX-License-Identifier: GPL-3.0-only

//! Canonical domain models for recovery storage operations
//!
//! These models are shared by every layer of the stack:
//!
//! - **recovery-sys**: builds `Volume`s from the recovery fstab
//! - **recovery-ops**: dispatches formats and renders menus over them
//! - **recovery-cli**: prints and serializes them
//!
//! A `Volume` is immutable once loaded and is owned by the catalog; everything
//! else borrows it.

pub mod action;
pub mod common;
pub mod fs_type;
pub mod nandroid;
pub mod session;
pub mod volume;

pub use action::{ActionKind, VolumeAction};
pub use common::partition_size;
pub use fs_type::{FlashType, FsType};
pub use nandroid::{RestorePart, RestoreSelection};
pub use session::SessionOptions;
pub use volume::{FormatRequest, Volume};
