// SPDX-License-Identifier: GPL-3.0-only

use crate::error::BackendResult;

/// Live mount state of the volumes in the catalog
pub trait MountControl {
    fn ensure_mounted(&self, path: &str) -> BackendResult<()>;

    fn ensure_unmounted(&self, path: &str) -> BackendResult<()>;

    fn is_mounted(&self, path: &str) -> bool;
}
