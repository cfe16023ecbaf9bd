// SPDX-License-Identifier: GPL-3.0-only

use std::path::Path;

use recovery_types::{RestoreSelection, SessionOptions};

use crate::error::BackendResult;

pub trait PackageInstaller {
    fn install(&self, package: &Path, options: &SessionOptions) -> BackendResult<()>;
}

pub trait Nandroid {
    fn backup(&self, backup_dir: &Path) -> BackendResult<()>;

    fn restore(&self, backup_dir: &Path, selection: &RestoreSelection) -> BackendResult<()>;
}
