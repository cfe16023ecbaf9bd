// SPDX-License-Identifier: GPL-3.0-only

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use recovery_contracts::{BackendError, BackendResult, Nandroid, PackageInstaller};
use recovery_types::{RestoreSelection, SessionOptions};

#[derive(Debug, Default)]
pub struct RecordingInstaller {
    pub fail: bool,
    installs: RefCell<Vec<(PathBuf, SessionOptions)>>,
}

impl RecordingInstaller {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn installs(&self) -> Vec<(PathBuf, SessionOptions)> {
        self.installs.borrow().clone()
    }
}

impl PackageInstaller for RecordingInstaller {
    fn install(&self, package: &Path, options: &SessionOptions) -> BackendResult<()> {
        self.installs
            .borrow_mut()
            .push((package.to_path_buf(), *options));
        if self.fail {
            return Err(BackendError::new("installer exited with status 1"));
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct RecordingNandroid {
    backups: RefCell<Vec<PathBuf>>,
    restores: RefCell<Vec<(PathBuf, RestoreSelection)>>,
}

impl RecordingNandroid {
    pub fn backups(&self) -> Vec<PathBuf> {
        self.backups.borrow().clone()
    }

    pub fn restores(&self) -> Vec<(PathBuf, RestoreSelection)> {
        self.restores.borrow().clone()
    }
}

impl Nandroid for RecordingNandroid {
    fn backup(&self, backup_dir: &Path) -> BackendResult<()> {
        self.backups.borrow_mut().push(backup_dir.to_path_buf());
        Ok(())
    }

    fn restore(&self, backup_dir: &Path, selection: &RestoreSelection) -> BackendResult<()> {
        self.restores
            .borrow_mut()
            .push((backup_dir.to_path_buf(), *selection));
        Ok(())
    }
}
