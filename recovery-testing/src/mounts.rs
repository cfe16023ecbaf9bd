// SPDX-License-Identifier: GPL-3.0-only

use std::cell::RefCell;
use std::collections::BTreeSet;

use recovery_contracts::{BackendError, BackendResult, MountControl};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountCall {
    Mount(String),
    Unmount(String),
}

/// Mount table keyed by mount point, with per-path failure injection
#[derive(Debug, Default)]
pub struct FakeMounts {
    mounted: RefCell<BTreeSet<String>>,
    refuse_mount: BTreeSet<String>,
    refuse_unmount: BTreeSet<String>,
    calls: RefCell<Vec<MountCall>>,
}

impl FakeMounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mounted(self, path: &str) -> Self {
        self.mounted.borrow_mut().insert(path.to_string());
        self
    }

    pub fn refusing_mount(mut self, path: &str) -> Self {
        self.refuse_mount.insert(path.to_string());
        self
    }

    pub fn refusing_unmount(mut self, path: &str) -> Self {
        self.refuse_unmount.insert(path.to_string());
        self
    }

    pub fn calls(&self) -> Vec<MountCall> {
        self.calls.borrow().clone()
    }

    pub fn mounted(&self) -> Vec<String> {
        self.mounted.borrow().iter().cloned().collect()
    }
}

impl MountControl for FakeMounts {
    fn ensure_mounted(&self, path: &str) -> BackendResult<()> {
        self.calls.borrow_mut().push(MountCall::Mount(path.to_string()));
        if self.refuse_mount.contains(path) {
            return Err(BackendError::new(format!("mount {path} refused")));
        }
        self.mounted.borrow_mut().insert(path.to_string());
        Ok(())
    }

    fn ensure_unmounted(&self, path: &str) -> BackendResult<()> {
        self.calls
            .borrow_mut()
            .push(MountCall::Unmount(path.to_string()));
        if self.refuse_unmount.contains(path) {
            return Err(BackendError::new(format!("unmount {path} refused")));
        }
        self.mounted.borrow_mut().remove(path);
        Ok(())
    }

    fn is_mounted(&self, path: &str) -> bool {
        self.mounted.borrow().contains(path)
    }
}
