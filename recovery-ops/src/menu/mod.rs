// SPDX-License-Identifier: GPL-3.0-only

//! Interactive menus
//!
//! Every menu is a loop over [`Prompt::select`](recovery_contracts::Prompt)
//! that rebuilds its items as tagged records each round, so a selection
//! carries its own operation and target.

pub mod install;
pub mod maintenance;
pub mod nandroid;
pub mod partitions;
pub mod ums;

use recovery_contracts::{
    FlashPartitions, MountControl, Nandroid, PackageInstaller, Prompt, VolumeCatalog,
};

use crate::config::StorageLayout;
use crate::format::FormatDispatcher;
use crate::safety::SafetyGate;

/// Collaborators shared by the menus of one session
pub struct MenuContext<'a> {
    pub layout: &'a StorageLayout,
    pub catalog: &'a dyn VolumeCatalog,
    pub mounts: &'a dyn MountControl,
    pub flash: &'a dyn FlashPartitions,
    pub gate: &'a SafetyGate,
    pub dispatcher: &'a FormatDispatcher<'a>,
    pub installer: &'a dyn PackageInstaller,
    pub nandroid: &'a dyn Nandroid,
}

impl MenuContext<'_> {
    /// Internal storage is only offered when it is a separate volume and
    /// user storage is not emulated on /data.
    pub fn has_internal_storage(&self) -> bool {
        self.catalog.volume_at(&self.layout.internal_storage).is_some()
            && !(self.layout.data_media
                && self.catalog.volume_at(&self.layout.primary_storage).is_none())
    }

    /// Mount `path`, telling the operator when that fails
    pub(crate) fn mount_or_report(&self, prompt: &mut dyn Prompt, path: &str) -> bool {
        match self.mounts.ensure_mounted(path) {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!("Can't mount {}: {}", path, error);
                prompt.print(&format!("Can't mount {}", path));
                false
            }
        }
    }
}

/// Final path component of a browser selection
pub(crate) fn basename(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

#[cfg(test)]
mod tests {
    use super::basename;

    #[test]
    fn basename_of_files_and_dirs() {
        assert_eq!(basename("/sdcard/roms/cm.zip"), "cm.zip");
        assert_eq!(basename("/sdcard/clockworkmod/backup/2026-01-02.03.04.05/"), "2026-01-02.03.04.05");
        assert_eq!(basename("update.zip"), "update.zip");
    }
}
