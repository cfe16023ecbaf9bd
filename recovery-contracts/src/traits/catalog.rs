// SPDX-License-Identifier: GPL-3.0-only

use recovery_types::Volume;

/// Source of the device's volume table
pub trait VolumeCatalog {
    fn all_volumes(&self) -> &[Volume];

    /// The volume whose mount point is `path` or the closest ancestor of it
    fn volume_for_path(&self, path: &str) -> Option<&Volume> {
        self.all_volumes()
            .iter()
            .filter(|volume| volume.covers(path))
            .max_by_key(|volume| volume.mount_point.len())
    }

    /// The volume mounted exactly at `mount_point`
    fn volume_at(&self, mount_point: &str) -> Option<&Volume> {
        self.all_volumes()
            .iter()
            .find(|volume| volume.mount_point == mount_point)
    }
}
