// SPDX-License-Identifier: GPL-3.0-only

use recovery_contracts::VolumeCatalog;
use recovery_types::Volume;

#[derive(Debug, Clone, Default)]
pub struct FakeCatalog {
    volumes: Vec<Volume>,
}

impl FakeCatalog {
    pub fn new(volumes: Vec<Volume>) -> Self {
        Self { volumes }
    }

    /// A yaffs2/mtd phone with a vfat SD card
    pub fn mtd_device() -> Self {
        Self::new(vec![
            Volume::new("/boot", "mtd", "boot"),
            Volume::new("/cache", "yaffs2", "cache"),
            Volume::new("/data", "yaffs2", "userdata"),
            Volume::new("/misc", "mtd", "misc"),
            Volume::new("/recovery", "mtd", "recovery"),
            Volume::new("/sdcard", "vfat", "/dev/block/mmcblk0p1")
                .with_device2("/dev/block/mmcblk0"),
            Volume::new("/system", "yaffs2", "system"),
        ])
    }

    /// An eMMC device whose user storage lives in /data/media
    pub fn data_media_device() -> Self {
        Self::new(vec![
            Volume::new("/boot", "emmc", "/dev/block/mmcblk0p7"),
            Volume::new("/cache", "ext4", "/dev/block/mmcblk0p8"),
            Volume::new("/data", "ext4", "/dev/block/mmcblk0p10").with_length(-16384),
            Volume::new("/system", "ext4", "/dev/block/mmcblk0p9"),
        ])
    }

    pub fn with_volume(mut self, volume: Volume) -> Self {
        self.volumes.push(volume);
        self
    }
}

impl VolumeCatalog for FakeCatalog {
    fn all_volumes(&self) -> &[Volume] {
        &self.volumes
    }
}
