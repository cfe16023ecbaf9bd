// SPDX-License-Identifier: GPL-3.0-only

//! Recovery tool configuration
//!
//! Loaded from a TOML file; every field has a default matching a stock
//! recovery image, so an empty file (or no file at all) is a valid setup.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use recovery_contracts::VolumeCatalog;
use recovery_types::FsType;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "/etc/recovery-tool.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoveryConfig {
    /// Host prefix every absolute recovery path is resolved under
    pub fs_root: PathBuf,
    pub volume_table: String,
    pub property_files: Vec<String>,
    /// Inline property overrides, applied after the property files
    pub properties: BTreeMap<String, String>,
    pub primary_storage: String,
    pub internal_storage: String,
    /// Confirmation bypass marker, relative to primary storage
    pub no_confirm_marker: String,
    /// Nandroid backup directory, relative to a storage root
    pub backup_dir: String,
    /// Forces data-as-media on or off; detected from the catalog when unset
    pub data_media: Option<bool>,
    pub ums_lunfile: String,
    pub ums_second_lunfile: Option<String>,
    pub log_file: String,
    pub installer_command: String,
    pub nandroid_command: String,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            fs_root: PathBuf::from("/"),
            volume_table: "/etc/recovery.fstab".to_string(),
            property_files: vec!["/default.prop".to_string(), "/system/build.prop".to_string()],
            properties: BTreeMap::new(),
            primary_storage: "/sdcard".to_string(),
            internal_storage: "/emmc".to_string(),
            no_confirm_marker: "clockworkmod/.no_confirm".to_string(),
            backup_dir: "clockworkmod/backup".to_string(),
            data_media: None,
            ums_lunfile: "/sys/devices/platform/usb_mass_storage/lun0/file".to_string(),
            ums_second_lunfile: None,
            log_file: "/tmp/recovery.log".to_string(),
            installer_command: "recovery-install".to_string(),
            nandroid_command: "nandroid".to_string(),
        }
    }
}

impl RecoveryConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load an explicit config, or the default one when it exists.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let default_path = Path::new(DEFAULT_CONFIG_PATH);
        if default_path.exists() {
            tracing::debug!("Loading config from {}", default_path.display());
            Self::load(default_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn host_path(&self, path: &str) -> PathBuf {
        host_path(&self.fs_root, path)
    }

    /// Resolve the storage layout against the loaded volume table
    pub fn layout(&self, catalog: &dyn VolumeCatalog) -> StorageLayout {
        let data_media = self.data_media.unwrap_or_else(|| {
            catalog
                .volume_at(&self.primary_storage)
                .is_none_or(|volume| volume.kind() == FsType::DataMedia)
        });

        StorageLayout {
            fs_root: self.fs_root.clone(),
            primary_storage: self.primary_storage.clone(),
            internal_storage: self.internal_storage.clone(),
            no_confirm_marker: self.no_confirm_marker.clone(),
            backup_dir: self.backup_dir.clone(),
            data_media,
            ums_lunfile: self.ums_lunfile.clone(),
            ums_second_lunfile: self.ums_second_lunfile.clone(),
            log_file: self.log_file.clone(),
        }
    }
}

/// Storage facts the core consults while running
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    pub fs_root: PathBuf,
    pub primary_storage: String,
    pub internal_storage: String,
    pub no_confirm_marker: String,
    pub backup_dir: String,
    /// User storage lives under /data/media instead of its own volume
    pub data_media: bool,
    pub ums_lunfile: String,
    pub ums_second_lunfile: Option<String>,
    pub log_file: String,
}

impl Default for StorageLayout {
    fn default() -> Self {
        let config = RecoveryConfig::default();
        Self {
            fs_root: config.fs_root,
            primary_storage: config.primary_storage,
            internal_storage: config.internal_storage,
            no_confirm_marker: config.no_confirm_marker,
            backup_dir: config.backup_dir,
            data_media: false,
            ums_lunfile: config.ums_lunfile,
            ums_second_lunfile: config.ums_second_lunfile,
            log_file: config.log_file,
        }
    }
}

impl StorageLayout {
    pub fn host_path(&self, path: &str) -> PathBuf {
        host_path(&self.fs_root, path)
    }

    pub fn no_confirm_marker_path(&self) -> PathBuf {
        self.host_path(&self.primary_storage)
            .join(&self.no_confirm_marker)
    }

    /// Whether `path` is the primary storage root or lies beneath it
    pub fn is_primary_storage(&self, path: &str) -> bool {
        Path::new(path).starts_with(&self.primary_storage)
    }
}

fn host_path(fs_root: &Path, path: &str) -> PathBuf {
    fs_root.join(path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use recovery_types::Volume;

    struct Table(Vec<Volume>);

    impl VolumeCatalog for Table {
        fn all_volumes(&self) -> &[Volume] {
            &self.0
        }
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config: RecoveryConfig = toml::from_str(
            r#"
            fs_root = "/tmp/staged"
            ums_second_lunfile = "/sys/devices/platform/usb_mass_storage/lun1/file"

            [properties]
            "ro.cwm.forbid_format" = "/boot"
            "#,
        )
        .expect("parse config");

        assert_eq!(config.fs_root, PathBuf::from("/tmp/staged"));
        assert_eq!(config.primary_storage, "/sdcard");
        assert_eq!(config.backup_dir, "clockworkmod/backup");
        assert_eq!(
            config.properties.get("ro.cwm.forbid_format").map(String::as_str),
            Some("/boot")
        );
        assert!(config.ums_second_lunfile.is_some());
    }

    #[test]
    fn host_path_stays_under_root() {
        let config = RecoveryConfig {
            fs_root: PathBuf::from("/tmp/staged"),
            ..RecoveryConfig::default()
        };
        assert_eq!(
            config.host_path("/sdcard/update.zip"),
            PathBuf::from("/tmp/staged/sdcard/update.zip")
        );
        assert_eq!(RecoveryConfig::default().host_path("/cache"), PathBuf::from("/cache"));
    }

    #[test]
    fn data_media_detected_from_catalog() {
        let config = RecoveryConfig::default();

        let no_sdcard = Table(vec![Volume::new("/data", "ext4", "/dev/block/mmcblk0p10")]);
        assert!(config.layout(&no_sdcard).data_media);

        let virtual_sdcard = Table(vec![Volume::new("/sdcard", "datamedia", "/dev/null")]);
        assert!(config.layout(&virtual_sdcard).data_media);

        let real_sdcard = Table(vec![Volume::new("/sdcard", "vfat", "/dev/block/mmcblk1p1")]);
        assert!(!config.layout(&real_sdcard).data_media);

        let forced = RecoveryConfig {
            data_media: Some(false),
            ..RecoveryConfig::default()
        };
        assert!(!forced.layout(&no_sdcard).data_media);
    }

    #[test]
    fn marker_lives_on_primary_storage() {
        let layout = StorageLayout {
            fs_root: PathBuf::from("/tmp/staged"),
            ..StorageLayout::default()
        };
        assert_eq!(
            layout.no_confirm_marker_path(),
            PathBuf::from("/tmp/staged/sdcard/clockworkmod/.no_confirm")
        );
        assert!(layout.is_primary_storage("/sdcard/clockworkmod"));
        assert!(!layout.is_primary_storage("/sdcard2"));
    }
}
