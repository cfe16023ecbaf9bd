// SPDX-License-Identifier: GPL-3.0-only

//! Format request routing
//!
//! Every format request lands in [`FormatDispatcher::format_device`], which
//! decides between the RFS tool, a flash erase, an ext4 image build and the
//! generic path. Backend failures are logged here with their detail and
//! surface to callers as a [`RecoveryError`] kind only.

use std::path::Path;

use recovery_contracts::{
    BackendError, FormatBackends, FormatOutcome, MountControl, RecoveryError, VolumeCatalog,
};
use recovery_types::{FlashType, FormatRequest, FsType};

use super::strategy::{Dispatch, GenericStrategy, InPlace, dispatch_for, generic_strategy};
use super::wipe::wipe_contents;
use crate::config::StorageLayout;
use crate::safety::SafetyGate;

pub const SD_EXT: &str = "/sd-ext";

/// Entries kept when /data is wiped; they hold the emulated user storage
const DATA_PRESERVE: &[&str] = &["media"];

pub struct FormatDispatcher<'a> {
    catalog: &'a dyn VolumeCatalog,
    mounts: &'a dyn MountControl,
    backends: FormatBackends<'a>,
    gate: &'a SafetyGate,
    layout: &'a StorageLayout,
}

impl<'a> FormatDispatcher<'a> {
    pub fn new(
        catalog: &'a dyn VolumeCatalog,
        mounts: &'a dyn MountControl,
        backends: FormatBackends<'a>,
        gate: &'a SafetyGate,
        layout: &'a StorageLayout,
    ) -> Self {
        Self {
            catalog,
            mounts,
            backends,
            gate,
            layout,
        }
    }

    /// Format the volume at `mount_point` with its configured type
    pub fn format_volume(&self, mount_point: &str) -> FormatOutcome {
        let request = match self.catalog.volume_for_path(mount_point) {
            Some(volume) => FormatRequest::new(&volume.device, mount_point, &volume.fs_type),
            None => FormatRequest::new("", mount_point, ""),
        };
        self.format_device(&request)
    }

    pub fn format_device(&self, request: &FormatRequest) -> FormatOutcome {
        let path = request.mount_point.as_str();
        let fs_type = request.fs_type();

        let Some(dispatch) = dispatch_for(&fs_type) else {
            tracing::error!("Refusing to format {} as {}", path, fs_type);
            return Err(unsupported(path, &fs_type));
        };

        if !self.gate.is_safe_to_format(path) {
            tracing::warn!("{} is on the format deny-list", path);
            return Err(RecoveryError::UnsafeTarget(path.to_string()));
        }

        let Some(volume) = self.catalog.volume_for_path(path) else {
            if self.layout.data_media && self.layout.is_primary_storage(path) {
                return self.format_unknown_device(None, path, None);
            }
            if path == SD_EXT {
                tracing::info!("No {} volume, nothing to format", SD_EXT);
                return Ok(());
            }
            tracing::error!("Unknown volume \"{}\"", path);
            return Err(RecoveryError::UnknownVolume(path.to_string()));
        };

        if self.layout.data_media
            && Path::new(path).starts_with("/data")
            && self.catalog.volume_at(&self.layout.primary_storage).is_none()
        {
            return self.format_unknown_device(None, path, None);
        }

        match dispatch {
            Dispatch::Rfs => {
                self.unmount(path)?;
                tracing::info!("Formatting {} ({}) as rfs", path, request.device);
                self.backends
                    .rfs
                    .format_rfs(&request.device, path)
                    .map_err(|error| image_failure(&request.device, &fs_type, error))
            }
            Dispatch::InPlace(in_place) => {
                if volume.mount_point != path {
                    tracing::debug!(
                        "{} is below volume {}, using the generic path",
                        path,
                        volume.mount_point
                    );
                    return self.format_unknown_device(Some(&volume.device), path, None);
                }

                self.unmount(path)?;

                match in_place {
                    InPlace::FlashErase => self.erase_flash(&request.device),
                    InPlace::Ext4Image => {
                        let length = if volume.kind() == FsType::Ext4 {
                            volume.length
                        } else {
                            0
                        };
                        tracing::info!(
                            "Building ext4 on {} for {} (length {})",
                            request.device,
                            path,
                            length
                        );
                        self.backends.ext4.reset();
                        self.backends
                            .ext4
                            .build(&request.device, length)
                            .map_err(|error| image_failure(&request.device, &fs_type, error))
                    }
                    InPlace::Generic => {
                        self.format_unknown_device(Some(&request.device), path, Some(&fs_type))
                    }
                }
            }
        }
    }

    /// Format without a dedicated strategy: raw erase, mkfs, or wipe the
    /// mounted contents.
    pub fn format_unknown_device(
        &self,
        device: Option<&str>,
        path: &str,
        fs_type: Option<&FsType>,
    ) -> FormatOutcome {
        tracing::info!("Formatting unknown device {}", path);

        let strategy = generic_strategy(fs_type);
        if let GenericStrategy::RawErase(flash_type) = strategy {
            let device = device.ok_or_else(|| RecoveryError::UnknownVolume(path.to_string()))?;
            return self.erase_raw(flash_type, device);
        }

        if path == SD_EXT && !self.sd_ext_present() {
            tracing::info!("No sd-ext found. Skipping format of {}.", SD_EXT);
            return Ok(());
        }

        match strategy {
            GenericStrategy::Ext3 | GenericStrategy::Ext2 => {
                let device = device.ok_or_else(|| RecoveryError::UnknownVolume(path.to_string()))?;
                self.unmount(path)?;
                let (kind, result) = if strategy == GenericStrategy::Ext3 {
                    (FsType::Ext3, self.backends.ext.format_ext3(device))
                } else {
                    (FsType::Ext2, self.backends.ext.format_ext2(device))
                };
                result.map_err(|error| image_failure(device, &kind, error))
            }
            GenericStrategy::RawErase(_) | GenericStrategy::WipeContents => {
                self.wipe_mounted(path);
                Ok(())
            }
        }
    }

    fn wipe_mounted(&self, path: &str) {
        if let Err(error) = self.mounts.ensure_mounted(path) {
            // An unmountable target counts as already formatted
            tracing::warn!("Error mounting {}! Skipping format. ({})", path, error);
            return;
        }

        let preserve = if path == "/data" { DATA_PRESERVE } else { &[] };
        let target = self.layout.host_path(path);
        match wipe_contents(&target, preserve) {
            Ok(removed) => tracing::info!("Removed {} entries from {}", removed, path),
            Err(error) => tracing::warn!("Failed to wipe {}: {}", target.display(), error),
        }

        if let Err(error) = self.mounts.ensure_unmounted(path) {
            tracing::warn!("Error unmounting {} after wipe: {}", path, error);
        }
    }

    fn sd_ext_present(&self) -> bool {
        self.catalog
            .volume_at(SD_EXT)
            .is_some_and(|volume| self.layout.host_path(&volume.device).exists())
    }

    fn unmount(&self, path: &str) -> FormatOutcome {
        self.mounts.ensure_unmounted(path).map_err(|error| {
            tracing::error!("Error unmounting {}: {}", path, error);
            RecoveryError::UnmountFailure(path.to_string())
        })
    }

    fn erase_flash(&self, name: &str) -> FormatOutcome {
        let flash = self.backends.flash;

        let partition = flash
            .find_partition(name)
            .map_err(|error| flash_failure(name, "scan", error))?
            .ok_or_else(|| {
                tracing::error!("Can't find flash partition \"{}\"", name);
                RecoveryError::FlashIoFailure {
                    device: name.to_string(),
                    operation: "lookup",
                }
            })?;

        let mut writer = flash
            .open_writer(&partition)
            .map_err(|error| flash_failure(name, "open", error))?;

        if let Err(error) = writer.erase_all() {
            if let Err(close_error) = writer.close() {
                tracing::warn!("Closing \"{}\" after failed erase: {}", name, close_error);
            }
            return Err(flash_failure(name, "erase", error));
        }

        writer
            .close()
            .map_err(|error| flash_failure(name, "close", error))?;
        tracing::info!("Erased flash partition \"{}\"", name);
        Ok(())
    }

    fn erase_raw(&self, flash_type: FlashType, device: &str) -> FormatOutcome {
        tracing::info!("Erasing {} partition {}", flash_type.as_str(), device);
        self.backends
            .raw
            .erase_raw_partition(flash_type, device)
            .map_err(|error| flash_failure(device, "erase", error))
    }
}

fn unsupported(path: &str, fs_type: &FsType) -> RecoveryError {
    RecoveryError::UnsupportedFsType {
        mount_point: path.to_string(),
        fs_type: fs_type.to_string(),
    }
}

fn flash_failure(device: &str, operation: &'static str, error: BackendError) -> RecoveryError {
    tracing::error!("Flash {} failed on \"{}\": {}", operation, device, error);
    RecoveryError::FlashIoFailure {
        device: device.to_string(),
        operation,
    }
}

fn image_failure(device: &str, fs_type: &FsType, error: BackendError) -> RecoveryError {
    tracing::error!("Building {} on {} failed: {}", fs_type, device, error);
    RecoveryError::ImageBuildFailure {
        device: device.to_string(),
        fs_type: fs_type.to_string(),
    }
}
