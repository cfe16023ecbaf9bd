// SPDX-License-Identifier: GPL-3.0-only

use serde::{Deserialize, Serialize};

use crate::fs_type::FsType;

/// One entry of the recovery volume table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volume {
    /// Canonical mount point (e.g., "/cache")
    pub mount_point: String,

    /// Primary device node, or a flash partition name for raw backends
    pub device: String,

    /// Alternate device node tried when the primary one is missing
    pub device2: Option<String>,

    /// Configured filesystem type
    pub fs_type: String,

    /// Alternate filesystem type tried when mounting
    pub fs_type2: Option<String>,

    /// Byte length hint for image builders; 0 means unspecified
    pub length: i64,
}

impl Volume {
    pub fn new(
        mount_point: impl Into<String>,
        fs_type: impl Into<String>,
        device: impl Into<String>,
    ) -> Self {
        Self {
            mount_point: mount_point.into(),
            device: device.into(),
            device2: None,
            fs_type: fs_type.into(),
            fs_type2: None,
            length: 0,
        }
    }

    pub fn with_device2(mut self, device2: impl Into<String>) -> Self {
        self.device2 = Some(device2.into());
        self
    }

    pub fn with_fs_type2(mut self, fs_type2: impl Into<String>) -> Self {
        self.fs_type2 = Some(fs_type2.into());
        self
    }

    pub fn with_length(mut self, length: i64) -> Self {
        self.length = length;
        self
    }

    pub fn kind(&self) -> FsType {
        FsType::parse(&self.fs_type)
    }

    /// Whether this volume can be mounted and browsed as a filesystem
    pub fn is_mountable(&self) -> bool {
        !self.kind().is_raw()
    }

    /// Whether `path` is this volume's mount point or lies beneath it.
    ///
    /// Matching is by path component: `/data` covers `/data/media` but not
    /// `/datadata`. A `/` volume covers only `/` itself.
    pub fn covers(&self, path: &str) -> bool {
        match path.strip_prefix(self.mount_point.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}

/// A single format request, built per operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatRequest {
    pub device: String,
    pub mount_point: String,
    pub requested_fs_type: String,
}

impl FormatRequest {
    pub fn new(
        device: impl Into<String>,
        mount_point: impl Into<String>,
        requested_fs_type: impl Into<String>,
    ) -> Self {
        Self {
            device: device.into(),
            mount_point: mount_point.into(),
            requested_fs_type: requested_fs_type.into(),
        }
    }

    /// Request that formats `volume` with its configured type
    pub fn for_volume(volume: &Volume) -> Self {
        Self::new(&volume.device, &volume.mount_point, &volume.fs_type)
    }

    pub fn fs_type(&self) -> FsType {
        FsType::parse(&self.requested_fs_type)
    }
}
