// SPDX-License-Identifier: GPL-3.0-only

use std::fmt;

use serde::{Deserialize, Serialize};

/// Filesystem or flash backend named in the volume table.
///
/// The set is closed over every type the dispatcher knows how to handle;
/// anything else lands in `Other` and goes down the generic path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FsType {
    Ramdisk,
    Rfs,
    Yaffs2,
    Mtd,
    Emmc,
    Bml,
    Ext2,
    Ext3,
    Ext4,
    Vfat,
    DataMedia,
    Auto,
    Other(String),
}

impl FsType {
    pub fn parse(value: &str) -> Self {
        match value {
            "ramdisk" => Self::Ramdisk,
            "rfs" => Self::Rfs,
            "yaffs2" => Self::Yaffs2,
            "mtd" => Self::Mtd,
            "emmc" => Self::Emmc,
            "bml" => Self::Bml,
            "ext2" => Self::Ext2,
            "ext3" => Self::Ext3,
            "ext4" => Self::Ext4,
            "vfat" => Self::Vfat,
            "datamedia" => Self::DataMedia,
            "auto" => Self::Auto,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Ramdisk => "ramdisk",
            Self::Rfs => "rfs",
            Self::Yaffs2 => "yaffs2",
            Self::Mtd => "mtd",
            Self::Emmc => "emmc",
            Self::Bml => "bml",
            Self::Ext2 => "ext2",
            Self::Ext3 => "ext3",
            Self::Ext4 => "ext4",
            Self::Vfat => "vfat",
            Self::DataMedia => "datamedia",
            Self::Auto => "auto",
            Self::Other(other) => other,
        }
    }

    /// Raw flash and pseudo volumes that cannot be mounted as a filesystem.
    pub fn is_raw(&self) -> bool {
        matches!(self, Self::Ramdisk | Self::Mtd | Self::Emmc | Self::Bml)
    }
}

impl From<String> for FsType {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<&str> for FsType {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<FsType> for String {
    fn from(value: FsType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for FsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flash technology understood by the raw partition eraser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashType {
    Mtd,
    Mmc,
    Bml,
}

impl FlashType {
    pub fn from_fs_type(fs_type: &FsType) -> Option<Self> {
        match fs_type {
            FsType::Mtd => Some(Self::Mtd),
            FsType::Emmc => Some(Self::Mmc),
            FsType::Bml => Some(Self::Bml),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mtd => "mtd",
            Self::Mmc => "emmc",
            Self::Bml => "bml",
        }
    }
}
