// SPDX-License-Identifier: GPL-3.0-only

//! Filesystem type to format backend routing

use recovery_types::{FlashType, FsType};

/// How a known volume is formatted when it is asked for by type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Reformat through the RFS tool; valid for sub-mounts too
    Rfs,
    /// Unmount, then run the in-place strategy on the canonical mount point
    InPlace(InPlace),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InPlace {
    /// Erase the named flash partition
    FlashErase,
    /// Build a fresh ext4 image
    Ext4Image,
    /// Hand over to the generic path with the concrete type
    Generic,
}

/// Routing for a requested type; `None` for types that are never formattable
pub fn dispatch_for(fs_type: &FsType) -> Option<Dispatch> {
    match fs_type {
        FsType::Ramdisk => None,
        FsType::Rfs => Some(Dispatch::Rfs),
        FsType::Yaffs2 | FsType::Mtd => Some(Dispatch::InPlace(InPlace::FlashErase)),
        FsType::Ext4 => Some(Dispatch::InPlace(InPlace::Ext4Image)),
        FsType::Emmc
        | FsType::Bml
        | FsType::Ext2
        | FsType::Ext3
        | FsType::Vfat
        | FsType::DataMedia
        | FsType::Auto
        | FsType::Other(_) => Some(Dispatch::InPlace(InPlace::Generic)),
    }
}

/// What the generic path does for a type, before the sd-ext probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenericStrategy {
    RawErase(FlashType),
    Ext3,
    Ext2,
    WipeContents,
}

pub fn generic_strategy(fs_type: Option<&FsType>) -> GenericStrategy {
    match fs_type {
        Some(fs_type) => match FlashType::from_fs_type(fs_type) {
            Some(flash_type) => GenericStrategy::RawErase(flash_type),
            None => match fs_type {
                FsType::Ext3 => GenericStrategy::Ext3,
                FsType::Ext2 => GenericStrategy::Ext2,
                _ => GenericStrategy::WipeContents,
            },
        },
        None => GenericStrategy::WipeContents,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramdisk_is_never_formattable() {
        assert_eq!(dispatch_for(&FsType::Ramdisk), None);
    }

    #[test]
    fn flash_types_erase_in_place() {
        for fs_type in [FsType::Yaffs2, FsType::Mtd] {
            assert_eq!(
                dispatch_for(&fs_type),
                Some(Dispatch::InPlace(InPlace::FlashErase))
            );
        }
        assert_eq!(
            dispatch_for(&FsType::Ext4),
            Some(Dispatch::InPlace(InPlace::Ext4Image))
        );
        assert_eq!(dispatch_for(&FsType::Rfs), Some(Dispatch::Rfs));
        assert_eq!(
            dispatch_for(&FsType::parse("f2fs")),
            Some(Dispatch::InPlace(InPlace::Generic))
        );
    }

    #[test]
    fn generic_path_routing() {
        assert_eq!(
            generic_strategy(Some(&FsType::Emmc)),
            GenericStrategy::RawErase(FlashType::Mmc)
        );
        assert_eq!(
            generic_strategy(Some(&FsType::Bml)),
            GenericStrategy::RawErase(FlashType::Bml)
        );
        assert_eq!(generic_strategy(Some(&FsType::Ext3)), GenericStrategy::Ext3);
        assert_eq!(generic_strategy(Some(&FsType::Ext2)), GenericStrategy::Ext2);
        assert_eq!(
            generic_strategy(Some(&FsType::Vfat)),
            GenericStrategy::WipeContents
        );
        assert_eq!(generic_strategy(None), GenericStrategy::WipeContents);
    }
}
