// SPDX-License-Identifier: GPL-3.0-only

mod common;

use common::Rig;
use recovery_contracts::{ErrorKind, RecoveryError};
use recovery_testing::{BackendCall, FakeCatalog, FakeMounts, MountCall, RecordingBackends};
use recovery_types::{FlashType, FormatRequest, Volume};

#[test]
fn ramdisk_is_refused_before_any_backend_call() {
    let rigs = [
        Rig::new(FakeCatalog::mtd_device().with_volume(Volume::new("/", "ramdisk", "ramdisk"))),
        Rig::new(FakeCatalog::data_media_device()).with_data_media(),
    ];

    for rig in &rigs {
        for path in ["/", "/cache", "/data", "/sd-ext", "/sdcard", "/misc", "/nowhere"] {
            let request = FormatRequest::new("/dev/block/ram0", path, "ramdisk");
            let outcome = rig.dispatcher().format_device(&request);

            assert_eq!(
                outcome.map_err(|error| error.kind()),
                Err(ErrorKind::UnsupportedFsType),
                "{path}"
            );
        }
        assert!(rig.backends.calls().is_empty());
        assert!(rig.mounts.calls().is_empty());
    }
}

#[test]
fn deny_listed_volume_is_unsafe() {
    let rig = Rig::new(FakeCatalog::mtd_device());

    let outcome = rig.dispatcher().format_volume("/misc");

    assert_eq!(outcome, Err(RecoveryError::UnsafeTarget("/misc".to_string())));
    assert!(rig.backends.calls().is_empty());
    assert!(rig.mounts.calls().is_empty());
}

#[test]
fn unknown_volume_is_reported() {
    let rig = Rig::new(FakeCatalog::mtd_device());

    let outcome = rig
        .dispatcher()
        .format_device(&FormatRequest::new("/dev/block/sda1", "/usb", "vfat"));

    assert_eq!(outcome, Err(RecoveryError::UnknownVolume("/usb".to_string())));
    assert_eq!(outcome.map_err(|error| error.code()), Err(10));
}

#[test]
fn root_volume_does_not_claim_unknown_paths() {
    let catalog = FakeCatalog::mtd_device().with_volume(Volume::new("/", "ramdisk", "ramdisk"));
    let rig = Rig::new(catalog);
    rig.root.write("usb/keep.txt", b"keep");

    let outcome = rig
        .dispatcher()
        .format_device(&FormatRequest::new("/dev/block/sda1", "/usb", "vfat"));

    assert_eq!(outcome, Err(RecoveryError::UnknownVolume("/usb".to_string())));
    assert!(rig.root.path().join("usb/keep.txt").exists());
    assert!(rig.mounts.calls().is_empty());
    assert!(rig.backends.calls().is_empty());
}

#[test]
fn missing_sd_ext_volume_is_a_no_op() {
    let rig = Rig::new(FakeCatalog::mtd_device());

    assert_eq!(rig.dispatcher().format_volume("/sd-ext"), Ok(()));
    assert!(rig.backends.calls().is_empty());
    assert!(rig.mounts.calls().is_empty());
}

#[test]
fn yaffs2_cache_erases_named_partition() {
    let rig = Rig::new(FakeCatalog::mtd_device())
        .with_backends(RecordingBackends::new().with_partition("boot").with_partition("cache"));

    assert_eq!(rig.dispatcher().format_volume("/cache"), Ok(()));
    assert_eq!(rig.mounts.calls(), vec![MountCall::Unmount("/cache".to_string())]);
    assert_eq!(
        rig.backends.calls(),
        vec![
            BackendCall::Scan,
            BackendCall::OpenWriter("cache".to_string()),
            BackendCall::EraseAll("cache".to_string()),
            BackendCall::Close("cache".to_string()),
        ]
    );
}

#[test]
fn yaffs2_cache_without_partition_is_flash_failure() {
    let rig = Rig::new(FakeCatalog::mtd_device())
        .with_backends(RecordingBackends::new().with_partition("boot"));

    let outcome = rig.dispatcher().format_volume("/cache");

    assert_eq!(
        outcome,
        Err(RecoveryError::FlashIoFailure {
            device: "cache".to_string(),
            operation: "lookup",
        })
    );
    assert_eq!(rig.backends.calls(), vec![BackendCall::Scan]);
}

#[test]
fn failed_erase_still_closes_partition() {
    let rig = Rig::new(FakeCatalog::mtd_device()).with_backends(
        RecordingBackends::new()
            .with_partition("cache")
            .failing("erase"),
    );

    let outcome = rig.dispatcher().format_volume("/cache");

    assert_eq!(outcome.map_err(|error| error.kind()), Err(ErrorKind::FlashIoFailure));
    assert_eq!(
        rig.backends.calls().last(),
        Some(&BackendCall::Close("cache".to_string()))
    );
}

#[test]
fn unmount_failure_aborts_before_erase() {
    let rig = Rig::new(FakeCatalog::mtd_device())
        .with_backends(RecordingBackends::new().with_partition("cache"))
        .with_mounts(FakeMounts::new().with_mounted("/cache").refusing_unmount("/cache"));

    let outcome = rig.dispatcher().format_volume("/cache");

    assert_eq!(outcome, Err(RecoveryError::UnmountFailure("/cache".to_string())));
    assert!(rig.backends.calls().is_empty());
}

#[test]
fn ext4_volume_reuses_configured_length() {
    let rig = Rig::new(FakeCatalog::data_media_device());

    assert_eq!(rig.dispatcher().format_volume("/data"), Ok(()));
    assert_eq!(
        rig.backends.calls(),
        vec![
            BackendCall::Ext4Reset,
            BackendCall::Ext4Build {
                device: "/dev/block/mmcblk0p10".to_string(),
                length: -16384,
            },
        ]
    );
}

#[test]
fn ext4_conversion_ignores_length_of_other_type() {
    let catalog = FakeCatalog::new(vec![
        Volume::new("/data", "ext3", "/dev/block/mmcblk0p10").with_length(4096),
    ]);
    let rig = Rig::new(catalog);

    let request = FormatRequest::new("/dev/block/mmcblk0p10", "/data", "ext4");
    assert_eq!(rig.dispatcher().format_device(&request), Ok(()));
    assert_eq!(
        rig.backends.calls(),
        vec![
            BackendCall::Ext4Reset,
            BackendCall::Ext4Build {
                device: "/dev/block/mmcblk0p10".to_string(),
                length: 0,
            },
        ]
    );
}

#[test]
fn ext3_request_on_ext4_volume_uses_ext3_formatter() {
    let rig = Rig::new(FakeCatalog::data_media_device());

    let request = FormatRequest::new("/dev/block/mmcblk0p9", "/system", "ext3");
    assert_eq!(rig.dispatcher().format_device(&request), Ok(()));
    assert_eq!(
        rig.backends.calls(),
        vec![BackendCall::Ext3("/dev/block/mmcblk0p9".to_string())]
    );
}

#[test]
fn ext4_build_failure_is_image_failure() {
    let rig = Rig::new(FakeCatalog::data_media_device())
        .with_backends(RecordingBackends::new().failing("ext4"));

    assert_eq!(
        rig.dispatcher().format_volume("/cache"),
        Err(RecoveryError::ImageBuildFailure {
            device: "/dev/block/mmcblk0p8".to_string(),
            fs_type: "ext4".to_string(),
        })
    );
}

#[test]
fn rfs_volume_unmounts_then_formats() {
    let catalog = FakeCatalog::new(vec![Volume::new("/dbdata", "rfs", "/dev/block/stl10")]);
    let rig = Rig::new(catalog);

    assert_eq!(rig.dispatcher().format_volume("/dbdata"), Ok(()));
    assert_eq!(rig.mounts.calls(), vec![MountCall::Unmount("/dbdata".to_string())]);
    assert_eq!(
        rig.backends.calls(),
        vec![BackendCall::Rfs {
            device: "/dev/block/stl10".to_string(),
            mount_point: "/dbdata".to_string(),
        }]
    );
}

#[test]
fn emmc_volume_takes_raw_erase() {
    let rig = Rig::new(FakeCatalog::data_media_device());

    assert_eq!(rig.dispatcher().format_volume("/boot"), Ok(()));
    assert_eq!(
        rig.backends.calls(),
        vec![BackendCall::RawErase(
            FlashType::Mmc,
            "/dev/block/mmcblk0p7".to_string()
        )]
    );
}

#[test]
fn sub_mount_wipes_only_that_directory() {
    let rig = Rig::new(FakeCatalog::data_media_device());
    rig.root.write("data/app/com.example.apk", b"apk");
    rig.root.write("data/system/packages.xml", b"xml");

    let request = FormatRequest::new("/dev/block/mmcblk0p10", "/data/app", "ext4");
    assert_eq!(rig.dispatcher().format_device(&request), Ok(()));

    assert!(!rig.root.path().join("data/app/com.example.apk").exists());
    assert!(rig.root.path().join("data/app").exists());
    assert!(rig.root.path().join("data/system/packages.xml").exists());
    assert!(rig.backends.calls().is_empty());
    assert_eq!(
        rig.mounts.calls(),
        vec![
            MountCall::Mount("/data/app".to_string()),
            MountCall::Unmount("/data/app".to_string()),
        ]
    );
}

#[test]
fn data_media_wipe_keeps_media() {
    let rig = Rig::new(FakeCatalog::data_media_device()).with_data_media();
    rig.root.write("data/media/0/DCIM/photo.jpg", b"jpg");
    rig.root.write("data/app/com.example.apk", b"apk");
    rig.root.write("data/.layout_version", b"3");

    assert_eq!(rig.dispatcher().format_volume("/data"), Ok(()));

    assert!(rig.root.path().join("data/media/0/DCIM/photo.jpg").exists());
    assert!(!rig.root.path().join("data/app").exists());
    assert!(!rig.root.path().join("data/.layout_version").exists());
    assert!(rig.backends.calls().is_empty());
}

#[test]
fn data_media_storage_path_wipes_through_generic_path() {
    let rig = Rig::new(FakeCatalog::data_media_device()).with_data_media();
    rig.root.write("sdcard/Download/file.bin", b"bin");

    assert_eq!(rig.dispatcher().format_volume("/sdcard"), Ok(()));
    assert!(!rig.root.path().join("sdcard/Download").exists());
    assert!(rig.backends.calls().is_empty());
}

// An unmountable target counts as formatted and nothing is touched
#[test]
fn generic_path_mount_failure_reports_success() {
    let rig = Rig::new(FakeCatalog::data_media_device())
        .with_data_media()
        .with_mounts(FakeMounts::new().refusing_mount("/data"));
    rig.root.write("data/app/com.example.apk", b"apk");

    assert_eq!(rig.dispatcher().format_volume("/data"), Ok(()));
    assert!(rig.root.path().join("data/app/com.example.apk").exists());
    assert_eq!(rig.mounts.calls(), vec![MountCall::Mount("/data".to_string())]);
}

#[test]
fn sd_ext_without_device_is_skipped() {
    let catalog =
        FakeCatalog::mtd_device().with_volume(Volume::new("/sd-ext", "ext3", "/dev/block/mmcblk0p2"));
    let rig = Rig::new(catalog);

    assert_eq!(rig.dispatcher().format_volume("/sd-ext"), Ok(()));
    assert!(rig.backends.calls().is_empty());
}

#[test]
fn sd_ext_with_device_is_formatted() {
    let catalog =
        FakeCatalog::mtd_device().with_volume(Volume::new("/sd-ext", "ext3", "/dev/block/mmcblk0p2"));
    let rig = Rig::new(catalog);
    rig.root.touch("dev/block/mmcblk0p2");

    assert_eq!(rig.dispatcher().format_volume("/sd-ext"), Ok(()));
    assert_eq!(
        rig.backends.calls(),
        vec![BackendCall::Ext3("/dev/block/mmcblk0p2".to_string())]
    );
}
