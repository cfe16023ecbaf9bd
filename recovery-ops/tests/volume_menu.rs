// SPDX-License-Identifier: GPL-3.0-only

mod common;

use common::Rig;
use recovery_contracts::MountControl;
use recovery_ops::menu::partitions::show_partition_menu;
use recovery_ops::{MenuAction, VolumeMenuBuilder};
use recovery_testing::{
    BackendCall, FakeCatalog, FakeMounts, MountCall, RecordingBackends, ScriptedPrompt,
};
use recovery_types::ActionKind;

fn labels(actions: &[MenuAction<'_>]) -> Vec<String> {
    actions.iter().map(|action| action.label().to_string()).collect()
}

#[test]
fn toggles_then_formats_then_mass_storage() {
    let rig = Rig::new(FakeCatalog::mtd_device());
    let builder = VolumeMenuBuilder::new(&rig.catalog, &rig.gate, false);

    assert_eq!(
        labels(&builder.render(&rig.mounts)),
        vec![
            "mount /cache",
            "mount /data",
            "mount /sdcard",
            "mount /system",
            "format /boot",
            "format /cache",
            "format /data",
            "format /sdcard",
            "format /system",
            "mount USB storage",
        ]
    );
}

#[test]
fn labels_follow_live_mount_state() {
    let rig = Rig::new(FakeCatalog::mtd_device())
        .with_mounts(FakeMounts::new().with_mounted("/cache"));
    let builder = VolumeMenuBuilder::new(&rig.catalog, &rig.gate, false);

    let first = builder.render(&rig.mounts);
    assert_eq!(first[0].label(), "unmount /cache");
    assert_eq!(first[1].label(), "mount /data");

    rig.mounts.ensure_mounted("/data").expect("mount /data");
    rig.mounts.ensure_unmounted("/cache").expect("unmount /cache");

    let second = builder.render(&rig.mounts);
    assert_eq!(second[0].label(), "mount /cache");
    assert_eq!(second[1].label(), "unmount /data");
}

#[test]
fn actions_carry_their_target() {
    let rig = Rig::new(FakeCatalog::mtd_device());
    let builder = VolumeMenuBuilder::new(&rig.catalog, &rig.gate, false);

    let actions = builder.render(&rig.mounts);
    let MenuAction::Volume(format_boot) = &actions[4] else {
        panic!("expected a volume action");
    };
    assert_eq!(format_boot.kind, ActionKind::Format);
    assert_eq!(format_boot.volume.mount_point, "/boot");
}

#[test]
fn deny_listed_and_raw_volumes_are_not_formattable() {
    let rig = Rig::new(FakeCatalog::data_media_device());
    let builder = VolumeMenuBuilder::new(&rig.catalog, &rig.gate, true);

    let labels = labels(&builder.render(&rig.mounts));
    assert!(!labels.iter().any(|label| label.ends_with("/boot")));
    assert!(!labels.contains(&"mount USB storage".to_string()));

    let misc = Rig::new(FakeCatalog::mtd_device());
    let builder = VolumeMenuBuilder::new(&misc.catalog, &misc.gate, false);
    let labels = self::labels(&builder.render(&misc.mounts));
    assert!(!labels.contains(&"format /misc".to_string()));
    assert!(!labels.contains(&"format /recovery".to_string()));
}

#[test]
fn mount_entry_mounts_and_rerenders() {
    let rig = Rig::new(FakeCatalog::mtd_device());
    let dispatcher = rig.dispatcher();
    let ctx = rig.context(&dispatcher);

    let mut prompt = ScriptedPrompt::new([Some(0), None]);
    show_partition_menu(&ctx, &mut prompt);

    assert_eq!(rig.mounts.calls(), vec![MountCall::Mount("/cache".to_string())]);
    assert_eq!(prompt.menus.len(), 2);
    assert_eq!(prompt.menus[1].items[0], "unmount /cache");
}

#[test]
fn format_entry_confirms_then_formats() {
    let rig = Rig::new(FakeCatalog::mtd_device())
        .with_backends(RecordingBackends::new().with_partition("cache"));
    let dispatcher = rig.dispatcher();
    let ctx = rig.context(&dispatcher);

    let mut prompt = ScriptedPrompt::new([Some(5), Some(1), None]);
    show_partition_menu(&ctx, &mut prompt);

    assert_eq!(prompt.menus[1].headers[0], "/cache - Confirm format?");
    assert_eq!(prompt.menus[1].items[1], "Yes - Format");
    assert!(rig
        .backends
        .calls()
        .contains(&BackendCall::EraseAll("cache".to_string())));
    assert!(prompt.printed_line("Done."));
}

#[test]
fn declined_format_touches_nothing() {
    let rig = Rig::new(FakeCatalog::mtd_device())
        .with_backends(RecordingBackends::new().with_partition("cache"));
    let dispatcher = rig.dispatcher();
    let ctx = rig.context(&dispatcher);

    let mut prompt = ScriptedPrompt::new([Some(5), Some(0), None]);
    show_partition_menu(&ctx, &mut prompt);

    assert!(rig.backends.calls().is_empty());
    assert!(rig.mounts.calls().is_empty());
}

#[test]
fn format_failure_is_reported_and_loop_continues() {
    let rig = Rig::new(FakeCatalog::mtd_device());
    rig.bypass_confirmations();
    let dispatcher = rig.dispatcher();
    let ctx = rig.context(&dispatcher);

    let mut prompt = ScriptedPrompt::new([Some(5), None]);
    show_partition_menu(&ctx, &mut prompt);

    assert!(prompt.printed_line("Error formatting /cache!"));
    assert_eq!(prompt.menus.len(), 2);
}
