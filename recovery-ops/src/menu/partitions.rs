// SPDX-License-Identifier: GPL-3.0-only

//! Mounts and storage menu

use recovery_contracts::{MountControl, Prompt, VolumeCatalog};
use recovery_types::{ActionKind, FsType, Volume, VolumeAction};

use super::MenuContext;
use super::ums::show_mount_usb_storage_menu;
use crate::safety::SafetyGate;

const HEADERS: [&str; 2] = ["Mounts and Storage Menu", ""];

/// One entry of the mounts and storage menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction<'a> {
    Volume(VolumeAction<'a>),
    MassStorage,
}

impl MenuAction<'_> {
    pub fn label(&self) -> &str {
        match self {
            Self::Volume(action) => &action.current_label,
            Self::MassStorage => "mount USB storage",
        }
    }
}

/// Splits the catalog into mount toggles and format targets once; labels
/// are rebuilt from the live mount table on every render.
#[derive(Debug, Clone)]
pub struct VolumeMenuBuilder<'a> {
    mountable: Vec<&'a Volume>,
    formattable: Vec<&'a Volume>,
    offer_mass_storage: bool,
}

impl<'a> VolumeMenuBuilder<'a> {
    pub fn new(catalog: &'a dyn VolumeCatalog, gate: &SafetyGate, data_media: bool) -> Self {
        let mut mountable = Vec::new();
        let mut formattable = Vec::new();

        for volume in catalog.all_volumes() {
            let safe = gate.is_safe_to_format(&volume.mount_point);
            if volume.is_mountable() {
                mountable.push(volume);
                if safe {
                    formattable.push(volume);
                }
            } else if volume.kind() == FsType::Mtd && safe {
                formattable.push(volume);
            }
        }

        Self {
            mountable,
            formattable,
            offer_mass_storage: !data_media,
        }
    }

    pub fn render(&self, mounts: &dyn MountControl) -> Vec<MenuAction<'a>> {
        let toggles = self.mountable.iter().map(|&volume| {
            let kind = if mounts.is_mounted(&volume.mount_point) {
                ActionKind::Unmount
            } else {
                ActionKind::Mount
            };
            MenuAction::Volume(VolumeAction::new(volume, kind))
        });
        let formats = self
            .formattable
            .iter()
            .map(|&volume| MenuAction::Volume(VolumeAction::new(volume, ActionKind::Format)));

        let mut actions: Vec<MenuAction<'a>> = toggles.chain(formats).collect();
        if self.offer_mass_storage {
            actions.push(MenuAction::MassStorage);
        }
        actions
    }
}

pub fn show_partition_menu(ctx: &MenuContext<'_>, prompt: &mut dyn Prompt) {
    let builder = VolumeMenuBuilder::new(ctx.catalog, ctx.gate, ctx.layout.data_media);

    loop {
        let actions = builder.render(ctx.mounts);
        let items: Vec<String> = actions.iter().map(|action| action.label().to_string()).collect();

        let Some(chosen) = prompt.select(&HEADERS, &items) else {
            return;
        };
        match actions.get(chosen) {
            Some(MenuAction::MassStorage) => show_mount_usb_storage_menu(ctx, prompt),
            Some(MenuAction::Volume(action)) => run_volume_action(ctx, prompt, action),
            None => tracing::warn!("Selection {} out of range", chosen),
        }
    }
}

fn run_volume_action(ctx: &MenuContext<'_>, prompt: &mut dyn Prompt, action: &VolumeAction<'_>) {
    let mount_point = action.volume.mount_point.as_str();

    match action.kind {
        ActionKind::Mount => {
            if let Err(error) = ctx.mounts.ensure_mounted(mount_point) {
                tracing::warn!("Mounting {} failed: {}", mount_point, error);
                prompt.print(&format!("Error mounting {}!", mount_point));
            }
        }
        ActionKind::Unmount => {
            if let Err(error) = ctx.mounts.ensure_unmounted(mount_point) {
                tracing::warn!("Unmounting {} failed: {}", mount_point, error);
                prompt.print(&format!("Error unmounting {}!", mount_point));
            }
        }
        ActionKind::Format => {
            let title = format!("{} - Confirm format?", mount_point);
            if !ctx.gate.confirm_selection(prompt, &title, "Yes - Format") {
                return;
            }
            prompt.print(&format!("Formatting {}...", mount_point));
            match ctx.dispatcher.format_volume(mount_point) {
                Ok(()) => prompt.print("Done."),
                Err(error) => {
                    prompt.print(&format!("Error formatting {}! ({})", mount_point, error.code()));
                }
            }
        }
    }
}
