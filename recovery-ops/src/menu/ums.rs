// SPDX-License-Identifier: GPL-3.0-only

//! USB mass storage session
//!
//! Sharing a volume means writing its block device path into the gadget's
//! LUN file; writing a single NUL byte detaches it again.

use std::fs::OpenOptions;
use std::io::{self, Write};

use recovery_contracts::Prompt;
use recovery_types::Volume;

use super::MenuContext;

const HEADERS: [&str; 4] = [
    "USB Mass Storage device",
    "Leaving this menu unmounts",
    "your SD card from your PC.",
    "",
];

pub fn show_mount_usb_storage_menu(ctx: &MenuContext<'_>, prompt: &mut dyn Prompt) {
    if ctx.layout.data_media {
        prompt.print("USB storage is emulated on /data; nothing to share.");
        return;
    }

    let mut shared: Vec<&str> = Vec::new();
    match ctx.layout.ums_second_lunfile.as_deref() {
        None => {
            let Some(volume) = choose_volume(ctx, prompt) else {
                return;
            };
            if share(ctx, prompt, &ctx.layout.ums_lunfile, volume) {
                shared.push(&ctx.layout.ums_lunfile);
            }
        }
        Some(second_lunfile) => {
            let luns = [
                (ctx.layout.ums_lunfile.as_str(), ctx.layout.primary_storage.as_str()),
                (second_lunfile, ctx.layout.internal_storage.as_str()),
            ];
            for (lunfile, mount_point) in luns {
                match ctx.catalog.volume_at(mount_point) {
                    Some(volume) => {
                        if share(ctx, prompt, lunfile, volume) {
                            shared.push(lunfile);
                        }
                    }
                    None => tracing::info!("No {} volume to share", mount_point),
                }
            }
        }
    }

    if shared.is_empty() {
        prompt.print("No storage was shared.");
        return;
    }

    let items = ["Unmount".to_string()];
    while let Some(chosen) = prompt.select(&HEADERS, &items) {
        if chosen == 0 {
            break;
        }
    }

    for lunfile in shared {
        if let Err(error) = write_lun(ctx, lunfile, "\0") {
            tracing::error!("Detaching {} failed: {}", lunfile, error);
            prompt.print(&format!("Unable to write to ums lunfile {}", lunfile));
        }
    }
}

/// Pick the volume to share when only one LUN is available
fn choose_volume<'c>(ctx: &MenuContext<'c>, prompt: &mut dyn Prompt) -> Option<&'c Volume> {
    let primary = ctx.layout.primary_storage.as_str();
    let internal = ctx.layout.internal_storage.as_str();

    let mount_point = if ctx.catalog.volume_at(internal).is_some() {
        let items = [format!("Share {}", primary), format!("Share {}", internal)];
        match prompt.select(&["Select storage to share", ""], &items)? {
            0 => primary,
            _ => internal,
        }
    } else {
        primary
    };

    let volume = ctx.catalog.volume_at(mount_point);
    if volume.is_none() {
        prompt.print(&format!("No {} volume to share", mount_point));
    }
    volume
}

fn share(ctx: &MenuContext<'_>, prompt: &mut dyn Prompt, lunfile: &str, volume: &Volume) -> bool {
    let mut attempt = write_lun(ctx, lunfile, &volume.device);
    if attempt.is_err()
        && let Some(device2) = volume.device2.as_deref()
    {
        tracing::debug!("Sharing {} failed, trying {}", volume.device, device2);
        attempt = write_lun(ctx, lunfile, device2);
    }

    match attempt {
        Ok(()) => {
            tracing::info!("Sharing {} through {}", volume.mount_point, lunfile);
            true
        }
        Err(error) => {
            tracing::error!("Writing {} failed: {}", lunfile, error);
            prompt.print(&format!("Unable to write to ums lunfile {}", lunfile));
            false
        }
    }
}

fn write_lun(ctx: &MenuContext<'_>, lunfile: &str, value: &str) -> io::Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(ctx.layout.host_path(lunfile))?;
    file.write_all(value.as_bytes())
}
