// SPDX-License-Identifier: GPL-3.0-only

//! Advanced maintenance actions

use std::fs;
use std::io;

use recovery_contracts::Prompt;

use super::MenuContext;
use crate::format::SD_EXT;
use crate::fstab::create_fstab;

const HEADERS: [&str; 2] = ["Advanced Menu", ""];

const BATTERY_STATS: &str = "/data/system/batterystats.bin";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MaintenanceItem {
    WipeDalvikCache,
    WipeBatteryStats,
    CopyLog,
    RegenerateFstab,
}

impl MaintenanceItem {
    const ALL: [MaintenanceItem; 4] = [
        Self::WipeDalvikCache,
        Self::WipeBatteryStats,
        Self::CopyLog,
        Self::RegenerateFstab,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::WipeDalvikCache => "Wipe Dalvik Cache",
            Self::WipeBatteryStats => "Wipe Battery Stats",
            Self::CopyLog => "Report Error",
            Self::RegenerateFstab => "Regenerate fstab",
        }
    }
}

pub fn show_advanced_menu(ctx: &MenuContext<'_>, prompt: &mut dyn Prompt) {
    let labels: Vec<String> = MaintenanceItem::ALL
        .iter()
        .map(|item| item.label().to_string())
        .collect();

    loop {
        let Some(chosen) = prompt.select(&HEADERS, &labels) else {
            return;
        };
        match MaintenanceItem::ALL.get(chosen) {
            Some(MaintenanceItem::WipeDalvikCache) => {
                wipe_dalvik_cache(ctx, prompt);
            }
            Some(MaintenanceItem::WipeBatteryStats) => {
                wipe_battery_stats(ctx, prompt);
            }
            Some(MaintenanceItem::CopyLog) => {
                copy_log(ctx, prompt);
            }
            Some(MaintenanceItem::RegenerateFstab) => {
                match create_fstab(ctx.layout, ctx.catalog, ctx.flash) {
                    Ok(written) => prompt.print(&format!("Wrote {} fstab entries.", written)),
                    Err(error) => {
                        tracing::error!("Writing fstab failed: {}", error);
                        prompt.print("Unable to create /etc/fstab!");
                    }
                }
            }
            None => tracing::warn!("Selection {} out of range", chosen),
        }
    }
}

/// Remove the dalvik-cache directories from /data, /cache and /sd-ext
pub fn wipe_dalvik_cache(ctx: &MenuContext<'_>, prompt: &mut dyn Prompt) -> bool {
    if let Err(error) = ctx.mounts.ensure_mounted("/data") {
        tracing::warn!("Can't mount /data: {}", error);
        prompt.print("Can't mount /data!");
        return false;
    }
    for optional in [SD_EXT, "/cache"] {
        if let Err(error) = ctx.mounts.ensure_mounted(optional) {
            tracing::debug!("Skipping {}: {}", optional, error);
        }
    }

    if ctx
        .gate
        .confirm_selection(prompt, "Confirm wipe?", "Yes - Wipe Dalvik Cache")
    {
        for root in ["/data", "/cache", SD_EXT] {
            let cache = ctx.layout.host_path(root).join("dalvik-cache");
            if let Err(error) = remove_tree(&cache) {
                tracing::warn!("Removing {} failed: {}", cache.display(), error);
            }
        }
        prompt.print("Dalvik Cache wiped.");
    }

    if let Err(error) = ctx.mounts.ensure_unmounted("/data") {
        tracing::warn!("Can't unmount /data: {}", error);
    }
    true
}

pub fn wipe_battery_stats(ctx: &MenuContext<'_>, prompt: &mut dyn Prompt) -> bool {
    if !ctx
        .gate
        .confirm_selection(prompt, "Confirm wipe?", "Yes - Wipe Battery Stats")
    {
        return false;
    }
    if !ctx.mount_or_report(prompt, "/data") {
        return false;
    }

    let stats = ctx.layout.host_path(BATTERY_STATS);
    let removed = match fs::remove_file(&stats) {
        Ok(()) => true,
        Err(error) if error.kind() == io::ErrorKind::NotFound => true,
        Err(error) => {
            tracing::warn!("Removing {} failed: {}", stats.display(), error);
            false
        }
    };
    if removed {
        prompt.print("Battery Stats wiped.");
    }

    if let Err(error) = ctx.mounts.ensure_unmounted("/data") {
        tracing::warn!("Can't unmount /data: {}", error);
    }
    removed
}

/// Copy the session log to `<primary>/clockworkmod/recovery.log`
pub fn copy_log(ctx: &MenuContext<'_>, prompt: &mut dyn Prompt) -> bool {
    if !ctx.mount_or_report(prompt, &ctx.layout.primary_storage) {
        return false;
    }

    let source = ctx.layout.host_path(&ctx.layout.log_file);
    let target_dir = ctx
        .layout
        .host_path(&ctx.layout.primary_storage)
        .join("clockworkmod");
    let target = target_dir.join("recovery.log");

    let copied = fs::create_dir_all(&target_dir).and_then(|()| fs::copy(&source, &target));
    match copied {
        Ok(bytes) => {
            tracing::info!("Copied {} bytes of log to {}", bytes, target.display());
            prompt.print(&format!("{} may now have the log.", ctx.layout.primary_storage));
            true
        }
        Err(error) => {
            tracing::error!("Copying {} failed: {}", source.display(), error);
            prompt.print("Unable to copy the recovery log.");
            false
        }
    }
}

fn remove_tree(path: &std::path::Path) -> io::Result<()> {
    match fs::remove_dir_all(path) {
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
