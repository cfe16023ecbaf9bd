// SPDX-License-Identifier: GPL-3.0-only

//! Nandroid backup and restore menus

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone};
use recovery_contracts::Prompt;
use recovery_types::{RestorePart, RestoreSelection};

use super::{MenuContext, basename};
use crate::browser::{BrowseResult, choose_file_menu};
use crate::format::SD_EXT;

const HEADERS: [&str; 2] = ["Backup and Restore", ""];
const RESTORE_HEADERS: [&str; 2] = ["Choose an image to restore", ""];
const ADVANCED_HEADERS: [&str; 3] = ["Advanced Restore", "", "Choose an image to restore"];

/// Flash partition holding WiMAX calibration data on some devices
const WIMAX_PARTITION: &str = "wimax";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NandroidItem<'s> {
    Backup(&'s str),
    Restore(&'s str),
    AdvancedRestore(&'s str),
}

impl NandroidItem<'_> {
    fn label(&self) -> String {
        match self {
            Self::Backup(root) => format!("backup to {}", root),
            Self::Restore(root) => format!("restore from {}", root),
            Self::AdvancedRestore(root) => format!("advanced restore from {}", root),
        }
    }
}

/// `<root>/<backup_dir>/<YYYY-MM-DD.HH.MM.SS>`
pub fn backup_path<Tz: TimeZone>(root: &Path, backup_dir: &str, now: &DateTime<Tz>) -> PathBuf
where
    Tz::Offset: std::fmt::Display,
{
    root.join(backup_dir)
        .join(now.format("%Y-%m-%d.%H.%M.%S").to_string())
}

pub fn show_nandroid_menu(ctx: &MenuContext<'_>, prompt: &mut dyn Prompt) {
    let primary = ctx.layout.primary_storage.as_str();
    let internal = ctx.layout.internal_storage.as_str();

    let mut items = vec![
        NandroidItem::Backup(primary),
        NandroidItem::Restore(primary),
        NandroidItem::AdvancedRestore(primary),
    ];
    if ctx.has_internal_storage() {
        items.push(NandroidItem::Backup(internal));
        items.push(NandroidItem::Restore(internal));
        items.push(NandroidItem::AdvancedRestore(internal));
    }
    let labels: Vec<String> = items.iter().map(NandroidItem::label).collect();

    loop {
        let Some(chosen) = prompt.select(&HEADERS, &labels) else {
            return;
        };
        match items.get(chosen) {
            Some(NandroidItem::Backup(root)) => {
                nandroid_backup(ctx, prompt, root);
            }
            Some(NandroidItem::Restore(root)) => show_nandroid_restore_menu(ctx, prompt, root),
            Some(NandroidItem::AdvancedRestore(root)) => {
                show_nandroid_advanced_restore_menu(ctx, prompt, root)
            }
            None => tracing::warn!("Selection {} out of range", chosen),
        }
    }
}

/// Back up to a fresh timestamped directory on `storage_root`
pub fn nandroid_backup(ctx: &MenuContext<'_>, prompt: &mut dyn Prompt, storage_root: &str) -> bool {
    if !ctx.mount_or_report(prompt, storage_root) {
        return false;
    }

    let target = backup_path(
        &ctx.layout.host_path(storage_root),
        &ctx.layout.backup_dir,
        &Local::now(),
    );
    prompt.print(&format!("Backing up to {}", target.display()));

    match ctx.nandroid.backup(&target) {
        Ok(()) => {
            prompt.print("Backup complete!");
            true
        }
        Err(error) => {
            tracing::error!("Backup to {} failed: {}", target.display(), error);
            prompt.print("Error while making a backup image!");
            false
        }
    }
}

pub fn show_nandroid_restore_menu(ctx: &MenuContext<'_>, prompt: &mut dyn Prompt, storage_root: &str) {
    let Some(backup) = choose_backup(ctx, prompt, storage_root, &RESTORE_HEADERS) else {
        return;
    };

    if ctx.gate.confirm_selection(prompt, "Confirm restore?", "Yes - Restore") {
        restore(ctx, prompt, &backup, &RestoreSelection::all());
    }
}

pub fn show_nandroid_advanced_restore_menu(
    ctx: &MenuContext<'_>,
    prompt: &mut dyn Prompt,
    storage_root: &str,
) {
    let Some(backup) = choose_backup(ctx, prompt, storage_root, &ADVANCED_HEADERS) else {
        return;
    };

    let parts = restorable_parts(ctx);
    let labels: Vec<String> = parts
        .iter()
        .map(|part| format!("Restore {}", part.as_str()))
        .collect();
    let headers = ["Advanced Restore", "", basename(&backup)];

    let Some(chosen) = prompt.select(&headers, &labels) else {
        return;
    };
    let Some(&part) = parts.get(chosen) else {
        tracing::warn!("Selection {} out of range", chosen);
        return;
    };

    if part == RestorePart::SdExt && !sd_ext_present(ctx) {
        prompt.print("sd-ext not found.");
        return;
    }

    let label = format!("Yes - Restore {}", part.as_str());
    if ctx.gate.confirm_selection(prompt, "Confirm restore?", &label) {
        restore(ctx, prompt, &backup, &RestoreSelection::only(part));
    }
}

/// Parts offered by the advanced restore; wimax only where the partition exists
fn restorable_parts(ctx: &MenuContext<'_>) -> Vec<RestorePart> {
    let has_wimax = match ctx.flash.find_partition(WIMAX_PARTITION) {
        Ok(partition) => partition.is_some(),
        Err(error) => {
            tracing::debug!("Flash scan failed, not offering wimax: {}", error);
            false
        }
    };

    RestorePart::ALL
        .into_iter()
        .filter(|part| *part != RestorePart::Wimax || has_wimax)
        .collect()
}

fn sd_ext_present(ctx: &MenuContext<'_>) -> bool {
    ctx.catalog
        .volume_at(SD_EXT)
        .is_some_and(|volume| ctx.layout.host_path(&volume.device).exists())
}

fn choose_backup(
    ctx: &MenuContext<'_>,
    prompt: &mut dyn Prompt,
    storage_root: &str,
    headers: &[&str],
) -> Option<String> {
    if !ctx.mount_or_report(prompt, storage_root) {
        return None;
    }

    let backups = ctx
        .layout
        .host_path(storage_root)
        .join(&ctx.layout.backup_dir);
    match choose_file_menu(prompt, &backups.to_string_lossy(), None, headers) {
        Ok(BrowseResult::Selected(backup)) => Some(backup),
        Ok(BrowseResult::Cancelled) => None,
        Err(error) => {
            tracing::warn!("No backups under {}: {}", backups.display(), error);
            prompt.print("No backups found.");
            None
        }
    }
}

fn restore(
    ctx: &MenuContext<'_>,
    prompt: &mut dyn Prompt,
    backup: &str,
    selection: &RestoreSelection,
) -> bool {
    prompt.print(&format!("Restoring {}", basename(backup)));

    match ctx.nandroid.restore(Path::new(backup), selection) {
        Ok(()) => {
            prompt.print("Restore complete!");
            true
        }
        Err(error) => {
            tracing::error!("Restore from {} failed: {}", backup, error);
            prompt.print("Error while restoring!");
            false
        }
    }
}
