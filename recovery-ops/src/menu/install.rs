// SPDX-License-Identifier: GPL-3.0-only

//! Package installation menu

use std::path::Path;

use recovery_contracts::Prompt;
use recovery_types::SessionOptions;

use super::{MenuContext, basename};
use crate::browser::{BrowseResult, choose_file_menu};

const HEADERS: [&str; 3] = ["Apply update from .zip file on SD card", "", ""];
const ZIP_HEADERS: [&str; 2] = ["Choose a zip to apply", ""];

#[derive(Debug, Clone, PartialEq, Eq)]
enum InstallItem<'s> {
    ChooseZip(&'s str),
    ApplyUpdate(&'s str),
    ToggleSignatureCheck,
    ToggleScriptAsserts,
}

impl InstallItem<'_> {
    fn label(&self) -> String {
        match self {
            Self::ChooseZip(root) => format!("choose zip from {}", root),
            Self::ApplyUpdate(root) => format!("apply {}/update.zip", root),
            Self::ToggleSignatureCheck => "toggle signature verification".to_string(),
            Self::ToggleScriptAsserts => "toggle script asserts".to_string(),
        }
    }
}

pub fn show_install_update_menu(
    ctx: &MenuContext<'_>,
    prompt: &mut dyn Prompt,
    session: &mut SessionOptions,
) {
    let primary = ctx.layout.primary_storage.as_str();
    let internal = ctx.layout.internal_storage.as_str();

    let mut items = vec![InstallItem::ChooseZip(primary)];
    if ctx.has_internal_storage() {
        items.push(InstallItem::ChooseZip(internal));
    }
    items.push(InstallItem::ApplyUpdate(primary));
    if ctx.has_internal_storage() {
        items.push(InstallItem::ApplyUpdate(internal));
    }
    items.push(InstallItem::ToggleSignatureCheck);
    items.push(InstallItem::ToggleScriptAsserts);

    let labels: Vec<String> = items.iter().map(InstallItem::label).collect();

    loop {
        let Some(chosen) = prompt.select(&HEADERS, &labels) else {
            return;
        };
        match items.get(chosen) {
            Some(InstallItem::ChooseZip(root)) => show_choose_zip_menu(ctx, prompt, session, root),
            Some(InstallItem::ApplyUpdate(root)) => {
                let package = format!("{}/update.zip", root);
                let label = format!("Yes - Install {}", package);
                if ctx.gate.confirm_selection(prompt, "Confirm install?", &label) {
                    let host_package = ctx.layout.host_path(&package);
                    install_zip(ctx, prompt, session, &host_package);
                }
            }
            Some(InstallItem::ToggleSignatureCheck) => {
                let enabled = session.toggle_signature_check();
                prompt.print(&format!("Signature Check: {}", enabled_label(enabled)));
            }
            Some(InstallItem::ToggleScriptAsserts) => {
                let enabled = session.toggle_script_asserts();
                prompt.print(&format!("Script Asserts: {}", enabled_label(enabled)));
            }
            None => tracing::warn!("Selection {} out of range", chosen),
        }
    }
}

/// Browse `mount_point` for a .zip package and install it after confirmation
pub fn show_choose_zip_menu(
    ctx: &MenuContext<'_>,
    prompt: &mut dyn Prompt,
    session: &SessionOptions,
    mount_point: &str,
) {
    if !ctx.mount_or_report(prompt, mount_point) {
        return;
    }

    let root = ctx.layout.host_path(mount_point);
    let selection = match choose_file_menu(
        prompt,
        &root.to_string_lossy(),
        Some(".zip"),
        &ZIP_HEADERS,
    ) {
        Ok(selection) => selection,
        Err(error) => {
            prompt.print(&format!("Couldn't open directory {} ({})", mount_point, error.code()));
            return;
        }
    };

    let BrowseResult::Selected(package) = selection else {
        return;
    };

    let label = format!("Yes - Install {}", basename(&package));
    if ctx.gate.confirm_selection(prompt, "Confirm install?", &label) {
        install_zip(ctx, prompt, session, Path::new(&package));
    }
}

/// Run the installer on `package`; returns whether it succeeded
pub fn install_zip(
    ctx: &MenuContext<'_>,
    prompt: &mut dyn Prompt,
    session: &SessionOptions,
    package: &Path,
) -> bool {
    prompt.print("");
    prompt.print(&format!("-- Installing: {}", package.display()));

    match ctx.installer.install(package, session) {
        Ok(()) => {
            prompt.print("Install from sdcard complete.");
            true
        }
        Err(error) => {
            tracing::error!("Installing {} failed: {}", package.display(), error);
            prompt.print("Installation aborted.");
            false
        }
    }
}

fn enabled_label(enabled: bool) -> &'static str {
    if enabled { "Enabled" } else { "Disabled" }
}
