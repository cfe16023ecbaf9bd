// SPDX-License-Identifier: GPL-3.0-only

//! recovery-tool: storage operations of the recovery environment
//!
//! Loads the volume table and system properties, wires the real system
//! backends into the decision core and runs one menu or operation.

mod logging;
mod terminal;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use recovery_contracts::{
    FlashPartitions, FormatBackends, MountControl, Prompt, RecoveryError, VolumeCatalog,
};
use recovery_ops::menu::install::{show_choose_zip_menu, show_install_update_menu};
use recovery_ops::menu::maintenance::{
    copy_log, show_advanced_menu, wipe_battery_stats, wipe_dalvik_cache,
};
use recovery_ops::menu::nandroid::{
    nandroid_backup, show_nandroid_advanced_restore_menu, show_nandroid_menu,
    show_nandroid_restore_menu,
};
use recovery_ops::menu::partitions::show_partition_menu;
use recovery_ops::menu::ums::show_mount_usb_storage_menu;
use recovery_ops::{
    BrowseResult, FormatDispatcher, MenuContext, RecoveryConfig, SafetyGate, choose_file_menu,
    create_fstab,
};
use recovery_sys::{
    CommandInstaller, CommandNandroid, E2fsTools, FstabCatalog, MakeExt4fs, MtdPartitions,
    PropertyFiles, RfsTool, SysMountControl, SysRawEraser,
};
use recovery_types::{SessionOptions, partition_size};

use crate::terminal::TerminalPrompt;

#[derive(Parser)]
#[command(name = "recovery-tool")]
#[command(about = "Format, browse, install and back up from the recovery environment", long_about = None)]
struct Cli {
    /// Config file; /etc/recovery-tool.toml is used when present
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the volume table
    Volumes {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Mounts and storage menu
    Partitions,
    /// Format one volume
    Format {
        /// Mount point of the volume, e.g. /cache
        mount_point: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Pick a .zip package from storage and install it
    ChooseZip {
        /// Browse internal storage instead of the SD card
        #[arg(long)]
        internal: bool,
    },
    /// Package installation menu
    InstallMenu,
    /// Backup and restore menu
    Nandroid,
    /// Restore a nandroid backup
    Restore {
        #[arg(long)]
        internal: bool,
        /// Restore a single partition
        #[arg(long)]
        advanced: bool,
    },
    /// Make a timestamped nandroid backup
    Backup {
        #[arg(long)]
        internal: bool,
    },
    /// Run the file chooser and print the selection
    Browse {
        /// Directory to start in
        dir: String,
        /// Only list files with this suffix; directories are chosen otherwise
        #[arg(long)]
        ext: Option<String>,
    },
    /// Regenerate /etc/fstab from the volume table
    Fstab,
    /// Share storage over USB mass storage
    Ums,
    /// Advanced maintenance menu
    Advanced,
    /// Remove the dalvik-cache directories
    WipeDalvik,
    /// Remove the battery statistics file
    WipeBatteryStats,
    /// Copy the session log onto the SD card
    CopyLog,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = RecoveryConfig::load_or_default(cli.config.as_deref())?;

    logging::init(&config.host_path(&config.log_file));

    if unsafe { libc::geteuid() } != 0 {
        tracing::warn!("Not running as root; mount and flash operations will fail");
    }

    let table = config.host_path(&config.volume_table);
    let catalog = FstabCatalog::load(&table)
        .with_context(|| format!("loading volume table {}", table.display()))?;

    let property_files: Vec<PathBuf> = config
        .property_files
        .iter()
        .map(|path| config.host_path(path))
        .collect();
    let properties = PropertyFiles::load(&property_files).with_overrides(config.properties.clone());

    let layout = config.layout(&catalog);
    let gate = SafetyGate::from_properties(&properties, layout.no_confirm_marker_path());
    tracing::debug!(
        "Loaded {} volumes, data-as-media {}",
        catalog.all_volumes().len(),
        layout.data_media
    );

    let flash = MtdPartitions::default();
    let mut mounts = SysMountControl::new(&catalog, &flash);
    if layout.data_media {
        mounts = mounts.with_data_media(layout.primary_storage.as_str());
    }
    let raw = SysRawEraser::new(&flash);
    let ext4 = MakeExt4fs::default();
    let backends = FormatBackends {
        flash: &flash,
        raw: &raw,
        rfs: &RfsTool,
        ext: &E2fsTools,
        ext4: &ext4,
    };
    let dispatcher = FormatDispatcher::new(&catalog, &mounts, backends, &gate, &layout);
    let installer = CommandInstaller::new(&config.installer_command);
    let nandroid = CommandNandroid::new(&config.nandroid_command);

    let ctx = MenuContext {
        layout: &layout,
        catalog: &catalog,
        mounts: &mounts,
        flash: &flash,
        gate: &gate,
        dispatcher: &dispatcher,
        installer: &installer,
        nandroid: &nandroid,
    };

    let mut prompt = TerminalPrompt::stdin();
    let mut session = SessionOptions::default();

    let storage_root = |internal: bool| {
        if internal {
            layout.internal_storage.as_str()
        } else {
            layout.primary_storage.as_str()
        }
    };

    match cli.command {
        Commands::Volumes { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(catalog.all_volumes())?);
            } else {
                print_volumes(&catalog, &mounts, &flash);
            }
        }
        Commands::Partitions => show_partition_menu(&ctx, &mut prompt),
        Commands::Format { mount_point, yes } => {
            let title = format!("{} - Confirm format?", mount_point);
            if !yes && !gate.confirm_selection(&mut prompt, &title, "Yes - Format") {
                println!("Not formatting {}", mount_point);
                return Ok(ExitCode::SUCCESS);
            }
            if let Err(error) = dispatcher.format_volume(&mount_point) {
                return Ok(failure(&error));
            }
            println!("Formatted {}", mount_point);
        }
        Commands::ChooseZip { internal } => {
            show_choose_zip_menu(&ctx, &mut prompt, &session, storage_root(internal));
        }
        Commands::InstallMenu => show_install_update_menu(&ctx, &mut prompt, &mut session),
        Commands::Nandroid => show_nandroid_menu(&ctx, &mut prompt),
        Commands::Restore { internal, advanced } => {
            if advanced {
                show_nandroid_advanced_restore_menu(&ctx, &mut prompt, storage_root(internal));
            } else {
                show_nandroid_restore_menu(&ctx, &mut prompt, storage_root(internal));
            }
        }
        Commands::Backup { internal } => {
            return Ok(status(nandroid_backup(&ctx, &mut prompt, storage_root(internal))));
        }
        Commands::Browse { dir, ext } => {
            let start = config.host_path(&dir);
            let headers = ["Choose a file", ""];
            match choose_file_menu(&mut prompt, &start.to_string_lossy(), ext.as_deref(), &headers) {
                Ok(BrowseResult::Selected(path)) => println!("{}", path),
                Ok(BrowseResult::Cancelled) => prompt.print("Cancelled."),
                Err(error) => return Ok(failure(&error)),
            }
        }
        Commands::Fstab => {
            let written = create_fstab(&layout, &catalog, &flash).context("writing /etc/fstab")?;
            println!("Wrote {} entries to /etc/fstab", written);
        }
        Commands::Ums => show_mount_usb_storage_menu(&ctx, &mut prompt),
        Commands::Advanced => show_advanced_menu(&ctx, &mut prompt),
        Commands::WipeDalvik => return Ok(status(wipe_dalvik_cache(&ctx, &mut prompt))),
        Commands::WipeBatteryStats => return Ok(status(wipe_battery_stats(&ctx, &mut prompt))),
        Commands::CopyLog => return Ok(status(copy_log(&ctx, &mut prompt))),
    }

    Ok(ExitCode::SUCCESS)
}

fn print_volumes(
    catalog: &dyn VolumeCatalog,
    mounts: &dyn MountControl,
    flash: &dyn FlashPartitions,
) {
    println!("{:<12} {:<10} {:<32} {:<10} SIZE", "MOUNT", "TYPE", "DEVICE", "STATE");
    for volume in catalog.all_volumes() {
        let state = if !volume.is_mountable() {
            "raw"
        } else if mounts.is_mounted(&volume.mount_point) {
            "mounted"
        } else {
            "unmounted"
        };

        let size = if volume.device.starts_with('/') {
            String::new()
        } else {
            match flash.find_partition(&volume.device) {
                Ok(Some(partition)) => partition_size(partition.size),
                Ok(None) => "missing".to_string(),
                Err(error) => {
                    tracing::debug!("Flash scan failed: {}", error);
                    String::new()
                }
            }
        };

        println!(
            "{:<12} {:<10} {:<32} {:<10} {}",
            volume.mount_point, volume.fs_type, volume.device, state, size
        );
    }
}

/// Exit with the error's outcome code
fn failure(error: &RecoveryError) -> ExitCode {
    tracing::error!("{}", error);
    eprintln!("recovery-tool: {} (code {})", error, error.code());
    ExitCode::from(u8::try_from(error.code()).unwrap_or(1))
}

fn status(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
