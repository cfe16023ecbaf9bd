// SPDX-License-Identifier: GPL-3.0-only

//! Package installation and nandroid backup/restore run as external programs

use std::path::Path;

use recovery_contracts::{BackendResult, Nandroid, PackageInstaller};
use recovery_types::{RestoreSelection, SessionOptions};
use tracing::info;

use crate::cmd;
use crate::error::SysError;

pub struct CommandInstaller {
    program: String,
}

impl CommandInstaller {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

pub(crate) fn install_args<'a>(package: &'a str, options: &SessionOptions) -> Vec<&'a str> {
    let mut args = Vec::new();
    if !options.signature_check {
        args.push("--no-signature-check");
    }
    if !options.script_asserts {
        args.push("--no-script-asserts");
    }
    args.push(package);
    args
}

impl PackageInstaller for CommandInstaller {
    fn install(&self, package: &Path, options: &SessionOptions) -> BackendResult<()> {
        let package = package
            .to_str()
            .ok_or_else(|| SysError::OperationFailed(format!("non UTF-8 path {:?}", package)))?;
        info!("Installing {}", package);
        cmd::run(&self.program, &install_args(package, options))?;
        Ok(())
    }
}

pub struct CommandNandroid {
    program: String,
}

impl CommandNandroid {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

pub(crate) fn restore_args<'a>(backup_dir: &'a str, selection: &RestoreSelection) -> Vec<&'a str> {
    let mut args = vec!["restore", backup_dir];
    args.extend(selection.parts().into_iter().map(|part| part.as_str()));
    args
}

impl Nandroid for CommandNandroid {
    fn backup(&self, backup_dir: &Path) -> BackendResult<()> {
        let dir = backup_dir
            .to_str()
            .ok_or_else(|| SysError::OperationFailed(format!("non UTF-8 path {:?}", backup_dir)))?;
        info!("Backing up to {}", dir);
        cmd::run(&self.program, &["backup", dir])?;
        Ok(())
    }

    fn restore(&self, backup_dir: &Path, selection: &RestoreSelection) -> BackendResult<()> {
        let dir = backup_dir
            .to_str()
            .ok_or_else(|| SysError::OperationFailed(format!("non UTF-8 path {:?}", backup_dir)))?;
        info!("Restoring {} partitions from {}", selection.parts().len(), dir);
        cmd::run(&self.program, &restore_args(dir, selection))?;
        Ok(())
    }
}
