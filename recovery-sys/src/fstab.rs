// SPDX-License-Identifier: GPL-3.0-only

//! Recovery volume table
//!
//! One volume per line: `mount_point fs_type device [device2] [options]`,
//! where options are comma-separated `length=<bytes>` and `fstype2=<type>`.

use std::fs;
use std::path::Path;

use recovery_contracts::VolumeCatalog;
use recovery_types::Volume;
use tracing::{debug, info};

use crate::error::{Result, SysError};

#[derive(Debug, Clone, Default)]
pub struct FstabCatalog {
    volumes: Vec<Volume>,
}

impl FstabCatalog {
    pub fn load(path: &Path) -> Result<Self> {
        let input = fs::read_to_string(path)?;
        let volumes = parse_volume_table(&input)?;
        info!("Loaded {} volumes from {}", volumes.len(), path.display());
        Ok(Self { volumes })
    }

    pub fn from_volumes(volumes: Vec<Volume>) -> Self {
        Self { volumes }
    }
}

impl VolumeCatalog for FstabCatalog {
    fn all_volumes(&self) -> &[Volume] {
        &self.volumes
    }
}

pub fn parse_volume_table(input: &str) -> Result<Vec<Volume>> {
    let mut volumes = Vec::new();

    for (index, raw) in input.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let invalid = |reason: &str| SysError::InvalidVolumeTable {
            line: index + 1,
            reason: reason.to_string(),
        };

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 3 {
            return Err(invalid("expected mount point, type and device"));
        }
        if !fields[0].starts_with('/') {
            return Err(invalid("mount point must be absolute"));
        }

        let mut volume = Volume::new(fields[0], fields[1], fields[2]);
        let mut rest = &fields[3..];

        if let Some(first) = rest.first() {
            if !first.contains('=') {
                volume.device2 = Some(first.to_string());
                rest = &rest[1..];
            }
        }

        for option in rest.iter().copied().flat_map(|options| options.split(',')) {
            match option.split_once('=') {
                Some(("length", value)) => {
                    volume.length = value
                        .parse()
                        .map_err(|_| invalid("length must be an integer"))?;
                }
                Some(("fstype2", value)) => volume.fs_type2 = Some(value.to_string()),
                _ => debug!("Ignoring volume option {:?} on {}", option, volume.mount_point),
            }
        }

        volumes.push(volume);
    }

    Ok(volumes)
}
