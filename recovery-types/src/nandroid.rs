// SPDX-License-Identifier: GPL-3.0-only

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestorePart {
    Boot,
    System,
    Data,
    Cache,
    SdExt,
    Wimax,
}

impl RestorePart {
    pub const ALL: [RestorePart; 6] = [
        RestorePart::Boot,
        RestorePart::System,
        RestorePart::Data,
        RestorePart::Cache,
        RestorePart::SdExt,
        RestorePart::Wimax,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Boot => "boot",
            Self::System => "system",
            Self::Data => "data",
            Self::Cache => "cache",
            Self::SdExt => "sd-ext",
            Self::Wimax => "wimax",
        }
    }
}

/// Which partitions a nandroid restore writes back
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoreSelection {
    pub boot: bool,
    pub system: bool,
    pub data: bool,
    pub cache: bool,
    pub sd_ext: bool,
    pub wimax: bool,
}

impl RestoreSelection {
    /// Full restore; wimax is only ever restored on request
    pub fn all() -> Self {
        Self {
            boot: true,
            system: true,
            data: true,
            cache: true,
            sd_ext: true,
            wimax: false,
        }
    }

    pub fn only(part: RestorePart) -> Self {
        let mut selection = Self::default();
        match part {
            RestorePart::Boot => selection.boot = true,
            RestorePart::System => selection.system = true,
            RestorePart::Data => selection.data = true,
            RestorePart::Cache => selection.cache = true,
            RestorePart::SdExt => selection.sd_ext = true,
            RestorePart::Wimax => selection.wimax = true,
        }
        selection
    }

    pub fn parts(&self) -> Vec<RestorePart> {
        RestorePart::ALL
            .into_iter()
            .filter(|part| match part {
                RestorePart::Boot => self.boot,
                RestorePart::System => self.system,
                RestorePart::Data => self.data,
                RestorePart::Cache => self.cache,
                RestorePart::SdExt => self.sd_ext,
                RestorePart::Wimax => self.wimax,
            })
            .collect()
    }
}
