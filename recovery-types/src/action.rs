// SPDX-License-Identifier: GPL-3.0-only

use serde::Serialize;

use crate::volume::Volume;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Mount,
    Unmount,
    Format,
}

impl ActionKind {
    pub fn verb(self) -> &'static str {
        match self {
            Self::Mount => "mount",
            Self::Unmount => "unmount",
            Self::Format => "format",
        }
    }
}

/// A selectable per-volume action, rebuilt on every menu render
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VolumeAction<'a> {
    pub volume: &'a Volume,
    pub kind: ActionKind,
    pub current_label: String,
}

impl<'a> VolumeAction<'a> {
    pub fn new(volume: &'a Volume, kind: ActionKind) -> Self {
        Self {
            volume,
            kind,
            current_label: format!("{} {}", kind.verb(), volume.mount_point),
        }
    }
}
