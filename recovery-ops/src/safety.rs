// SPDX-License-Identifier: GPL-3.0-only

//! Format deny-list and destructive-action confirmation
//!
//! Some partitions (radio firmware, bootloader, EFS calibration data) must
//! never be formatted from recovery. The deny-list is read from a system
//! property so device builds can extend it.

use std::path::PathBuf;

use recovery_contracts::{PropertySource, Prompt};

pub const FORBID_FORMAT_PROPERTY: &str = "ro.cwm.forbid_format";

/// Mount points refused when the property is unset
pub const DEFAULT_FORBID_FORMAT: &str = "/misc,/radio,/bootloader,/recovery,/efs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafetyGate {
    deny_list: Vec<String>,
    bypass_marker: PathBuf,
}

impl SafetyGate {
    /// `deny_list` is comma and/or space separated
    pub fn new(deny_list: &str, bypass_marker: impl Into<PathBuf>) -> Self {
        Self {
            deny_list: deny_list
                .split([',', ' '])
                .filter(|entry| !entry.is_empty())
                .map(str::to_string)
                .collect(),
            bypass_marker: bypass_marker.into(),
        }
    }

    pub fn from_properties(
        properties: &dyn PropertySource,
        bypass_marker: impl Into<PathBuf>,
    ) -> Self {
        let deny_list = properties.get_or(FORBID_FORMAT_PROPERTY, DEFAULT_FORBID_FORMAT);
        tracing::debug!("Format deny-list: {}", deny_list);
        Self::new(&deny_list, bypass_marker)
    }

    pub fn deny_list(&self) -> &[String] {
        &self.deny_list
    }

    pub fn is_safe_to_format(&self, mount_point: &str) -> bool {
        !self.deny_list.iter().any(|entry| entry == mount_point)
    }

    /// Whether the bypass marker is present right now
    pub fn confirmation_bypassed(&self) -> bool {
        self.bypass_marker.exists()
    }

    /// Ask the operator to confirm a destructive action.
    ///
    /// Returns true without prompting while the bypass marker exists. The
    /// marker is looked up on every call.
    pub fn confirm_selection(
        &self,
        prompt: &mut dyn Prompt,
        title: &str,
        confirm_label: &str,
    ) -> bool {
        if self.confirmation_bypassed() {
            tracing::debug!("Confirmation bypassed for \"{}\"", title);
            return true;
        }

        let headers = [title, "THIS CAN NOT BE UNDONE.", ""];
        let items = ["No".to_string(), confirm_label.to_string()];
        prompt.select(&headers, &items) == Some(1)
    }
}
