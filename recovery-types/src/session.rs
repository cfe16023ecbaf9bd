// SPDX-License-Identifier: GPL-3.0-only

use serde::{Deserialize, Serialize};

/// Installer switches owned by one interactive session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOptions {
    pub signature_check: bool,
    pub script_asserts: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            signature_check: true,
            script_asserts: true,
        }
    }
}

impl SessionOptions {
    /// Flip signature verification and return the new state
    pub fn toggle_signature_check(&mut self) -> bool {
        self.signature_check = !self.signature_check;
        self.signature_check
    }

    /// Flip script assertions and return the new state
    pub fn toggle_script_asserts(&mut self) -> bool {
        self.script_asserts = !self.script_asserts;
        self.script_asserts
    }
}
