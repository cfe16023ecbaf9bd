// SPDX-License-Identifier: GPL-3.0-only

/// Blocking operator surface
pub trait Prompt {
    /// Present `items` under `headers`; `None` means the operator went back
    fn select(&mut self, headers: &[&str], items: &[String]) -> Option<usize>;

    fn print(&mut self, line: &str);
}
