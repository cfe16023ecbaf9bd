// SPDX-License-Identifier: GPL-3.0-only

mod dispatcher;
pub mod strategy;
mod wipe;

pub use dispatcher::{FormatDispatcher, SD_EXT};
pub use wipe::wipe_contents;
