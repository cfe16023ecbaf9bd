// SPDX-License-Identifier: GPL-3.0-only

pub mod catalog;
pub mod collaborators;
pub mod flash;
pub mod format;
pub mod mount;
pub mod prompt;
pub mod property;

pub use catalog::VolumeCatalog;
pub use collaborators::{Nandroid, PackageInstaller};
pub use flash::{FlashPartition, FlashPartitions, FlashWriter, RawEraser};
pub use format::{Ext4Builder, ExtFormatter, FormatBackends, RfsFormatter};
pub use mount::MountControl;
pub use prompt::Prompt;
pub use property::PropertySource;
