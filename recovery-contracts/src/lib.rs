// SPDX-License-Identifier: GPL-3.0-only

pub mod error;
pub mod traits;

pub use error::{BackendError, BackendResult, ErrorKind, FormatOutcome, RecoveryError};
pub use traits::{
    Ext4Builder, ExtFormatter, FlashPartition, FlashPartitions, FlashWriter, FormatBackends,
    MountControl, Nandroid, PackageInstaller, PropertySource, Prompt, RawEraser, RfsFormatter,
    VolumeCatalog,
};
