// SPDX-License-Identifier: GPL-3.0-only

#![allow(dead_code)]

use recovery_ops::{
    DEFAULT_FORBID_FORMAT, FormatDispatcher, MenuContext, SafetyGate, StorageLayout,
};
use recovery_testing::{
    FakeCatalog, FakeMounts, RecordingBackends, RecordingInstaller, RecordingNandroid, TempDir,
};

/// Fakes for one test, staged under a scratch fs root
pub struct Rig {
    pub root: TempDir,
    pub catalog: FakeCatalog,
    pub mounts: FakeMounts,
    pub backends: RecordingBackends,
    pub gate: SafetyGate,
    pub layout: StorageLayout,
    pub installer: RecordingInstaller,
    pub nandroid: RecordingNandroid,
}

impl Rig {
    pub fn new(catalog: FakeCatalog) -> Self {
        let root = TempDir::new("recovery-ops-test");
        let layout = StorageLayout {
            fs_root: root.path().to_path_buf(),
            ..StorageLayout::default()
        };
        let gate = SafetyGate::new(DEFAULT_FORBID_FORMAT, layout.no_confirm_marker_path());

        Self {
            root,
            catalog,
            mounts: FakeMounts::new(),
            backends: RecordingBackends::new(),
            gate,
            layout,
            installer: RecordingInstaller::default(),
            nandroid: RecordingNandroid::default(),
        }
    }

    pub fn with_data_media(mut self) -> Self {
        self.layout.data_media = true;
        self
    }

    pub fn with_backends(mut self, backends: RecordingBackends) -> Self {
        self.backends = backends;
        self
    }

    pub fn with_mounts(mut self, mounts: FakeMounts) -> Self {
        self.mounts = mounts;
        self
    }

    pub fn with_installer(mut self, installer: RecordingInstaller) -> Self {
        self.installer = installer;
        self
    }

    /// Drop the confirmation bypass marker onto primary storage
    pub fn bypass_confirmations(&self) {
        self.root.touch("sdcard/clockworkmod/.no_confirm");
    }

    pub fn dispatcher(&self) -> FormatDispatcher<'_> {
        FormatDispatcher::new(
            &self.catalog,
            &self.mounts,
            self.backends.as_backends(),
            &self.gate,
            &self.layout,
        )
    }

    pub fn context<'a>(&'a self, dispatcher: &'a FormatDispatcher<'a>) -> MenuContext<'a> {
        MenuContext {
            layout: &self.layout,
            catalog: &self.catalog,
            mounts: &self.mounts,
            flash: &self.backends,
            gate: &self.gate,
            dispatcher,
            installer: &self.installer,
            nandroid: &self.nandroid,
        }
    }
}
