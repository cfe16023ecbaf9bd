// SPDX-License-Identifier: GPL-3.0-only

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::Path;

/// Delete everything inside `dir`, hidden entries included, except the
/// top-level names in `preserve`.
///
/// Best effort: an entry that can't be removed is logged and skipped.
/// Returns the number of top-level entries removed.
pub fn wipe_contents(dir: &Path, preserve: &[&str]) -> io::Result<usize> {
    let mut removed = 0;

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        if preserve.iter().any(|keep| name.as_os_str() == OsStr::new(keep)) {
            tracing::debug!("Preserving {}", entry.path().display());
            continue;
        }

        let path = entry.path();
        // file_type() does not follow symlinks, so a link to a directory is unlinked
        let result = match entry.file_type() {
            Ok(file_type) if file_type.is_dir() => fs::remove_dir_all(&path),
            Ok(_) => fs::remove_file(&path),
            Err(error) => Err(error),
        };

        match result {
            Ok(()) => removed += 1,
            Err(error) => tracing::warn!("Failed to remove {}: {}", path.display(), error),
        }
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static NEXT: AtomicUsize = AtomicUsize::new(0);

    fn scratch() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "recovery-wipe-{}-{}",
            std::process::id(),
            NEXT.fetch_add(1, Ordering::Relaxed)
        ));
        fs::create_dir_all(&dir).expect("create scratch dir");
        dir
    }

    #[test]
    fn removes_everything_but_preserved_names() {
        let dir = scratch();
        fs::create_dir_all(dir.join("media/0/DCIM")).expect("create media");
        fs::write(dir.join("media/0/DCIM/photo.jpg"), b"jpg").expect("write photo");
        fs::create_dir_all(dir.join("app/com.example")).expect("create app");
        fs::write(dir.join(".layout_version"), b"3").expect("write hidden");
        fs::write(dir.join("system.db"), b"db").expect("write file");

        let removed = wipe_contents(&dir, &["media"]).expect("wipe");

        assert_eq!(removed, 3);
        assert!(dir.join("media/0/DCIM/photo.jpg").exists());
        assert!(!dir.join("app").exists());
        assert!(!dir.join(".layout_version").exists());
        assert!(!dir.join("system.db").exists());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = scratch().join("absent");
        assert!(wipe_contents(&dir, &[]).is_err());
    }
}
