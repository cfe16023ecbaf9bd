// SPDX-License-Identifier: GPL-3.0-only

//! Directory listing and interactive file chooser
//!
//! Paths are handled as strings: directory arguments end in `/` and every
//! listed directory carries a trailing `/`, so a listed path can be fed back
//! into the browser unchanged.

use std::fs;

use recovery_contracts::{Prompt, RecoveryError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// One listed entry, addressed by its full path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub path: String,
    pub kind: EntryKind,
}

impl DirEntry {
    /// Path relative to the listed `directory`
    pub fn display_name<'s>(&'s self, directory: &str) -> &'s str {
        self.path.strip_prefix(directory).unwrap_or(&self.path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseResult {
    Selected(String),
    Cancelled,
}

/// List the visible entries of `directory`.
///
/// With an extension, files whose name ends in it are listed; without one,
/// only sub-directories are. The result is in ascending byte order of the
/// full path. An empty listing is not an error; an unreadable directory is.
pub fn gather_files(
    directory: &str,
    extension: Option<&str>,
) -> Result<Vec<DirEntry>, RecoveryError> {
    let directory = with_trailing_slash(directory);
    let entries = fs::read_dir(&directory).map_err(|error| {
        tracing::warn!("Couldn't open directory {}: {}", directory, error);
        RecoveryError::DirectoryUnavailable(directory.clone())
    })?;

    let mut listing = Vec::new();
    for entry in entries.flatten() {
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            tracing::debug!("Skipping non UTF-8 entry {:?} in {}", file_name, directory);
            continue;
        };
        if name.starts_with('.') {
            continue;
        }

        let path = format!("{}{}", directory, name);
        // Follows symlinks, so a link to a directory browses as one
        let is_dir = fs::metadata(&path)
            .map(|metadata| metadata.is_dir())
            .unwrap_or(false);

        match extension {
            Some(extension) => {
                if !is_dir && name.ends_with(extension) {
                    listing.push(DirEntry {
                        path,
                        kind: EntryKind::File,
                    });
                }
            }
            None => {
                if is_dir {
                    listing.push(DirEntry {
                        path: format!("{}/", path),
                        kind: EntryKind::Directory,
                    });
                }
            }
        }
    }

    listing.sort_by(|a, b| a.path.as_bytes().cmp(b.path.as_bytes()));
    Ok(listing)
}

/// Let the operator pick a file below `directory`.
///
/// Sub-directories are listed before matching files and open a nested
/// chooser; backing out of a nested level returns to its parent. Without an
/// extension, sub-directories are the selectable entries themselves.
pub fn choose_file_menu(
    prompt: &mut dyn Prompt,
    directory: &str,
    extension: Option<&str>,
    headers: &[&str],
) -> Result<BrowseResult, RecoveryError> {
    let directory = with_trailing_slash(directory);
    let files = gather_files(&directory, extension)?;
    let dirs = match extension {
        Some(_) => gather_files(&directory, None)?,
        None => Vec::new(),
    };

    if files.is_empty() && dirs.is_empty() {
        prompt.print("No files found.");
        return Ok(BrowseResult::Cancelled);
    }

    let items: Vec<String> = dirs
        .iter()
        .chain(files.iter())
        .map(|entry| entry.display_name(&directory).to_string())
        .collect();

    loop {
        let Some(chosen) = prompt.select(headers, &items) else {
            return Ok(BrowseResult::Cancelled);
        };

        if let Some(subdir) = dirs.get(chosen) {
            match choose_file_menu(prompt, &subdir.path, extension, headers) {
                Ok(BrowseResult::Selected(path)) => return Ok(BrowseResult::Selected(path)),
                Ok(BrowseResult::Cancelled) => continue,
                Err(error) => {
                    prompt.print(&format!("Couldn't open directory {}", subdir.path));
                    tracing::warn!("Staying in {}: {}", directory, error);
                    continue;
                }
            }
        }

        match files.get(chosen - dirs.len()) {
            Some(file) => return Ok(BrowseResult::Selected(file.path.clone())),
            None => tracing::warn!("Selection {} out of range in {}", chosen, directory),
        }
    }
}

fn with_trailing_slash(directory: &str) -> String {
    if directory.ends_with('/') {
        directory.to_string()
    } else {
        format!("{}/", directory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_is_relative() {
        let entry = DirEntry {
            path: "/sdcard/roms/cm.zip".to_string(),
            kind: EntryKind::File,
        };
        assert_eq!(entry.display_name("/sdcard/"), "roms/cm.zip");
        assert_eq!(entry.display_name("/emmc/"), "/sdcard/roms/cm.zip");
    }

    #[test]
    fn trailing_slash_added_once() {
        assert_eq!(with_trailing_slash("/sdcard"), "/sdcard/");
        assert_eq!(with_trailing_slash("/sdcard/"), "/sdcard/");
    }

    #[test]
    fn unreadable_directory_is_an_error() {
        let result = gather_files("/nonexistent/recovery-browser", Some(".zip"));
        assert_eq!(
            result,
            Err(RecoveryError::DirectoryUnavailable(
                "/nonexistent/recovery-browser/".to_string()
            ))
        );
    }
}
