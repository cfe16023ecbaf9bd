// SPDX-License-Identifier: GPL-3.0-only

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use recovery_contracts::PropertySource;
use tracing::debug;

/// System properties read from `key=value` property files
#[derive(Debug, Clone, Default)]
pub struct PropertyFiles {
    values: HashMap<String, String>,
}

impl PropertyFiles {
    /// Load files in order; later files override earlier ones, missing files are skipped
    pub fn load(paths: &[PathBuf]) -> Self {
        let mut values = HashMap::new();
        for path in paths {
            match fs::read_to_string(path) {
                Ok(content) => {
                    let parsed = parse_properties(&content);
                    debug!("Read {} properties from {}", parsed.len(), path.display());
                    values.extend(parsed);
                }
                Err(error) => debug!("Skipping property file {}: {}", path.display(), error),
            }
        }
        Self { values }
    }

    pub fn with_overrides(mut self, overrides: impl IntoIterator<Item = (String, String)>) -> Self {
        self.values.extend(overrides);
        self
    }
}

impl PropertySource for PropertyFiles {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

pub fn parse_properties(input: &str) -> HashMap<String, String> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .collect()
}
