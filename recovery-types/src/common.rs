// SPDX-License-Identifier: GPL-3.0-only

use num_format::{Locale, ToFormattedString};

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Flash partition size as shown in the volume listing,
/// e.g. "128.00 MB (134,217,728 bytes)"
pub fn partition_size(bytes: u64) -> String {
    let mut scaled = bytes as f64;
    let mut unit = 0;
    while scaled >= 1024. && unit < UNITS.len() - 1 {
        scaled /= 1024.;
        unit += 1;
    }

    format!(
        "{:.2} {} ({} bytes)",
        scaled,
        UNITS[unit],
        bytes.to_formatted_string(&Locale::en)
    )
}
