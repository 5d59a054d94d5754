// usbtop - Rate Formatting
// Copyright (C) 2026 Christos Daggas
// SPDX-License-Identifier: MIT

/// Format a byte rate with two decimals in b/s, kb/s or Mb/s.
pub fn format_rate(bytes_per_sec: f64) -> String {
    if bytes_per_sec < 500.0 {
        format!("{:.2} b/s", bytes_per_sec)
    } else if bytes_per_sec < 500_000.0 {
        format!("{:.2} kb/s", bytes_per_sec / 1000.0)
    } else {
        format!("{:.2} Mb/s", bytes_per_sec / 1_000_000.0)
    }
}
