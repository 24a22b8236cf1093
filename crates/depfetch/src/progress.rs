//! In-place progress lines on stdout.
//!
//! Progress is rewritten in place with `\r`; each entry's output ends with a
//! `Done!` marker so the rewritten line is closed off.

use std::io::{self, Write};

/// Tracks download progress and prints a percentage on every whole-percent
/// change of `written * 100 / total`.
pub struct DownloadMeter {
    started: bool,
    last_percent: i64,
}

impl DownloadMeter {
    pub fn new() -> Self {
        Self {
            started: false,
            last_percent: -1,
        }
    }

    /// Update the meter. The first call prints the size line.
    pub fn update(&mut self, written: u64, total: u64) {
        if !self.started {
            println!("  Download (Size {})...", format_size(total));
            self.started = true;
        }

        if total == 0 {
            return;
        }

        let percent = (written * 100 / total) as i64;
        if percent > self.last_percent {
            self.last_percent = percent;
            print!("\r  {percent}%");
            let _ = io::stdout().flush();
        }
    }

    pub fn finish(&self) {
        println!("\r  Done!");
    }
}

impl Default for DownloadMeter {
    fn default() -> Self {
        Self::new()
    }
}

/// Print the extraction counter line (`\r  n/m`).
pub fn print_counter(current: usize, total: usize) {
    print!("\r  {current}/{total}");
    let _ = io::stdout().flush();
}

/// Close off a counter line.
pub fn counter_done() {
    println!("\r  Done!");
}

/// Human readable size with integer division and `< 2 * unit` thresholds.
pub fn format_size(size: u64) -> String {
    const KB: u64 = 1024;

    if size < 2 * KB {
        return format!("{size} B");
    }
    let size = size / KB;
    if size < 2 * KB {
        return format!("{size} KB");
    }
    let size = size / KB;
    if size < 2 * KB {
        return format!("{size} MB");
    }
    format!("{} GB", size / KB)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(500), "500 B");
        assert_eq!(format_size(2047), "2047 B");
        assert_eq!(format_size(2048), "2 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3 MB");
        assert_eq!(format_size(4 * 1024 * 1024 * 1024), "4 GB");
    }

    #[test]
    fn test_meter_tracks_percent() {
        let mut meter = DownloadMeter::new();
        meter.update(0, 100);
        assert_eq!(meter.last_percent, 0);
        meter.update(50, 100);
        assert_eq!(meter.last_percent, 50);
        // no regression on equal progress
        meter.update(50, 100);
        assert_eq!(meter.last_percent, 50);
        meter.update(100, 100);
        assert_eq!(meter.last_percent, 100);
    }

    #[test]
    fn test_meter_unknown_total() {
        let mut meter = DownloadMeter::new();
        meter.update(1234, 0);
        assert_eq!(meter.last_percent, -1);
    }
}
