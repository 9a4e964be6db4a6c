//! Human-readable reporting: byte sizes and per-stage timings.

use std::fmt;
use std::time::Instant;

use jzip_core::CompressionRatio;

/// Format a byte count with decimal units (`B`, `KB`, `MB`).
pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1000 {
        format!("{} B", bytes)
    } else if bytes < 1000 * 1000 {
        format!("{:.2} KB", bytes as f64 / 1000.0)
    } else {
        format!("{:.2} MB", bytes as f64 / (1000.0 * 1000.0))
    }
}

/// Measures consecutive stages of a run.
#[derive(Debug)]
pub struct Stopwatch {
    start: Instant,
    recent: Instant,
    stages: Vec<(&'static str, u64)>,
}

impl Stopwatch {
    /// Start timing.
    pub fn start() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            recent: now,
            stages: Vec::new(),
        }
    }

    /// Close the current stage under `name`.
    pub fn lap(&mut self, name: &'static str) {
        let now = Instant::now();
        let us = now.duration_since(self.recent).as_micros() as u64;
        self.recent = now;
        self.stages.push((name, us));
    }

    /// Microseconds since [`Stopwatch::start`].
    pub fn total_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }

    /// Recorded stages in order.
    pub fn stages(&self) -> &[(&'static str, u64)] {
        &self.stages
    }
}

/// Outcome of one driver command.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub original_size: u64,
    pub compressed_size: u64,
    pub stages: Vec<(&'static str, u64)>,
    pub total_us: u64,
}

impl Report {
    /// Snapshot the sizes and the stopwatch.
    pub fn new(original_size: u64, compressed_size: u64, watch: &Stopwatch) -> Self {
        Self {
            original_size,
            compressed_size,
            stages: watch.stages().to_vec(),
            total_us: watch.total_us(),
        }
    }

    /// Compression ratio of the run.
    pub fn ratio(&self) -> CompressionRatio {
        CompressionRatio::new(self.original_size as usize, self.compressed_size as usize)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, us) in &self.stages {
            writeln!(f, "{:<14} {:>10} us", format!("{}:", name), us)?;
        }
        writeln!(f, "{:<14} {:>10} us", "total:", self.total_us)?;
        writeln!(f)?;
        writeln!(f, "Original size:   {}", format_bytes(self.original_size))?;
        writeln!(f, "Compressed size: {}", format_bytes(self.compressed_size))?;
        writeln!(f, "Saved:           {} bytes", self.ratio().bytes_saved())?;
        write!(
            f,
            "Ratio:           {:.2}x ({:.1}% saved)",
            self.ratio().ratio(),
            self.ratio().savings_percent()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(999), "999 B");
        assert_eq!(format_bytes(1000), "1.00 KB");
        assert_eq!(format_bytes(1500), "1.50 KB");
        assert_eq!(format_bytes(999_999), "1000.00 KB");
        assert_eq!(format_bytes(1_000_000), "1.00 MB");
        assert_eq!(format_bytes(20_000_000), "20.00 MB");
    }

    #[test]
    fn test_stopwatch_records_stages_in_order() {
        let mut watch = Stopwatch::start();
        watch.lap("read");
        watch.lap("encode");
        let names: Vec<_> = watch.stages().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["read", "encode"]);

        let report = Report::new(2000, 1000, &watch);
        let text = report.to_string();
        assert!(text.contains("read:"));
        assert!(text.contains("2.00 KB"));
        assert!(text.contains("2.00x"));
        assert!(text.contains("Saved:           1000 bytes"));

        let grown = Report::new(10, 25, &watch).to_string();
        assert!(grown.contains("Saved:           -15 bytes"));
    }
}
