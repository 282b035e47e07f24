//! Phase timing for the precomputation pipeline.

use std::time::{Duration, Instant};

/// Wall time spent in each pipeline phase.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PhaseTimings {
    pub validate: Duration,
    pub assign: Duration,
    pub sort: Duration,
    pub offsets: Duration,
}

impl PhaseTimings {
    pub fn total(&self) -> Duration {
        self.validate + self.assign + self.sort + self.offsets
    }
}

/// Format `count` items processed in `elapsed` as a rate, e.g. `12.5M/s`.
pub fn format_rate(count: usize, elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64();
    if secs <= 0.0 {
        return "N/A".to_string();
    }
    let per_sec = count as f64 / secs;
    if per_sec >= 1_000_000.0 {
        format!("{:.2}M/s", per_sec / 1_000_000.0)
    } else if per_sec >= 1_000.0 {
        format!("{:.1}k/s", per_sec / 1000.0)
    } else {
        format!("{:.0}/s", per_sec)
    }
}

/// Timer for one phase over `items` samples.
///
/// Logs elapsed time and throughput either when [`Timed::finish`] is called
/// or, failing that, on drop (so early returns still get logged).
pub struct Timed {
    name: &'static str,
    items: usize,
    start: Instant,
    level: log::Level,
    done: bool,
}

impl Timed {
    /// Timer that logs at INFO level.
    pub fn info(name: &'static str, items: usize) -> Self {
        Self::with_level(name, items, log::Level::Info)
    }

    /// Timer that logs at DEBUG level.
    pub fn debug(name: &'static str, items: usize) -> Self {
        Self::with_level(name, items, log::Level::Debug)
    }

    fn with_level(name: &'static str, items: usize, level: log::Level) -> Self {
        log::trace!("{} ({} samples)...", name, items);
        Self {
            name,
            items,
            start: Instant::now(),
            level,
            done: false,
        }
    }

    /// Stop the timer, log, and return the elapsed time.
    pub fn finish(mut self) -> Duration {
        self.log()
    }

    fn log(&mut self) -> Duration {
        let elapsed = self.start.elapsed();
        self.done = true;
        log::log!(
            self.level,
            "{}: {:.3?} ({})",
            self.name,
            elapsed,
            format_rate(self.items, elapsed)
        );
        elapsed
    }
}

impl Drop for Timed {
    fn drop(&mut self) {
        if !self.done {
            self.log();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(10, Duration::ZERO), "N/A");
        assert_eq!(format_rate(500, Duration::from_secs(1)), "500/s");
        assert_eq!(format_rate(2_500, Duration::from_secs(1)), "2.5k/s");
        assert_eq!(format_rate(3_000_000, Duration::from_millis(500)), "6.00M/s");
    }

    #[test]
    fn test_phase_total() {
        let t = PhaseTimings {
            validate: Duration::from_millis(1),
            assign: Duration::from_millis(2),
            sort: Duration::from_millis(3),
            offsets: Duration::from_millis(4),
        };
        assert_eq!(t.total(), Duration::from_millis(10));
    }

    #[test]
    fn test_finish_returns_elapsed() {
        for t in [Timed::debug("noop", 0), Timed::info("noop", 10)] {
            assert!(t.finish() < Duration::from_secs(5));
        }
    }
}
