//! Progress reporting for long runs.
//!
//! The driver reports fractional completion after every chunk; percentages
//! are clamped to [0, 100] and, because processed bytes only grow, are
//! non-decreasing. The final report of a successful run is exactly 100.
/// Receives a completion percentage in [0, 100].
pub trait ProgressSink {
    fn on_progress(&mut self, percent: f64);
}

impl<F: FnMut(f64)> ProgressSink for F {
    fn on_progress(&mut self, percent: f64) {
        self(percent)
    }
}

/// Completion percentage, clamped. An empty input counts as complete.
pub fn percent(processed_bytes: u64, total_bytes: u64) -> f64 {
    if total_bytes == 0 {
        return 100.0;
    }
    ((processed_bytes as f64 / total_bytes as f64) * 100.0).min(100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_to_one_hundred() {
        assert_eq!(percent(200, 100), 100.0);
        assert_eq!(percent(100, 100), 100.0);
        assert_eq!(percent(50, 100), 50.0);
    }

    #[test]
    fn empty_input_is_complete() {
        assert_eq!(percent(0, 0), 100.0);
    }

    #[test]
    fn closures_are_sinks() {
        let mut seen = Vec::new();
        {
            let mut sink = |p: f64| seen.push(p);
            sink.on_progress(12.5);
        }
        assert_eq!(seen, vec![12.5]);
    }
}
