use embassy_time::{Duration, Instant};
use log::info;

const REPORT_INTERVAL: Duration = Duration::from_secs(5);

/// Periodic effective reading speed log.
pub(super) struct PaceReport {
    words: u64,
    window_start: Instant,
}

impl PaceReport {
    pub(super) fn new() -> Self {
        Self {
            words: 0,
            window_start: Instant::now(),
        }
    }

    pub(super) fn observe(&mut self, revealed_words: u32) {
        self.words = self.words.saturating_add(u64::from(revealed_words));

        let elapsed = self.window_start.elapsed();
        if elapsed < REPORT_INTERVAL {
            return;
        }

        if self.words > 0 {
            let elapsed_ms = elapsed.as_millis().max(1);
            let wpm_x100 = self.words * 6_000_000 / elapsed_ms;
            info!(
                "effective_wpm={}.{:02} words={} elapsed_ms={}",
                wpm_x100 / 100,
                wpm_x100 % 100,
                self.words,
                elapsed_ms
            );
        }

        self.words = 0;
        self.window_start = Instant::now();
    }
}
