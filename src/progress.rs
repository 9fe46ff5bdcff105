use std::{
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use tokio::{runtime::Handle, task::JoinHandle, time};

use crate::{logerr, util::config::ProgressConfig, util::time::DateTimeUtils};

// Marker position shown before any data arrives
const INITIAL_MARKER: &str = "50px";

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSummary {
    pub total_miles: f64,
    pub last_updated: String,
}

/// Yearly mileage progress bar with its blinking marker.
pub struct ProgressWidget {
    config: ProgressConfig,
    summary: Option<ProgressSummary>,

    flipped: Arc<AtomicBool>,
    ticks: Arc<AtomicU64>,
    ticker: Option<JoinHandle<()>>,
}

impl ProgressWidget {
    const CC: &'static str = "Progress";

    pub fn new(config: ProgressConfig) -> Self {
        Self {
            config,
            summary: None,
            flipped: Arc::new(AtomicBool::new(false)),
            ticks: Arc::new(AtomicU64::new(0)),
            ticker: None,
        }
    }

    pub fn update(&mut self, total_miles: f64, last_updated: &str) {
        self.summary = Some(ProgressSummary {
            total_miles,
            last_updated: last_updated.to_string(),
        });
    }

    pub fn summary(&self) -> Option<&ProgressSummary> {
        self.summary.as_ref()
    }

    /// Share of the target covered so far, 1.0 meaning done.
    pub fn percent_complete(&self) -> Option<f64> {
        let summary = self.summary.as_ref()?;
        Some(summary.total_miles / self.config.target_miles)
    }

    pub fn marker_offset_px(&self) -> Option<f64> {
        self.percent_complete()
            .map(|done| self.config.bar_width_px * done - self.config.marker_half_width_px)
    }

    pub fn marker_offset_css(&self) -> String {
        match self.marker_offset_px() {
            Some(offset) => format!("{}px", offset),
            None => INITIAL_MARKER.to_string(),
        }
    }

    pub fn total_miles_str(&self) -> Option<String> {
        self.summary
            .as_ref()
            .map(|summary| format!("{:.2}", summary.total_miles))
    }

    pub fn last_updated_str(&self) -> Option<String> {
        DateTimeUtils::format_last_updated(&self.summary.as_ref()?.last_updated)
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped.load(Ordering::Relaxed)
    }

    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    /// Flips the marker every `tick_ms`, first flip one period from now.
    /// Needs a running tokio runtime; without one the marker stays still.
    pub fn start_ticking(&mut self) {
        if self.ticker.is_some() {
            return;
        }

        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(err) => {
                logerr!("Marker animation disabled: {}", err);
                return;
            }
        };

        let period = Duration::from_millis(self.config.tick_ms.max(1));
        let flipped = Arc::clone(&self.flipped);
        let ticks = Arc::clone(&self.ticks);

        self.ticker = Some(runtime.spawn(async move {
            let mut interval = time::interval_at(time::Instant::now() + period, period);
            loop {
                interval.tick().await;
                flipped.fetch_xor(true, Ordering::Relaxed);
                ticks.fetch_add(1, Ordering::Relaxed);
            }
        }));
    }

    pub fn stop_ticking(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

impl Drop for ProgressWidget {
    fn drop(&mut self) {
        self.stop_ticking();
    }
}
