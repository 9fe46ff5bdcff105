use std::{fmt::Display, time::Instant};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::logvbln;

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

pub struct DateTimeUtils;

impl DateTimeUtils {
    /// Reads an activity date. The published dates are local wall-clock times,
    /// so any offset is kept as written rather than converted.
    pub fn parse_activity_date(date: &str) -> Option<NaiveDateTime> {
        if let Ok(datetime) = DateTime::parse_from_rfc3339(date) {
            return Some(datetime.naive_local());
        }

        for format in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(date, format) {
                return Some(naive);
            }
        }

        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .ok()
            .and_then(|day| day.and_hms_opt(0, 0, 0))
    }

    pub fn format_activity_date(date: &NaiveDateTime) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    // e.g. "Jul 1, 12:30 UTC"
    pub fn format_last_updated(timestamp: &str) -> Option<String> {
        let datetime = DateTime::parse_from_rfc3339(timestamp).ok()?;

        Some(
            datetime
                .with_timezone(&Utc)
                .format("%b %-d, %H:%M UTC")
                .to_string(),
        )
    }
}

pub struct Benchmark {
    time: Instant,
    label: &'static str,
}

impl Benchmark {
    const CC: &'static str = "Benchmark";

    pub fn start(label: &'static str) -> Self {
        Self {
            label,
            time: Instant::now(),
        }
    }
}

impl Drop for Benchmark {
    fn drop(&mut self) {
        logvbln!("{}: {}", self.label, self);
    }
}

impl Display for Benchmark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let duration = self.time.elapsed();

        if duration.as_secs() > 60 {
            write!(f, "{:0>2}:{:0>2}min", duration.as_secs() / 60, duration.as_secs() % 60)
        } else {
            write!(f, "{}ms", duration.as_millis())
        }
    }
}
