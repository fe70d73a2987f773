use std::time::{Duration, Instant};

use evdev::{Device, InputEvent, KeyCode};
use log::info;

use crate::key_hold_timer::KeyHoldTimer;
use crate::sink::DurationSink;
use crate::trigger::{KeyEvent, TriggerDispatcher};

const STATS_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Default, PartialEq)]
pub(super) struct HoldStats {
    count: usize,
    total_seconds: f64,
    longest_seconds: f64,
}

impl HoldStats {
    pub(super) fn record(&mut self, seconds: f64) {
        self.count = self.count.saturating_add(1);
        self.total_seconds += seconds;
        self.longest_seconds = self.longest_seconds.max(seconds);
    }

    pub(super) fn average_seconds(&self) -> Option<f64> {
        (self.count > 0).then(|| self.total_seconds / self.count as f64)
    }

    pub(super) fn summary(&self) -> Option<String> {
        let average = self.average_seconds()?;
        Some(format!(
            "Holds: {}; total: {:.3}s; average: {:.3}s; longest: {:.3}s",
            self.count, self.total_seconds, average, self.longest_seconds
        ))
    }
}

/// Dispatch state shared by every event of a monitored device.
pub(super) struct HoldSession {
    dispatcher: TriggerDispatcher<KeyHoldTimer<Box<dyn DurationSink>>>,
    stats: HoldStats,
}

impl HoldSession {
    pub(super) fn new(timer: KeyHoldTimer<Box<dyn DurationSink>>) -> Self {
        Self {
            dispatcher: TriggerDispatcher::for_timer(timer),
            stats: HoldStats::default(),
        }
    }

    pub(super) fn key(&self) -> KeyCode {
        self.dispatcher.handler().key()
    }

    pub(super) fn stats(&self) -> &HoldStats {
        &self.stats
    }

    /// Returns the reported hold in seconds when the event completed one.
    pub(super) fn handle_input_event(&mut self, orig_event: &InputEvent) -> Option<f64> {
        let event = KeyEvent::from_input_event(orig_event)?;
        let seconds = self.dispatcher.dispatch(&event)??;
        self.stats.record(seconds);
        Some(seconds)
    }
}

pub(super) struct HoldMonitor {
    device: Device,
    session: HoldSession,
    last_stats_printed: Instant,
}

impl HoldMonitor {
    pub(super) fn new(device: Device, timer: KeyHoldTimer<Box<dyn DurationSink>>) -> Self {
        Self {
            device,
            session: HoldSession::new(timer),
            last_stats_printed: Instant::now(),
        }
    }

    pub(super) fn block(&mut self) -> anyhow::Result<()> {
        info!(
            "Listening for {:?}; press and release it to measure the hold",
            self.session.key()
        );

        loop {
            self.process_event_batch()?;
        }
    }

    fn process_event_batch(&mut self) -> anyhow::Result<()> {
        let mut reported = false;
        for orig_event in self.device.fetch_events()? {
            reported |= self.session.handle_input_event(&orig_event).is_some();
        }

        if reported {
            self.print_stats();
        }
        Ok(())
    }

    fn print_stats(&mut self) {
        if self.last_stats_printed.elapsed() < STATS_INTERVAL {
            return;
        }
        self.last_stats_printed = Instant::now();

        if let Some(summary) = self.session.stats().summary() {
            info!("{summary}");
        }
    }
}
