use std::time::SystemTime;

use evdev::KeyCode;
use log::{debug, warn};

use crate::hold_state::{epoch_millis, HoldState};
use crate::sink::DurationSink;
use crate::trigger::{KeyEvent, Trigger, TriggerHandler};

/// Measures how long `key` stays down, once per press-release cycle.
pub(super) struct KeyHoldTimer<S> {
    key: KeyCode,
    state: HoldState,
    sink: S,
}

impl<S: DurationSink> KeyHoldTimer<S> {
    pub(super) fn new(key: KeyCode, sink: S) -> Self {
        Self {
            key,
            state: HoldState::default(),
            sink,
        }
    }

    pub(super) fn key(&self) -> KeyCode {
        self.key
    }

    #[cfg(test)]
    pub(super) fn state(&self) -> &HoldState {
        &self.state
    }

    #[cfg(test)]
    pub(super) fn sink(&self) -> &S {
        &self.sink
    }

    /// Idle -> Held. Autorepeat and duplicate presses keep the first timestamp.
    pub(super) fn on_key_down(&mut self, key: KeyCode, now: SystemTime) {
        if key != self.key {
            return;
        }
        if !self.state.press(now) {
            debug!("{key:?} is already held; ignoring repeated press");
        }
    }

    /// Held -> Idle, reporting the hold in seconds. A release without a press reports nothing.
    pub(super) fn on_key_up(&mut self, key: KeyCode, now: SystemTime) -> Option<f64> {
        if key != self.key {
            return None;
        }

        let Some(start) = self.state.release() else {
            debug!("{key:?} released without a press; nothing to report");
            return None;
        };

        let (start_millis, now_millis) = (epoch_millis(start), epoch_millis(now));
        let millis = match now_millis.checked_sub(start_millis) {
            Some(millis) => millis,
            None => {
                warn!(
                    "Clock drift detected; release of {key:?} is {}ms before its press, reporting a zero hold",
                    start_millis - now_millis
                );
                0
            }
        };

        let seconds = millis as f64 / 1000.0;
        self.sink.report(key, seconds);
        Some(seconds)
    }
}

impl<S: DurationSink> TriggerHandler for KeyHoldTimer<S> {
    type Output = Option<f64>;

    fn handle(&mut self, event: &KeyEvent) -> Self::Output {
        match event.trigger {
            Trigger::KeyDown => {
                self.on_key_down(event.key, event.timestamp);
                None
            }
            Trigger::KeyUp => self.on_key_up(event.key, event.timestamp),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, UNIX_EPOCH};

    use super::*;
    use crate::sink::RecordingSink;

    const SPACE: KeyCode = KeyCode::KEY_SPACE;

    fn at(millis: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_millis(millis)
    }

    fn timer() -> KeyHoldTimer<RecordingSink> {
        KeyHoldTimer::new(SPACE, RecordingSink::default())
    }

    fn reported(timer: &KeyHoldTimer<RecordingSink>) -> Vec<f64> {
        timer.sink().reports.iter().map(|(_, seconds)| *seconds).collect()
    }

    #[test]
    fn press_then_release_reports_seconds() {
        let mut timer = timer();
        timer.on_key_down(SPACE, at(0));
        assert_eq!(timer.on_key_up(SPACE, at(1500)), Some(1.5));
        assert_eq!(timer.sink().reports, vec![(SPACE, 1.5)]);
    }

    #[test]
    fn duplicate_press_measures_from_first_press() {
        let mut timer = timer();
        timer.on_key_down(SPACE, at(0));
        timer.on_key_down(SPACE, at(800));
        timer.on_key_up(SPACE, at(2000));
        assert_eq!(reported(&timer), vec![2.0]);
    }

    #[test]
    fn release_without_press_reports_nothing() {
        let mut timer = timer();
        assert_eq!(timer.on_key_up(SPACE, at(1000)), None);
        assert!(reported(&timer).is_empty());
        assert!(!timer.state().is_held());
    }

    #[test]
    fn same_tick_release_reports_zero() {
        let mut timer = timer();
        timer.on_key_down(SPACE, at(0));
        timer.on_key_up(SPACE, at(0));
        assert_eq!(reported(&timer), vec![0.0]);
    }

    #[test]
    fn release_before_press_timestamp_clamps_to_zero() {
        let mut timer = timer();
        timer.on_key_down(SPACE, at(5000));
        let seconds = timer.on_key_up(SPACE, at(4000)).unwrap();
        assert_eq!(seconds, 0.0);
        assert!(!timer.state().is_held());
    }

    #[test]
    fn timestamps_are_floored_to_milliseconds_before_subtracting() {
        let mut timer = timer();
        timer.on_key_down(SPACE, UNIX_EPOCH + Duration::from_micros(1_000_600));
        timer.on_key_up(SPACE, UNIX_EPOCH + Duration::from_micros(2_500_400));
        assert_eq!(reported(&timer), vec![1.5]);
    }

    #[test]
    fn sub_millisecond_hold_in_same_millisecond_is_zero() {
        let mut timer = timer();
        timer.on_key_down(SPACE, UNIX_EPOCH + Duration::from_micros(7_100));
        timer.on_key_up(SPACE, UNIX_EPOCH + Duration::from_micros(7_900));
        assert_eq!(reported(&timer), vec![0.0]);
    }

    #[test]
    fn cycle_returns_to_idle_and_repeats() {
        let mut timer = timer();
        timer.on_key_down(SPACE, at(0));
        timer.on_key_up(SPACE, at(300));
        assert_eq!(timer.state(), &HoldState::default());

        timer.on_key_down(SPACE, at(1000));
        timer.on_key_up(SPACE, at(1300));
        timer.on_key_up(SPACE, at(1400));
        assert_eq!(reported(&timer), vec![0.3, 0.3]);
    }

    #[test]
    fn other_keys_are_ignored() {
        let mut timer = timer();
        timer.on_key_down(KeyCode::KEY_A, at(0));
        assert!(!timer.state().is_held());

        timer.on_key_down(SPACE, at(0));
        assert_eq!(timer.on_key_up(KeyCode::KEY_A, at(100)), None);
        assert!(timer.state().is_held());

        timer.on_key_up(SPACE, at(250));
        assert_eq!(reported(&timer), vec![0.25]);
    }

    #[test]
    fn reported_durations_are_never_negative() {
        let mut timer = timer();
        let events = [
            (true, 40),
            (false, 10),
            (false, 20),
            (true, 30),
            (true, 35),
            (false, 30),
            (true, 90),
            (false, 60),
        ];
        for (down, millis) in events {
            if down {
                timer.on_key_down(SPACE, at(millis));
            } else {
                timer.on_key_up(SPACE, at(millis));
            }
        }
        let reports = reported(&timer);
        assert_eq!(reports.len(), 3);
        assert!(reports.iter().all(|seconds| *seconds >= 0.0 && !seconds.is_nan()));
    }
}
