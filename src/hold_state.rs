use std::time::{SystemTime, UNIX_EPOCH};

/// Press timestamp of the designated key; `None` while the key is up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(super) struct HoldState {
    press_start: Option<SystemTime>,
}

impl HoldState {
    #[cfg(test)]
    pub(super) fn is_held(&self) -> bool {
        self.press_start.is_some()
    }

    #[cfg(test)]
    pub(super) fn press_start(&self) -> Option<SystemTime> {
        self.press_start
    }

    /// Arms the state unless it is already armed. Returns `true` on Idle -> Held.
    pub(super) fn press(&mut self, now: SystemTime) -> bool {
        if self.press_start.is_some() {
            return false;
        }
        self.press_start = Some(now);
        true
    }

    /// Clears the state, returning the press timestamp.
    /// `None` when there was no press to release.
    pub(super) fn release(&mut self) -> Option<SystemTime> {
        self.press_start.take()
    }
}

/// Whole milliseconds since the Unix epoch; timestamps before it count as zero.
pub(super) fn epoch_millis(ts: SystemTime) -> u128 {
    ts.duration_since(UNIX_EPOCH)
        .map(|since| since.as_millis())
        .unwrap_or_default()
}
