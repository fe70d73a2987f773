use std::time::SystemTime;

use evdev::{EventSummary, InputEvent, KeyCode};
use log::{debug, warn};

use crate::key_hold_timer::KeyHoldTimer;
use crate::sink::DurationSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Trigger {
    KeyDown,
    KeyUp,
}

impl Trigger {
    /// evdev key values: 0 is release, 1 is press, 2 is autorepeat.
    pub(super) fn from_value(value: i32) -> Option<Self> {
        match value {
            0 => Some(Trigger::KeyUp),
            1 | 2 => Some(Trigger::KeyDown),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct KeyEvent {
    pub(super) key: KeyCode,
    pub(super) trigger: Trigger,
    pub(super) timestamp: SystemTime,
}

impl KeyEvent {
    pub(super) fn from_parts(key: KeyCode, value: i32, timestamp: SystemTime) -> Option<Self> {
        let Some(trigger) = Trigger::from_value(value) else {
            warn!("Unknown key value {value} for {key:?}; skipping");
            return None;
        };
        Some(Self {
            key,
            trigger,
            timestamp,
        })
    }

    pub(super) fn from_input_event(event: &InputEvent) -> Option<Self> {
        match event.destructure() {
            EventSummary::Key(_, key_code, value) => {
                Self::from_parts(key_code, value, event.timestamp())
            }
            // sync and misc events carry no key state
            _ => None,
        }
    }
}

pub(super) trait TriggerHandler {
    type Output;

    fn handle(&mut self, event: &KeyEvent) -> Self::Output;
}

/// Delivers key events to a handler for the registered key/trigger pairs only.
pub(super) struct TriggerDispatcher<H> {
    bindings: Vec<(KeyCode, Trigger)>,
    handler: H,
}

impl<H: TriggerHandler> TriggerDispatcher<H> {
    pub(super) fn new(handler: H) -> Self {
        Self {
            bindings: Vec::new(),
            handler,
        }
    }

    pub(super) fn register(&mut self, key: KeyCode, trigger: Trigger) -> &mut Self {
        if self.bindings.contains(&(key, trigger)) {
            warn!("{trigger:?} on {key:?} is already registered");
        } else {
            self.bindings.push((key, trigger));
        }
        self
    }

    #[cfg(test)]
    pub(super) fn bindings(&self) -> &[(KeyCode, Trigger)] {
        &self.bindings
    }

    pub(super) fn handler(&self) -> &H {
        &self.handler
    }

    /// `None` when no binding matched and the handler was not invoked.
    pub(super) fn dispatch(&mut self, event: &KeyEvent) -> Option<H::Output> {
        if !self.bindings.contains(&(event.key, event.trigger)) {
            return None;
        }
        debug!("Dispatching {:?} on {:?}", event.trigger, event.key);
        Some(self.handler.handle(event))
    }
}

impl<S: DurationSink> TriggerDispatcher<KeyHoldTimer<S>> {
    pub(super) fn for_timer(timer: KeyHoldTimer<S>) -> Self {
        let key = timer.key();
        let mut dispatcher = Self::new(timer);
        dispatcher
            .register(key, Trigger::KeyDown)
            .register(key, Trigger::KeyUp);
        dispatcher
    }
}
