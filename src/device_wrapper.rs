use std::cmp::Ordering;
use std::path::PathBuf;

use evdev::{Device, KeyCode};
use log::info;

use crate::cmd::DeviceFilters;
use crate::hold_monitor::HoldMonitor;
use crate::key_hold_timer::KeyHoldTimer;
use crate::sink::DurationSink;

pub(super) struct DeviceWrapper {
    pub(super) path: PathBuf,
    pub(super) device: Device,
}

impl DeviceWrapper {
    pub(super) fn name(&self) -> &str {
        self.device.name().unwrap_or("Unnamed device")
    }

    fn get_ordering_key(&self) -> (u16, u16, u16, u16, &str, &PathBuf) {
        let id = self.device.input_id();
        (
            id.bus_type().0,
            id.vendor(),
            id.product(),
            id.version(),
            self.name(),
            &self.path,
        )
    }

    pub(super) fn supports_key(&self, key: KeyCode) -> bool {
        self.device
            .supported_keys()
            .is_some_and(|keys| keys.contains(key))
    }

    pub(super) fn matches(&self, filters: &DeviceFilters) -> bool {
        filters.matches(
            &self.path.display().to_string(),
            self.device.name().unwrap_or_default(),
            self.device.physical_path().unwrap_or_default(),
        )
    }

    pub(super) fn into_hold_monitor(
        self,
        key: KeyCode,
        sink: Box<dyn DurationSink>,
    ) -> HoldMonitor {
        info!(
            "Watching {key:?} on {}; path: {:?}",
            self.name(),
            self.path
        );
        HoldMonitor::new(self.device, KeyHoldTimer::new(key, sink))
    }

    pub(super) fn list_wrapped_devices() -> Vec<DeviceWrapper> {
        let mut devices = evdev::enumerate().map(DeviceWrapper::from).collect::<Vec<_>>();
        devices.sort_unstable();
        devices
    }
}

impl From<(PathBuf, Device)> for DeviceWrapper {
    fn from((path, device): (PathBuf, Device)) -> Self {
        Self { path, device }
    }
}

impl PartialEq<Self> for DeviceWrapper {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for DeviceWrapper {}

impl PartialOrd<Self> for DeviceWrapper {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DeviceWrapper {
    fn cmp(&self, other: &Self) -> Ordering {
        self.get_ordering_key().cmp(&other.get_ordering_key())
    }
}
