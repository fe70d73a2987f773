use anyhow::Context;
use log::debug;

use crate::cmd::{Cli, Command};
use crate::device_wrapper::DeviceWrapper;
use crate::display::{DevicePrinter, DisplayOpts};
use crate::traits::Execute;

impl Execute for Cli {
    fn execute(self) -> anyhow::Result<()> {
        self.command.execute()
    }
}

impl Execute for Command {
    fn execute(self) -> anyhow::Result<()> {
        match self {
            cmd @ Command::List { .. } => {
                let mut stdout = std::io::stdout();
                let display_opts = DisplayOpts::try_from(cmd)?;

                for device in DeviceWrapper::list_wrapped_devices() {
                    DevicePrinter::new(&device, &display_opts).print(&mut stdout)?;
                }
            }
            Command::Measure {
                key,
                filters,
                index,
                output,
            } => {
                let index = index.unwrap_or_default();
                let device_wrapper = DeviceWrapper::list_wrapped_devices()
                    .into_iter()
                    .filter(|device_wrapper| device_wrapper.matches(&filters))
                    .filter(|device_wrapper| {
                        let supported = device_wrapper.supports_key(key);
                        if !supported {
                            debug!("Skipping {}: no {key:?}", device_wrapper.name());
                        }
                        supported
                    })
                    .nth(index)
                    .with_context(|| "No device found for given filters")?;

                let mut monitor = device_wrapper.into_hold_monitor(key, output.build());
                monitor.block()?;
            }
        }

        Ok(())
    }
}
