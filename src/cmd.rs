use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use evdev::KeyCode;

use crate::sink::OutputKind;

/// Measures how long a key is held on an input device.
#[derive(Parser, Debug)]
#[command(author, version, about)]
#[command(propagate_version = true)]
pub(super) struct Cli {
    #[command(subcommand)]
    pub(super) command: Command,
}

#[derive(Subcommand, Debug)]
pub(super) enum Command {
    /// List all input devices
    List {
        /// Show path to input
        #[arg(short, long, default_value = "true")]
        path: bool,

        /// Show physical path
        #[arg(short = 'y', long, default_value = "true")]
        physical_path: bool,

        /// Show name
        #[arg(short, long, default_value = "false")]
        name: bool,

        /// Show bus, vendor, product, version
        #[arg(short, long, default_value = "false")]
        id: bool,

        /// Show all supported keys
        #[arg(short, long, default_value = "false")]
        keys: bool,

        /// Show everything
        #[arg(short, long, default_value = "false")]
        all: bool,

        /// Mark whether each device supports this key code
        #[arg(long, value_parser = parse_key_code)]
        key: Option<KeyCode>,
    },

    /// Watch a device and report how long the key is held
    Measure {
        /// Key code to measure; 57 is the space bar
        #[arg(long, env = "KEYHOLD_KEY", default_value = "57", value_parser = parse_key_code)]
        key: KeyCode,

        #[command(flatten)]
        filters: DeviceFilters,

        /// Take the device with this index after applying all filters
        #[arg(short = 'i', long)]
        index: Option<usize>,

        /// Where hold durations go: `stdout` or `log`
        #[arg(short, long, env = "KEYHOLD_OUTPUT", default_value = "stdout")]
        output: OutputKind,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub(super) struct DeviceFilters {
    /// Filter devices by name (repeatable)
    #[arg(short, long, value_parser = parse_filter)]
    pub(super) name: Vec<Filter>,

    /// Filter devices by path (repeatable)
    #[arg(short, long, value_parser = parse_filter)]
    pub(super) path: Vec<Filter>,

    /// Filter devices by physical path (repeatable)
    #[arg(short = 'y', long, value_parser = parse_filter)]
    pub(super) physical_path: Vec<Filter>,
}

impl DeviceFilters {
    pub(super) fn matches(&self, path: &str, name: &str, physical_path: &str) -> bool {
        self.path.iter().all(|filter| filter.matches(path))
            && self.name.iter().all(|filter| filter.matches(name))
            && self
                .physical_path
                .iter()
                .all(|filter| filter.matches(physical_path))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Filter {
    StartsWith(Arc<String>),
    Equals(Arc<String>),
    Contains(Arc<String>),
    EndsWith(Arc<String>),
}

impl Filter {
    pub(super) fn matches(&self, raw: impl AsRef<str>) -> bool {
        let raw = raw.as_ref();
        match self {
            Filter::StartsWith(filter) => raw.starts_with(filter.as_str()),
            Filter::Equals(filter) => raw == filter.as_str(),
            Filter::Contains(filter) => raw.contains(filter.as_str()),
            Filter::EndsWith(filter) => raw.ends_with(filter.as_str()),
        }
    }
}

fn parse_key_code(raw: &str) -> Result<KeyCode, String> {
    raw.trim()
        .parse::<u16>()
        .map(KeyCode::new)
        .map_err(|err| format!("Invalid key code {raw}: {err}"))
}

fn parse_filter(raw: &str) -> Result<Filter, String> {
    if let Some(raw) = raw.strip_prefix("s:") {
        Ok(Filter::StartsWith(Arc::new(raw.to_string())))
    } else if let Some(raw) = raw.strip_prefix("e:") {
        Ok(Filter::EndsWith(Arc::new(raw.to_string())))
    } else if let Some(raw) = raw.strip_prefix("c:") {
        Ok(Filter::Contains(Arc::new(raw.to_string())))
    } else {
        Ok(Filter::Equals(Arc::new(raw.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(raw: &str) -> Filter {
        parse_filter(raw).unwrap()
    }

    #[test]
    fn parses_filter_prefixes() {
        assert_eq!(filter("s:/dev"), Filter::StartsWith(Arc::new("/dev".into())));
        assert_eq!(filter("e:kbd"), Filter::EndsWith(Arc::new("kbd".into())));
        assert_eq!(filter("c:Keyboard"), Filter::Contains(Arc::new("Keyboard".into())));
        assert_eq!(filter("x:raw"), Filter::Equals(Arc::new("x:raw".into())));
    }

    #[test]
    fn filter_matching() {
        assert!(filter("s:/dev/input").matches("/dev/input/event3"));
        assert!(filter("e:event3").matches("/dev/input/event3"));
        assert!(filter("c:Key").matches("AT Translated Set 2 Keyboard"));
        assert!(!filter("Keyboard").matches("AT Translated Set 2 Keyboard"));
    }

    #[test]
    fn all_filters_must_match() {
        let filters = DeviceFilters {
            name: vec![filter("c:Keyboard")],
            path: vec![filter("s:/dev/input")],
            physical_path: vec![],
        };
        assert!(filters.matches("/dev/input/event3", "USB Keyboard", "usb-1/input0"));
        assert!(!filters.matches("/tmp/event3", "USB Keyboard", "usb-1/input0"));
        assert!(!filters.matches("/dev/input/event4", "Mouse", ""));
        assert!(DeviceFilters::default().matches("", "", ""));
    }

    #[test]
    fn parses_key_codes() {
        assert_eq!(parse_key_code("57"), Ok(KeyCode::KEY_SPACE));
        assert_eq!(parse_key_code(" 28 "), Ok(KeyCode::KEY_ENTER));
        assert!(parse_key_code("space").is_err());
        assert!(parse_key_code("-1").is_err());
    }

    #[test]
    fn measure_defaults_to_space_and_stdout() {
        let cli = Cli::try_parse_from(["keyhold", "measure", "-n", "c:Keyboard"]).unwrap();
        match cli.command {
            Command::Measure {
                key,
                filters,
                index,
                output,
            } => {
                assert_eq!(key, KeyCode::KEY_SPACE);
                assert_eq!(filters.name, vec![filter("c:Keyboard")]);
                assert_eq!(index, None);
                assert_eq!(output, OutputKind::Stdout);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn measure_accepts_key_and_output() {
        let cli = Cli::try_parse_from(["keyhold", "measure", "--key", "30", "-o", "log", "-i", "2"])
            .unwrap();
        let Command::Measure {
            key, index, output, ..
        } = cli.command
        else {
            panic!("expected measure");
        };
        assert_eq!(key, KeyCode::KEY_A);
        assert_eq!(index, Some(2));
        assert_eq!(output, OutputKind::Log);
    }
}
