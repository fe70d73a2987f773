use std::str::FromStr;

use colored::Colorize;
use evdev::KeyCode;
use log::info;

/// Receives every measured hold duration, in seconds.
pub(super) trait DurationSink {
    fn report(&mut self, key: KeyCode, seconds: f64);
}

impl<S: DurationSink + ?Sized> DurationSink for Box<S> {
    fn report(&mut self, key: KeyCode, seconds: f64) {
        (**self).report(key, seconds)
    }
}

pub(super) struct LogSink;

impl DurationSink for LogSink {
    fn report(&mut self, key: KeyCode, seconds: f64) {
        info!("Hold duration of {key:?}: {seconds} s");
    }
}

pub(super) struct StdoutSink<W: std::io::Write> {
    out: W,
}

impl StdoutSink<std::io::Stdout> {
    pub(super) fn stdout() -> Self {
        Self {
            out: std::io::stdout(),
        }
    }
}

impl<W: std::io::Write> StdoutSink<W> {
    #[cfg(test)]
    pub(super) fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub(super) fn into_inner(self) -> W {
        self.out
    }
}

impl<W: std::io::Write> DurationSink for StdoutSink<W> {
    fn report(&mut self, key: KeyCode, seconds: f64) {
        let line = format!(
            "{} {}",
            format!("{key:?}").bold().blue(),
            format!("{seconds:.3}s").magenta()
        );
        // a closed stdout must not kill the event loop
        if let Err(err) = writeln!(self.out, "{line}").and_then(|_| self.out.flush()) {
            log::error!("Failed to write hold duration: {err}");
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(super) enum OutputKind {
    Log,
    #[default]
    Stdout,
}

impl OutputKind {
    pub(super) fn build(self) -> Box<dyn DurationSink> {
        match self {
            OutputKind::Log => Box::new(LogSink),
            OutputKind::Stdout => Box::new(StdoutSink::stdout()),
        }
    }
}

impl FromStr for OutputKind {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "log" => Ok(OutputKind::Log),
            "stdout" => Ok(OutputKind::Stdout),
            _ => Err(format!("Invalid output {raw}: expected `log` or `stdout`")),
        }
    }
}

#[cfg(test)]
#[derive(Debug, Default)]
pub(super) struct RecordingSink {
    pub(super) reports: Vec<(KeyCode, f64)>,
}

#[cfg(test)]
impl DurationSink for RecordingSink {
    fn report(&mut self, key: KeyCode, seconds: f64) {
        self.reports.push((key, seconds));
    }
}
