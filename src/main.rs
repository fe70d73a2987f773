use clap::Parser;
use env_logger::Env;

use crate::cmd::Cli;
use crate::traits::Execute;

mod cmd;
mod device_wrapper;
mod display;
mod execute;
mod hold_monitor;
mod hold_state;
mod key_hold_timer;
mod sink;
mod traits;
mod trigger;

fn main() -> anyhow::Result<()> {
    let env = Env::default()
        .filter_or("KEYHOLD_LOG_LEVEL", "info")
        .write_style_or("KEYHOLD_LOG_STYLE", "auto");

    env_logger::init_from_env(env);

    Cli::parse().execute()
}
