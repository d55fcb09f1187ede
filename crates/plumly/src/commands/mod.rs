//! Command dispatch: bridges CLI args -> platform operations -> output.

pub mod config_cmd;
pub mod devices;
pub mod discover;
pub mod level;
pub mod util;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a network-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Discover(args) => discover::handle(args, global).await,
        Command::Devices(args) => devices::handle(args, global).await,
        Command::Level(args) => level::handle(args, global).await,
        Command::On(target) => level::handle_switch(&target, true, global).await,
        Command::Off(target) => level::handle_switch(&target, false, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
