//! Command layer: parses input lines and renders session results as text.

mod command;
mod content_reader;
mod shell;

pub use command::{Command, CommandError};
pub use shell::{Shell, ShellError};
