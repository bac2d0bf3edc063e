pub mod terminal;

pub use terminal::{LaunchCommand, LaunchError, Platform, TerminalLauncher, UnixTerminal};
