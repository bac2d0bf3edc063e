use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Command;
use log::{debug, info};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("no supported terminal emulator found on PATH")]
    NoTerminal,

    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Unix,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Unix
        }
    }
}

/// Terminal emulators tried on Linux and the BSDs, in order of preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnixTerminal {
    Gnome,
    Konsole,
    Xfce,
    Xterm,
}

impl UnixTerminal {
    pub const ALL: [UnixTerminal; 4] = [
        UnixTerminal::Gnome,
        UnixTerminal::Konsole,
        UnixTerminal::Xfce,
        UnixTerminal::Xterm,
    ];

    pub fn program(&self) -> &'static str {
        match self {
            UnixTerminal::Gnome => "gnome-terminal",
            UnixTerminal::Konsole => "konsole",
            UnixTerminal::Xfce => "xfce4-terminal",
            UnixTerminal::Xterm => "xterm",
        }
    }

    fn title_args(&self, title: &str) -> Vec<String> {
        match self {
            UnixTerminal::Gnome | UnixTerminal::Xfce => vec!["--title".to_string(), title.to_string()],
            UnixTerminal::Konsole => vec!["-p".to_string(), format!("tabtitle={}", title)],
            UnixTerminal::Xterm => vec!["-T".to_string(), title.to_string()],
        }
    }
}

/// A process to spawn, kept as plain data until launch time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    pub program: String,
    pub args: Vec<String>,
    /// Arguments are already quoted for `cmd.exe` and must not be re-escaped.
    pub raw_args: bool,
}

impl LaunchCommand {
    fn new(program: &str, args: Vec<String>) -> Self {
        Self {
            program: program.to_string(),
            args,
            raw_args: false,
        }
    }

    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        if self.raw_args {
            add_raw_args(&mut cmd, &self.args);
        } else {
            cmd.args(&self.args);
        }
        cmd
    }
}

#[cfg(windows)]
fn add_raw_args(cmd: &mut Command, args: &[String]) {
    use std::os::windows::process::CommandExt;
    for arg in args {
        cmd.raw_arg(arg);
    }
}

#[cfg(not(windows))]
fn add_raw_args(cmd: &mut Command, args: &[String]) {
    cmd.args(args);
}

/// Opens a new interactive shell window with a given title.
pub struct TerminalLauncher {
    platform: Platform,
    search_path: Option<OsString>,
}

impl Default for TerminalLauncher {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalLauncher {
    pub fn new() -> Self {
        Self {
            platform: Platform::current(),
            search_path: std::env::var_os("PATH"),
        }
    }

    pub fn for_platform(platform: Platform, search_path: Option<OsString>) -> Self {
        Self { platform, search_path }
    }

    /// Build the spawn command without running it. The title is passed through as-is.
    pub fn command(&self, title: &str) -> Result<LaunchCommand, LaunchError> {
        match self.platform {
            Platform::Windows => Ok(LaunchCommand {
                program: "cmd".to_string(),
                args: vec![
                    "/C".to_string(),
                    "start".to_string(),
                    format!("\"{}\"", title),
                    "cmd".to_string(),
                    "/K".to_string(),
                    "title".to_string(),
                    title.to_string(),
                ],
                raw_args: true,
            }),
            Platform::MacOs => {
                let script = format!(
                    "tell application \"Terminal\" to do script \"{}\"",
                    applescript_escape(&format!("printf '\\033]0;%s\\007' {}", shell_quote(title)))
                );
                Ok(LaunchCommand::new(
                    "osascript",
                    vec![
                        "-e".to_string(),
                        script,
                        "-e".to_string(),
                        "tell application \"Terminal\" to activate".to_string(),
                    ],
                ))
            }
            Platform::Unix => {
                let terminal = self.detect_unix_terminal().ok_or(LaunchError::NoTerminal)?;
                debug!("Using {} for new terminal window", terminal.program());
                Ok(LaunchCommand::new(terminal.program(), terminal.title_args(title)))
            }
        }
    }

    pub fn launch(&self, title: &str) -> Result<(), LaunchError> {
        let plan = self.command(title)?;
        info!("Opening terminal window \"{}\" via {}", title, plan.program);

        plan.to_command()
            .spawn()
            .map(|_| ())
            .map_err(|source| LaunchError::Spawn {
                program: plan.program.clone(),
                source,
            })
    }

    fn detect_unix_terminal(&self) -> Option<UnixTerminal> {
        let search_path = self.search_path.as_deref()?;
        UnixTerminal::ALL
            .into_iter()
            .find(|terminal| find_in_path(terminal.program(), search_path).is_some())
    }
}

fn find_in_path(program: &str, search_path: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(search_path)
        .map(|dir| dir.join(program))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}

fn applescript_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
