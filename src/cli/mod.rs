use clap::builder::ValueParser;
use clap::error::ErrorKind;
use clap::Parser;
use anyhow::{Result, Context};
use colored::*;
use log::{debug, info, LevelFilter};
use std::ffi::OsString;
use std::io::{IsTerminal, Write};
use std::process::ExitCode;

use crate::launcher::TerminalLauncher;
use crate::scanner::{ScanError, ScanRequest, Scanner};
use crate::ui::Reporter;

pub const EXIT_OK: u8 = 0;
pub const EXIT_USAGE: u8 = 1;
pub const EXIT_INVALID_INPUT: u8 = 2;
pub const EXIT_PERMISSION: u8 = 3;
pub const EXIT_IO: u8 = 4;
pub const EXIT_LAUNCH_FAILED: u8 = 2;

#[derive(Parser, Debug, Clone)]
#[command(name = "filecheck")]
#[command(version, about = "Report source files in a folder by extension", long_about = None)]
pub struct Args {
    /// Folder to scan
    #[arg(value_name = "FOLDER", value_parser = ValueParser::os_string())]
    pub folder: OsString,

    /// Descend into subfolders
    #[arg(short, long)]
    pub recursive: bool,

    /// Print matches in file-name order
    #[arg(long)]
    pub sorted: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet mode (suppress log output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable coloured warnings and errors
    #[arg(long)]
    pub no_color: bool,
}

impl Args {
    pub fn request(&self) -> ScanRequest {
        ScanRequest::new(&self.folder)
            .recursive(self.recursive)
            .sorted(self.sorted)
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "open-terminal")]
#[command(version, about = "Open a new terminal window with a custom title", long_about = None)]
pub struct TerminalArgs {
    /// Window title, passed through unchanged
    #[arg(value_name = "TERMINAL NAME")]
    pub title: String,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parse the command line, mapping usage mistakes to exit code 1.
///
/// `--help` and `--version` print and yield a successful exit code instead of args.
pub fn parse_or_exit<P: Parser>() -> Result<P, ExitCode> {
    P::try_parse().map_err(|e| {
        let _ = e.print();
        match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
            _ => ExitCode::from(EXIT_USAGE),
        }
    })
}

pub fn init_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        LevelFilter::Off
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let _ = env_logger::Builder::new()
        .filter_level(level)
        .format_target(false)
        .try_init();
}

/// Warnings and errors go to stderr, so colour follows stderr rather than stdout.
pub fn color_enabled(no_color: bool, stderr_is_terminal: bool) -> bool {
    !no_color && stderr_is_terminal
}

pub fn run(args: Args) -> ExitCode {
    if !color_enabled(args.no_color, std::io::stderr().is_terminal()) {
        colored::control::set_override(false);
    }

    let mut reporter = Reporter::stdio();
    let outcome = scan(&args.request(), &Scanner::new(), &mut reporter)
        .and_then(|code| {
            reporter.flush().context("Failed to flush output")?;
            Ok(code)
        });
    ExitCode::from(outcome_code(outcome))
}

/// Exit code for a finished scan. Failing to write output is reported once and gets its own code.
pub fn outcome_code(outcome: Result<u8>) -> u8 {
    match outcome {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            EXIT_IO
        }
    }
}

/// Drive one scan to completion, printing as results arrive. Returns the exit code.
pub fn scan<S, O, E>(
    request: &ScanRequest,
    scanner: &Scanner<'_, S>,
    reporter: &mut Reporter<O, E>,
) -> Result<u8>
where
    S: crate::scanner::FileSource,
    O: Write,
    E: Write,
{
    let results = match scanner.scan(request) {
        Ok(results) => results,
        Err(e) => {
            reporter.error(&e).context("Failed to write error")?;
            return Ok(exit_code_for(&e));
        }
    };

    for result in results {
        match result {
            Ok(hit) => reporter.matched(&hit).context("Failed to write match")?,
            Err(e) if e.is_fatal() => {
                reporter.error(&e).context("Failed to write error")?;
                return Ok(exit_code_for(&e));
            }
            Err(e) => reporter.warning(&e).context("Failed to write warning")?,
        }
    }

    let summary = reporter.summary();
    info!("{} file(s) matched in {}", summary.matched, request.root.display());
    debug!("{} file(s) could not be processed", summary.warnings);

    Ok(EXIT_OK)
}

pub fn exit_code_for(error: &ScanError) -> u8 {
    match error {
        ScanError::InvalidInput { .. } => EXIT_INVALID_INPUT,
        ScanError::PermissionDenied { .. } => EXIT_PERMISSION,
        ScanError::PerFile { .. } => EXIT_OK,
    }
}

pub fn run_open_terminal(args: TerminalArgs) -> ExitCode {
    match TerminalLauncher::new().launch(&args.title) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::from(EXIT_LAUNCH_FAILED)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io;
    use tempfile::TempDir;

    /// Writer whose reader went away, like stdout piped into `head`.
    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn run_in(request: &ScanRequest) -> (u8, String, String) {
        colored::control::set_override(false);
        let mut reporter = Reporter::new(Vec::new(), Vec::new());
        let code = scan(request, &Scanner::new(), &mut reporter).unwrap();
        let (out, err) = reporter.into_inner();
        (code, String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
    }

    #[test]
    fn test_args_parse_flag_after_folder() {
        let args = Args::try_parse_from(["filecheck", "src", "--recursive"]).unwrap();
        assert_eq!(args.folder, OsString::from("src"));
        assert!(args.recursive);
        assert!(!args.request().sorted);
    }

    #[test]
    fn test_args_require_folder() {
        let err = Args::try_parse_from(["filecheck"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_scan_prints_matches() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.py"), "print('hi')").unwrap();
        fs::write(dir.path().join("b.txt"), "").unwrap();

        let (code, out, err) = run_in(&ScanRequest::new(dir.path()));
        assert_eq!(code, EXIT_OK);
        assert_eq!(out, format!("{}: This is a python file!\n", dir.path().join("a.py").display()));
        assert!(err.is_empty());
    }

    #[test]
    fn test_missing_folder_exit_code() {
        let dir = TempDir::new().unwrap();
        let (code, out, err) = run_in(&ScanRequest::new(dir.path().join("missing")));

        assert_eq!(code, EXIT_INVALID_INPUT);
        assert!(out.is_empty());
        assert_eq!(err.lines().count(), 1);
        assert!(err.contains("is not a valid directory"));
    }

    #[test]
    fn test_empty_folder_reaches_the_scanner() {
        let args = Args::try_parse_from(["filecheck", ""]).unwrap();
        assert!(args.folder.is_empty());

        let (code, out, err) = run_in(&args.request());
        assert_eq!(code, EXIT_INVALID_INPUT);
        assert!(out.is_empty());
        assert_eq!(err, "error: '' is not a valid directory\n");
    }

    #[test]
    fn test_write_failure_has_its_own_exit_code() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.py"), "").unwrap();

        let mut reporter = Reporter::new(ClosedPipe, Vec::new());
        let outcome = scan(&ScanRequest::new(dir.path()), &Scanner::new(), &mut reporter);
        assert!(outcome.is_err());

        let code = outcome_code(outcome);
        assert_eq!(code, EXIT_IO);
        assert_ne!(code, EXIT_USAGE);
    }

    #[test]
    fn test_colour_follows_stderr() {
        assert!(color_enabled(false, true));
        assert!(!color_enabled(false, false));
        assert!(!color_enabled(true, true));
    }

    #[test]
    fn test_terminal_args() {
        let args = TerminalArgs::try_parse_from(["open-terminal", "Build Logs"]).unwrap();
        assert_eq!(args.title, "Build Logs");
        assert!(TerminalArgs::try_parse_from(["open-terminal"]).is_err());
    }
}
