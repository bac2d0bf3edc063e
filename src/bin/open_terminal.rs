use std::process::ExitCode;
use filecheck::cli;

fn main() -> ExitCode {
    let args = match cli::parse_or_exit::<cli::TerminalArgs>() {
        Ok(args) => args,
        Err(code) => return code,
    };

    cli::init_logging(args.verbose, false);
    cli::run_open_terminal(args)
}
