use std::process::ExitCode;
use filecheck::cli;
use log::info;

fn main() -> ExitCode {
    let args = match cli::parse_or_exit::<cli::Args>() {
        Ok(args) => args,
        Err(code) => return code,
    };

    cli::init_logging(args.verbose, args.quiet);
    info!("Starting filecheck v{}", env!("CARGO_PKG_VERSION"));

    cli::run(args)
}
