use colored::*;
use coderefactor::cli;
use coderefactor::observability::install_panic_hook;
use std::process::ExitCode;

fn main() -> ExitCode {
    install_panic_hook();

    let args = cli::parse_args();
    cli::init_logging(args.verbosity);

    match cli::handle_refactor_command(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
