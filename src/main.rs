//! Shipwright - command-line tool for building and releasing script libraries

use std::process::ExitCode;

use shipwright::cli;

fn main() -> ExitCode {
    cli::run()
}
