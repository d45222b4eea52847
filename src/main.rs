use std::process::ExitCode;

use arc_sieve::cli;

fn main() -> ExitCode {
    cli::run()
}
