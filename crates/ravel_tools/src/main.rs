use clap::Parser;

use ravel_tools::cli::Cli;

fn main() {
    // clap exits with code 2 on usage errors, matching EXIT_USAGE.
    let cli = Cli::parse();
    std::process::exit(ravel_tools::run(&cli));
}
