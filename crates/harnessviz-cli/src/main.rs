//! Harnessviz CLI - validate harness descriptions, export BOMs and node markup

mod cli;

use clap::Parser;

fn main() {
    let cli_args = cli::Cli::parse();

    let app = cli::HarnessvizApp::new();

    if let Err(e) = app.run(cli_args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
