//! Live microphone transcription demo. Models resolve from local paths or
//! built-in language packs; see `voxlive-hub` for remote hub support.

use std::process;

use clap::Parser;

use voxlive_cli::app;
use voxlive_cli::args::Cli;

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = app::run(cli, None) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
