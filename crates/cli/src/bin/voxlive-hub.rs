//! Live microphone transcription demo with remote model resolution: `-m`
//! additionally accepts a Hugging Face repository, optionally suffixed with
//! `:file` to pick one of several archives.

use std::process;

use clap::Parser;

use voxlive_cli::app;
use voxlive_cli::args::Cli;
use voxlive_core::model::HuggingFaceHub;

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = app::run(cli, Some(Box::new(HuggingFaceHub::new()))) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
