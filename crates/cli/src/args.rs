use clap::Parser;

/// Live microphone transcription with a terminal dashboard.
#[derive(Debug, Parser)]
#[command(version)]
pub struct Cli {
    /// List available audio input devices and exit.
    #[arg(short = 'l', long)]
    pub list_devices: bool,

    /// Input device (numeric ID or name substring).
    #[arg(short, long)]
    pub device: Option<String>,

    /// Sampling rate in Hz (defaults to the selected device's rate).
    #[arg(short = 'r', long)]
    pub samplerate: Option<u32>,

    /// Model: a directory path, a language pack (e.g. en-us, fr, nl), or a
    /// hub repository `repo[:file]` (voxlive-hub only). Default: en-us.
    #[arg(short, long)]
    pub model: Option<String>,
}
