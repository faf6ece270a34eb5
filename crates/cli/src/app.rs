use std::error::Error;
use std::time::Duration;

use chrono::Local;
use crossbeam_channel::{select, tick, unbounded, Receiver};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};

use voxlive_core::audio::{self, CaptureStream, DeviceSelector, BLOCK_SAMPLES};
use voxlive_core::model::{ModelHub, ModelResolver, DEFAULT_LANGUAGE};
use voxlive_core::transcribe::TranscriptSession;

use crate::args::Cli;
use crate::dashboard::{self, DashboardState, REFRESH_INTERVAL};
use crate::engine::VoskEngine;

/// Shared entry point of both binaries; `voxlive-hub` passes a hub so model
/// identifiers can name remote repositories.
pub fn run(cli: Cli, hub: Option<Box<dyn ModelHub>>) -> Result<(), Box<dyn Error>> {
    if cli.list_devices {
        for info in audio::list_input_devices()? {
            println!(
                "{:>3}: {} ({} ch, {} Hz)",
                info.index, info.name, info.channels, info.default_sample_rate
            );
        }
        return Ok(());
    }

    let selector = match cli.device.as_deref() {
        Some(raw) => DeviceSelector::parse(raw),
        None => DeviceSelector::Default,
    };
    let device = audio::select_input_device(&selector)?;

    let sample_rate = match cli.samplerate {
        Some(rate) => rate,
        None => {
            let rate = audio::default_sample_rate(&device)?;
            println!("Using a sample rate of {rate}");
            rate
        }
    };

    let mut resolver = ModelResolver::new()?.with_progress(Box::new(download_progress));
    if let Some(hub) = hub {
        resolver = resolver.with_hub(hub);
    }
    let model_label = cli
        .model
        .clone()
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
    let model_dir = resolver.resolve(cli.model.as_deref())?;
    eprintln!();

    let engine = VoskEngine::new(&model_dir, sample_rate)?;
    let mut session = TranscriptSession::new(engine);

    // Capture starts only once the model resolved; resolution failures must
    // abort before any audio is read.
    let (block_tx, block_rx) = unbounded::<Vec<i16>>();
    let capture = CaptureStream::open(&device, sample_rate, block_tx)?;
    log::info!("capturing at {} Hz", capture.sample_rate());

    let mut terminal = ratatui::init();
    let outcome = transcribe_loop(
        &mut terminal,
        &mut session,
        &block_rx,
        &model_label,
        sample_rate,
    );
    ratatui::restore();
    drop(capture);
    outcome?;

    println!("\nDone");
    Ok(())
}

/// Drain the frame queue into the session, redraw at the refresh rate, and
/// watch for an interrupt key. Blocks only on the queue and the ticker.
fn transcribe_loop(
    terminal: &mut ratatui::DefaultTerminal,
    session: &mut TranscriptSession<VoskEngine>,
    blocks: &Receiver<Vec<i16>>,
    model_label: &str,
    sample_rate: u32,
) -> Result<(), Box<dyn Error>> {
    let ticker = tick(REFRESH_INTERVAL);
    redraw(terminal, session, model_label, sample_rate)?;

    loop {
        select! {
            recv(blocks) -> block => {
                session.process_block(&block?)?;
            }
            recv(ticker) -> _ => {
                redraw(terminal, session, model_label, sample_rate)?;
                if interrupted()? {
                    return Ok(());
                }
            }
        }
    }
}

fn redraw(
    terminal: &mut ratatui::DefaultTerminal,
    session: &TranscriptSession<VoskEngine>,
    model_label: &str,
    sample_rate: u32,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|frame| {
        let state = DashboardState {
            model_label,
            sample_rate,
            block_samples: BLOCK_SAMPLES,
            sentences: session.log().visible(),
            partial: session.partial(),
            now: Local::now(),
        };
        dashboard::draw(frame, &state);
    })?;
    Ok(())
}

/// The terminal is in raw mode, so Ctrl-C arrives as a key event rather than
/// a signal; q and Esc quit as well.
fn interrupted() -> Result<bool, Box<dyn Error>> {
    while event::poll(Duration::from_secs(0))? {
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            let ctrl_c =
                key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL);
            if ctrl_c || key.code == KeyCode::Char('q') || key.code == KeyCode::Esc {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading model... {pct}%");
    } else {
        eprint!("\rDownloading model... {downloaded} bytes");
    }
}
