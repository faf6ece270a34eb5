use cpal::traits::{DeviceTrait, StreamTrait};
use cpal::{SampleFormat, Stream, StreamConfig};
use crossbeam_channel::Sender;
use thiserror::Error;

/// Samples per block fed to the recognizer (half a second at 16 kHz).
pub const BLOCK_SAMPLES: usize = 8000;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("failed to read device configuration: {0}")]
    DeviceConfig(#[from] cpal::DefaultStreamConfigError),
    #[error("unsupported sample format: {0:?}")]
    UnsupportedFormat(SampleFormat),
    #[error("failed to build input stream: {0}")]
    Build(#[from] cpal::BuildStreamError),
    #[error("failed to start input stream: {0}")]
    Play(#[from] cpal::PlayStreamError),
}

/// An open microphone stream delivering fixed-size mono i16 blocks into a
/// channel. Capture stops when the value is dropped.
pub struct CaptureStream {
    _stream: Stream,
    sample_rate: u32,
}

impl CaptureStream {
    /// Open the device at `sample_rate` and start capturing.
    ///
    /// The device callback runs on a thread owned by the audio library; it
    /// downmixes to mono, converts to i16 where needed, and sends complete
    /// blocks of [`BLOCK_SAMPLES`] samples. The channel is unbounded, so the
    /// callback never blocks.
    pub fn open(
        device: &cpal::Device,
        sample_rate: u32,
        blocks: Sender<Vec<i16>>,
    ) -> Result<Self, CaptureError> {
        let supported = device.default_input_config()?;
        let channels = supported.channels();
        let config = StreamConfig {
            channels,
            sample_rate: cpal::SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let stream = match supported.sample_format() {
            SampleFormat::I16 => {
                let mut assembler = BlockAssembler::new(BLOCK_SAMPLES, channels as usize);
                device.build_input_stream(
                    &config,
                    move |data: &[i16], _: &cpal::InputCallbackInfo| {
                        assembler.extend(data.iter().copied(), &blocks);
                    },
                    stream_error,
                    None,
                )?
            }
            SampleFormat::F32 => {
                let mut assembler = BlockAssembler::new(BLOCK_SAMPLES, channels as usize);
                device.build_input_stream(
                    &config,
                    move |data: &[f32], _: &cpal::InputCallbackInfo| {
                        assembler.extend(data.iter().map(|&s| f32_to_i16(s)), &blocks);
                    },
                    stream_error,
                    None,
                )?
            }
            other => return Err(CaptureError::UnsupportedFormat(other)),
        };
        stream.play()?;

        Ok(Self {
            _stream: stream,
            sample_rate,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

fn stream_error(err: cpal::StreamError) {
    log::error!("audio stream error: {err}");
}

fn f32_to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * 32767.0) as i16
}

/// Collects interleaved device frames into fixed-size mono blocks.
///
/// Multi-channel input is averaged per frame. Leftover samples carry over to
/// the next callback, so block boundaries are independent of the device's
/// buffer size.
struct BlockAssembler {
    block_samples: usize,
    channels: usize,
    frame: Vec<i32>,
    buf: Vec<i16>,
}

impl BlockAssembler {
    fn new(block_samples: usize, channels: usize) -> Self {
        Self {
            block_samples,
            channels: channels.max(1),
            frame: Vec::with_capacity(channels.max(1)),
            buf: Vec::with_capacity(block_samples),
        }
    }

    fn extend(&mut self, samples: impl Iterator<Item = i16>, out: &Sender<Vec<i16>>) {
        for sample in samples {
            self.frame.push(sample as i32);
            if self.frame.len() < self.channels {
                continue;
            }
            let sum: i32 = self.frame.iter().sum();
            self.buf.push((sum / self.channels as i32) as i16);
            self.frame.clear();

            if self.buf.len() == self.block_samples {
                let block =
                    std::mem::replace(&mut self.buf, Vec::with_capacity(self.block_samples));
                // A closed channel means the consumer is gone; nothing to do
                // from the capture callback.
                let _ = out.send(block);
            }
        }
    }
}
