use std::path::Path;

use thiserror::Error;
use vosk::{CompleteResult, DecodingState, Model, Recognizer};

use voxlive_core::transcribe::{EngineError, Recognition, RecognitionEngine};

#[derive(Debug, Error)]
pub enum VoskInitError {
    #[error("failed to load recognition model from {0}")]
    Model(String),
    #[error("failed to create recognizer at {0} Hz")]
    Recognizer(u32),
}

/// Streaming recognizer backed by the Vosk engine.
///
/// The engine is an opaque stateful decoder: each accepted block either
/// finalizes an utterance or extends the current partial hypothesis.
pub struct VoskEngine {
    recognizer: Recognizer,
    // The recognizer references the model's shared state; keep it alive for
    // the recognizer's lifetime.
    _model: Model,
}

impl VoskEngine {
    pub fn new(model_dir: &Path, sample_rate: u32) -> Result<Self, VoskInitError> {
        let model = Model::new(model_dir.to_string_lossy())
            .ok_or_else(|| VoskInitError::Model(model_dir.display().to_string()))?;
        let recognizer = Recognizer::new(&model, sample_rate as f32)
            .ok_or(VoskInitError::Recognizer(sample_rate))?;
        Ok(Self {
            recognizer,
            _model: model,
        })
    }
}

impl RecognitionEngine for VoskEngine {
    fn accept_block(&mut self, block: &[i16]) -> Result<Recognition, EngineError> {
        match self.recognizer.accept_waveform(block) {
            Ok(DecodingState::Finalized) => {
                let text = match self.recognizer.result() {
                    CompleteResult::Single(result) => result.text.to_string(),
                    CompleteResult::Multiple(alternatives) => alternatives
                        .alternatives
                        .first()
                        .map(|alt| alt.text.to_string())
                        .unwrap_or_default(),
                };
                Ok(Recognition::Final(text))
            }
            Ok(DecodingState::Running) => Ok(Recognition::Partial(
                self.recognizer.partial_result().partial.to_string(),
            )),
            Ok(DecodingState::Failed) => {
                Err(EngineError::Decode("decoder entered failed state".into()))
            }
            Err(err) => Err(EngineError::Decode(err.to_string())),
        }
    }
}
