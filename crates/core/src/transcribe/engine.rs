use thiserror::Error;

/// What the recognizer reported for one audio block: either a finalized
/// utterance or the in-progress partial text (possibly empty).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Recognition {
    Final(String),
    Partial(String),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("recognizer could not process audio block: {0}")]
    Decode(String),
}

/// Domain interface for a streaming speech recognizer.
///
/// Implementations are stateful decoders: successive blocks belong to the
/// same audio stream, and the engine decides where utterance boundaries fall.
pub trait RecognitionEngine {
    fn accept_block(&mut self, block: &[i16]) -> Result<Recognition, EngineError>;
}
