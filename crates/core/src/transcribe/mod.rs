pub mod engine;
pub mod sentence_log;
pub mod session;

pub use engine::{EngineError, Recognition, RecognitionEngine};
pub use sentence_log::{SentenceLog, TimedSentence, MAX_VISIBLE_SENTENCES};
pub use session::TranscriptSession;
