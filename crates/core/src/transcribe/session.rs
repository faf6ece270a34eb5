use crate::transcribe::engine::{EngineError, Recognition, RecognitionEngine};
use crate::transcribe::sentence_log::SentenceLog;

/// Single-threaded transcript state: feeds blocks to the engine and keeps
/// the sentence log and the live partial text up to date.
///
/// Finalized text is trimmed and logged unless empty. Partial text replaces
/// the previous partial wholesale; no partial history is kept, and a final
/// does not clear the partial (the engine's next partial overwrites it).
pub struct TranscriptSession<E> {
    engine: E,
    log: SentenceLog,
    partial: String,
}

impl<E: RecognitionEngine> TranscriptSession<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            log: SentenceLog::new(),
            partial: String::new(),
        }
    }

    /// Feed one audio block through the engine. Engine failures propagate;
    /// the session has no recovery of its own.
    pub fn process_block(&mut self, block: &[i16]) -> Result<(), EngineError> {
        match self.engine.accept_block(block)? {
            Recognition::Final(text) => {
                self.log.push(&text);
            }
            Recognition::Partial(text) => {
                self.partial = text;
            }
        }
        Ok(())
    }

    pub fn log(&self) -> &SentenceLog {
        &self.log
    }

    pub fn partial(&self) -> &str {
        &self.partial
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Engine that replays a fixed script of results.
    struct ScriptedEngine {
        script: VecDeque<Result<Recognition, EngineError>>,
    }

    impl ScriptedEngine {
        fn new(script: Vec<Result<Recognition, EngineError>>) -> Self {
            Self {
                script: script.into(),
            }
        }
    }

    impl RecognitionEngine for ScriptedEngine {
        fn accept_block(&mut self, _block: &[i16]) -> Result<Recognition, EngineError> {
            self.script
                .pop_front()
                .unwrap_or_else(|| Ok(Recognition::Partial(String::new())))
        }
    }

    fn session_with(script: Vec<Result<Recognition, EngineError>>) -> TranscriptSession<ScriptedEngine> {
        TranscriptSession::new(ScriptedEngine::new(script))
    }

    #[test]
    fn test_final_appends_trimmed_sentence() {
        let mut session = session_with(vec![Ok(Recognition::Final("  hello there  ".into()))]);
        session.process_block(&[0; 8]).unwrap();
        assert_eq!(session.log().len(), 1);
        assert_eq!(session.log().visible()[0].text, "hello there");
    }

    #[test]
    fn test_empty_final_leaves_log_unchanged() {
        let mut session = session_with(vec![
            Ok(Recognition::Final("first".into())),
            Ok(Recognition::Final("   ".into())),
        ]);
        session.process_block(&[0; 8]).unwrap();
        session.process_block(&[0; 8]).unwrap();
        assert_eq!(session.log().len(), 1);
    }

    #[test]
    fn test_partial_replaces_previous_partial() {
        let mut session = session_with(vec![
            Ok(Recognition::Partial("he".into())),
            Ok(Recognition::Partial("hello".into())),
        ]);
        session.process_block(&[0; 8]).unwrap();
        assert_eq!(session.partial(), "he");
        session.process_block(&[0; 8]).unwrap();
        assert_eq!(session.partial(), "hello");
    }

    #[test]
    fn test_final_keeps_partial_until_next_partial() {
        let mut session = session_with(vec![
            Ok(Recognition::Partial("hello wor".into())),
            Ok(Recognition::Final("hello world".into())),
            Ok(Recognition::Partial("".into())),
        ]);
        session.process_block(&[0; 8]).unwrap();
        session.process_block(&[0; 8]).unwrap();
        assert_eq!(session.partial(), "hello wor");
        session.process_block(&[0; 8]).unwrap();
        assert_eq!(session.partial(), "");
    }

    #[test]
    fn test_engine_error_propagates() {
        let mut session = session_with(vec![Err(EngineError::Decode("boom".into()))]);
        assert!(session.process_block(&[0; 8]).is_err());
    }
}
