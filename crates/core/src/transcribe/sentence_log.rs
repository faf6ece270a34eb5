use chrono::{DateTime, Local};

/// Cap on rendered sentences. The log itself keeps every entry for the
/// session's lifetime; only the rendered slice is limited.
pub const MAX_VISIBLE_SENTENCES: usize = 30;

#[derive(Clone, Debug, PartialEq)]
pub struct TimedSentence {
    pub at: DateTime<Local>,
    pub text: String,
}

impl TimedSentence {
    pub fn new(at: DateTime<Local>, text: impl Into<String>) -> Self {
        Self {
            at,
            text: text.into(),
        }
    }
}

/// Monotonically appended log of finalized sentences.
#[derive(Debug, Default)]
pub struct SentenceLog {
    entries: Vec<TimedSentence>,
}

impl SentenceLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a finalized sentence, timestamped with the current time.
    ///
    /// Leading and trailing whitespace is removed; whitespace-only sentences
    /// (silence) are dropped. Returns whether an entry was added.
    pub fn push(&mut self, text: &str) -> bool {
        self.push_at(Local::now(), text)
    }

    pub fn push_at(&mut self, at: DateTime<Local>, text: &str) -> bool {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return false;
        }
        self.entries.push(TimedSentence::new(at, trimmed));
        true
    }

    /// The most recent entries, capped at [`MAX_VISIBLE_SENTENCES`].
    pub fn visible(&self) -> &[TimedSentence] {
        let start = self.entries.len().saturating_sub(MAX_VISIBLE_SENTENCES);
        &self.entries[start..]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_push_trims_and_appends() {
        let mut log = SentenceLog::new();
        assert!(log.push("  hello world \n"));
        assert_eq!(log.len(), 1);
        assert_eq!(log.visible()[0].text, "hello world");
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    fn test_whitespace_only_is_dropped(#[case] text: &str) {
        let mut log = SentenceLog::new();
        assert!(!log.push(text));
        assert!(log.is_empty());
    }

    #[test]
    fn test_visible_caps_at_most_recent_entries() {
        let mut log = SentenceLog::new();
        for i in 0..35 {
            assert!(log.push(&format!("sentence {i}")));
        }
        assert_eq!(log.len(), 35);

        let visible = log.visible();
        assert_eq!(visible.len(), MAX_VISIBLE_SENTENCES);
        assert_eq!(visible[0].text, "sentence 5");
        assert_eq!(visible[visible.len() - 1].text, "sentence 34");
    }

    #[test]
    fn test_visible_below_cap_shows_everything() {
        let mut log = SentenceLog::new();
        log.push("one");
        log.push("two");
        assert_eq!(log.visible().len(), 2);
    }
}
