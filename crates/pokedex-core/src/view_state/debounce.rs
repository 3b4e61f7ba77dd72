use std::time::{Duration, Instant};

/// Idle time after the last keystroke before a search term is committed.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Local search input buffer with debounced forwarding.
///
/// The buffer changes on every keystroke. A term is forwarded only once input
/// has been idle for `SEARCH_DEBOUNCE`, and only if it differs from the
/// committed term. Time is supplied by the caller so the UI tick drives it.
#[derive(Debug, Clone, Default)]
pub struct SearchDebouncer {
    buffer: String,
    last_input: Option<Instant>,
}

impl SearchDebouncer {
    pub fn new(initial: &str) -> Self {
        Self {
            buffer: initial.to_string(),
            last_input: None,
        }
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn is_pending(&self) -> bool {
        self.last_input.is_some()
    }

    pub fn push_char(&mut self, c: char, now: Instant) {
        self.buffer.push(c);
        self.last_input = Some(now);
    }

    pub fn pop_char(&mut self, now: Instant) {
        self.buffer.pop();
        self.last_input = Some(now);
    }

    /// Returns the term to commit once input has settled.
    pub fn poll(&mut self, committed: &str, now: Instant) -> Option<String> {
        let since = self.last_input?;
        if now.saturating_duration_since(since) < SEARCH_DEBOUNCE {
            return None;
        }
        self.last_input = None;
        (self.buffer != committed).then(|| self.buffer.clone())
    }

    /// Empty the buffer. The caller commits "" right away, skipping the delay.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.last_input = None;
    }

    /// The committed term changed elsewhere (navigation, reset).
    pub fn sync_external(&mut self, term: &str) {
        self.buffer = term.to_string();
        self.last_input = None;
    }
}
