//! Debounced search input.
//!
//! Keystrokes are recorded as they arrive; the search text is released only
//! once the input has been quiet for the configured delay. Time is passed in
//! by the caller, in milliseconds.

use crate::Timestamp;

/// Quiet period used by the admin search boxes.
pub const DEFAULT_SEARCH_DELAY_MS: u64 = 300;

#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    delay_ms: u64,
    pending: Option<(String, Timestamp)>,
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_DELAY_MS)
    }
}

impl SearchDebouncer {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    /// Record the latest input, restarting the quiet period.
    pub fn input(&mut self, text: impl Into<String>, now: Timestamp) {
        self.pending = Some((text.into(), now));
    }

    /// Release the pending text once the quiet period has elapsed.
    pub fn poll(&mut self, now: Timestamp) -> Option<String> {
        match &self.pending {
            Some((_, at)) if now.saturating_sub(*at) >= self.delay_ms => {
                self.pending.take().map(|(text, _)| text)
            }
            _ => None,
        }
    }

    /// Release the pending text immediately (e.g. on Enter).
    pub fn flush(&mut self) -> Option<String> {
        self.pending.take().map(|(text, _)| text)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
