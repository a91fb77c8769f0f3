//! UI state management module
//!
//! Window-only state that the board never sees: the status line, the
//! selected filter tab and the animation clock.

use std::time::{Duration, Instant};

use crate::models::FilterKind;

#[derive(Debug, Clone)]
pub struct UiState {
    /// Status line text
    pub status: String,

    /// Whether the last operation failed
    pub has_error: bool,

    /// Filter tab shown as active
    pub filter: FilterKind,

    /// Whether the trip data is still being read
    pub loading: bool,

    last_tick: Option<Instant>,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            status: "Loading trip...".to_string(),
            has_error: false,
            filter: FilterKind::default(),
            loading: true,
            last_tick: None,
        }
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
        self.has_error = false;
    }

    pub fn set_error(&mut self, status: impl Into<String>) {
        self.status = status.into();
        self.has_error = true;
    }

    /// Time since the previous tick; the first tick starts the clock.
    pub fn elapsed_since_tick(&mut self, now: Instant) -> Duration {
        let elapsed = self
            .last_tick
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or_default();
        self.last_tick = Some(now);
        elapsed
    }

    /// Forgets the clock once no animation needs it.
    pub fn stop_ticking(&mut self) {
        self.last_tick = None;
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_clock() {
        let mut state = UiState::new();
        let start = Instant::now();

        assert_eq!(state.elapsed_since_tick(start), Duration::ZERO);
        let later = start + Duration::from_millis(250);
        assert_eq!(state.elapsed_since_tick(later), Duration::from_millis(250));

        state.stop_ticking();
        assert_eq!(state.elapsed_since_tick(later), Duration::ZERO);
    }

    #[test]
    fn test_error_status() {
        let mut state = UiState::new();
        state.set_error("Could not load trip data");
        assert!(state.has_error);
        state.set_status("Ready");
        assert!(!state.has_error);
    }
}
