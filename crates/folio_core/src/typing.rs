//! Typewriter state machine.
//!
//! [`TypingCycler`] types the current phrase one character at a time,
//! holds it, deletes it, then moves on to the next phrase. It owns no
//! timer: every [`TypingCycler::tick`] returns how long the caller should
//! wait before the next one.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_TYPE_DELAY: Duration = Duration::from_millis(150);
pub const DEFAULT_DELETE_DELAY: Duration = Duration::from_millis(30);
pub const DEFAULT_HOLD: Duration = Duration::from_millis(2000);

pub const DEFAULT_PHRASES: [&str; 5] = [
    "Takshiv Kashyap",
    "Creative Developer",
    "3D Web Expert",
    "UI/UX Enthusiast",
    "Performance Optimizer",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypingMode {
    Typing,
    /// Holding the complete phrase before deleting it.
    Paused,
    Deleting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypingTiming {
    pub type_delay: Duration,
    pub delete_delay: Duration,
    pub hold: Duration,
}

impl Default for TypingTiming {
    fn default() -> Self {
        Self {
            type_delay: DEFAULT_TYPE_DELAY,
            delete_delay: DEFAULT_DELETE_DELAY,
            hold: DEFAULT_HOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypingError {
    #[error("typing animation needs at least one phrase")]
    NoPhrases,
    #[error("typing delays must be non-zero")]
    ZeroDelay,
}

#[derive(Debug, Clone)]
pub struct TypingCycler {
    phrases: Vec<String>,
    timing: TypingTiming,
    phrase_index: usize,
    /// Length of the displayed prefix, in chars.
    shown: usize,
    /// Byte offset where the displayed prefix ends.
    shown_bytes: usize,
    mode: TypingMode,
    /// Time owed to the pending tick by [`TypingCycler::progress`].
    carried: Duration,
}

impl TypingCycler {
    pub fn new<I, S>(phrases: I) -> Result<Self, TypingError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_timing(phrases, TypingTiming::default())
    }

    pub fn with_timing<I, S>(phrases: I, timing: TypingTiming) -> Result<Self, TypingError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let phrases: Vec<String> = phrases.into_iter().map(Into::into).collect();
        if phrases.is_empty() {
            return Err(TypingError::NoPhrases);
        }
        if timing.type_delay.is_zero() || timing.delete_delay.is_zero() || timing.hold.is_zero() {
            return Err(TypingError::ZeroDelay);
        }

        Ok(Self {
            phrases,
            timing,
            phrase_index: 0,
            shown: 0,
            shown_bytes: 0,
            mode: TypingMode::Typing,
            carried: Duration::ZERO,
        })
    }

    pub fn displayed(&self) -> &str {
        &self.current_phrase()[..self.shown_bytes]
    }

    pub fn displayed_len(&self) -> usize {
        self.shown
    }

    pub fn current_phrase(&self) -> &str {
        &self.phrases[self.phrase_index]
    }

    pub fn phrase_index(&self) -> usize {
        self.phrase_index
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    pub fn mode(&self) -> TypingMode {
        self.mode
    }

    pub fn timing(&self) -> TypingTiming {
        self.timing
    }

    /// Delay before the first tick after construction.
    pub fn initial_delay(&self) -> Duration {
        self.timing.type_delay
    }

    /// Applies one transition and returns the delay until the next tick.
    pub fn tick(&mut self) -> Duration {
        match self.mode {
            TypingMode::Typing => {
                if let Some(ch) = self.current_phrase()[self.shown_bytes..].chars().next() {
                    self.shown += 1;
                    self.shown_bytes += ch.len_utf8();
                }
                if self.shown_bytes == self.current_phrase().len() {
                    self.mode = TypingMode::Paused;
                    self.timing.hold
                } else {
                    self.timing.type_delay
                }
            }
            TypingMode::Paused => {
                self.mode = TypingMode::Deleting;
                self.delete_one()
            }
            TypingMode::Deleting => self.delete_one(),
        }
    }

    /// Runs every tick that falls due within `elapsed`.
    ///
    /// For frame-driven renderers that poll instead of sleeping. Time left
    /// over after the last due tick is carried into the next call. Returns
    /// the number of ticks applied.
    pub fn progress(&mut self, elapsed: Duration) -> usize {
        let mut budget = self.carried + elapsed;
        let mut ticks = 0;
        let mut due = self.pending_delay();
        while budget >= due {
            budget -= due;
            due = self.tick();
            ticks += 1;
        }
        self.carried = budget;
        ticks
    }

    fn pending_delay(&self) -> Duration {
        match self.mode {
            TypingMode::Typing => self.timing.type_delay,
            TypingMode::Paused => self.timing.hold,
            TypingMode::Deleting => self.timing.delete_delay,
        }
    }

    fn delete_one(&mut self) -> Duration {
        if let Some(ch) = self.current_phrase()[..self.shown_bytes].chars().next_back() {
            self.shown -= 1;
            self.shown_bytes -= ch.len_utf8();
        }

        if self.shown == 0 {
            self.mode = TypingMode::Typing;
            self.phrase_index = (self.phrase_index + 1) % self.phrases.len();
            debug!(phrase_index = self.phrase_index, "typing: advanced to next phrase");
            self.timing.type_delay
        } else {
            self.timing.delete_delay
        }
    }
}

#[cfg(test)]
#[path = "tests/typing_tests.rs"]
mod tests;
