//! Scheduled text reveals
//!
//! The question prompt is revealed letter by letter and the
//! multiple-choice list option by option, as explicit scheduled steps
//! rather than blocking delays: each state machine hands the embedder
//! an alarm to fire after a delay, and every fired alarm advances the
//! reveal by one step. Alarms carry the generation they were scheduled
//! under; restarting or canceling a reveal bumps the generation so
//! stale alarms are discarded and two reveals can never interleave
//! into the same output.

use serde::{Deserialize, Serialize};
use web_time::Duration;

/// An alarm advancing a [`Typewriter`] by one character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypewriterAlarm {
    generation: u64,
}

/// An alarm advancing an [`OptionsReveal`] by one step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionsAlarm {
    generation: u64,
}

/// Any reveal alarm, for embedders with a single timer channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::From)]
pub enum RevealAlarm {
    /// Alarm for the question prompt typewriter
    Typewriter(TypewriterAlarm),
    /// Alarm for the multiple-choice option reveal
    Options(OptionsAlarm),
}

/// One revealed character of the question prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypewriterStep {
    /// The character to append to the visible prompt
    pub ch: char,
    /// Whether the prompt is now fully revealed
    pub last: bool,
}

/// One step of the multiple-choice option reveal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionsStep {
    /// Start a new visible option entry
    Begin {
        /// Index of the option being started
        option: usize,
    },
    /// Append a character to the current option entry
    Char {
        /// Index of the option being typed
        option: usize,
        /// The character to append
        ch: char,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TypewriterPhase {
    Idle,
    Typing { cursor: usize },
}

/// Letter-by-letter reveal of the question prompt
#[derive(Debug)]
pub struct Typewriter {
    generation: u64,
    script: Vec<char>,
    phase: TypewriterPhase,
    interval: Duration,
}

impl Typewriter {
    /// Creates a typewriter with the given inter-character interval
    pub fn new(interval_ms: u64) -> Self {
        Self {
            generation: 0,
            script: Vec::new(),
            phase: TypewriterPhase::Idle,
            interval: Duration::from_millis(interval_ms),
        }
    }

    /// Starts revealing a new text, canceling any reveal in flight
    ///
    /// Schedules the first alarm through `schedule`; an empty text
    /// schedules nothing.
    pub fn begin<S: FnMut(TypewriterAlarm, Duration)>(&mut self, text: &str, mut schedule: S) {
        self.generation += 1;
        self.script = text.chars().collect();
        if self.script.is_empty() {
            self.phase = TypewriterPhase::Idle;
            return;
        }
        self.phase = TypewriterPhase::Typing { cursor: 0 };
        schedule(
            TypewriterAlarm {
                generation: self.generation,
            },
            self.interval,
        );
    }

    /// Advances the reveal when a scheduled alarm fires
    ///
    /// Stale alarms from a canceled or superseded reveal are ignored.
    /// Returns the character to append, if the alarm was current.
    pub fn receive_alarm<S: FnMut(TypewriterAlarm, Duration)>(
        &mut self,
        alarm: TypewriterAlarm,
        mut schedule: S,
    ) -> Option<TypewriterStep> {
        if alarm.generation != self.generation {
            return None;
        }
        let TypewriterPhase::Typing { cursor } = self.phase else {
            return None;
        };

        let ch = *self.script.get(cursor)?;
        let next = cursor + 1;
        let last = next >= self.script.len();
        if last {
            self.phase = TypewriterPhase::Idle;
        } else {
            self.phase = TypewriterPhase::Typing { cursor: next };
            schedule(
                TypewriterAlarm {
                    generation: self.generation,
                },
                self.interval,
            );
        }
        Some(TypewriterStep { ch, last })
    }

    /// Stops the reveal; pending alarms become stale
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.phase = TypewriterPhase::Idle;
    }

    /// Whether a reveal is in flight
    pub fn is_running(&self) -> bool {
        self.phase != TypewriterPhase::Idle
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OptionsPhase {
    Idle,
    PendingBegin { option: usize },
    Typing { option: usize, cursor: usize },
}

/// Sequential reveal of the multiple-choice option list
///
/// Each option is typed letter by letter at the typewriter interval,
/// with a longer pause between options.
#[derive(Debug)]
pub struct OptionsReveal {
    generation: u64,
    options: Vec<Vec<char>>,
    phase: OptionsPhase,
    interval: Duration,
    pause: Duration,
}

impl OptionsReveal {
    /// Creates an option reveal with the given timings
    pub fn new(interval_ms: u64, pause_ms: u64) -> Self {
        Self {
            generation: 0,
            options: Vec::new(),
            phase: OptionsPhase::Idle,
            interval: Duration::from_millis(interval_ms),
            pause: Duration::from_millis(pause_ms),
        }
    }

    /// Starts revealing a new option list, canceling any in flight
    pub fn begin<S: FnMut(OptionsAlarm, Duration)>(&mut self, options: &[String], mut schedule: S) {
        self.generation += 1;
        self.options = options
            .iter()
            .map(|option| option.chars().collect())
            .collect();
        if self.options.is_empty() {
            self.phase = OptionsPhase::Idle;
            return;
        }
        self.phase = OptionsPhase::PendingBegin { option: 0 };
        schedule(
            OptionsAlarm {
                generation: self.generation,
            },
            self.interval,
        );
    }

    /// Advances the reveal when a scheduled alarm fires
    ///
    /// Stale alarms from a canceled or superseded reveal are ignored.
    pub fn receive_alarm<S: FnMut(OptionsAlarm, Duration)>(
        &mut self,
        alarm: OptionsAlarm,
        mut schedule: S,
    ) -> Option<OptionsStep> {
        if alarm.generation != self.generation {
            return None;
        }
        let alarm = OptionsAlarm {
            generation: self.generation,
        };

        match self.phase {
            OptionsPhase::Idle => None,
            OptionsPhase::PendingBegin { option } => {
                if self.options.get(option)?.is_empty() {
                    // Nothing to type in this entry, move straight on.
                    self.advance_past(option, &mut schedule);
                } else {
                    self.phase = OptionsPhase::Typing { option, cursor: 0 };
                    schedule(alarm, self.interval);
                }
                Some(OptionsStep::Begin { option })
            }
            OptionsPhase::Typing { option, cursor } => {
                let ch = *self.options.get(option)?.get(cursor)?;
                let next = cursor + 1;
                if next < self.options[option].len() {
                    self.phase = OptionsPhase::Typing {
                        option,
                        cursor: next,
                    };
                    schedule(alarm, self.interval);
                } else {
                    self.advance_past(option, &mut schedule);
                }
                Some(OptionsStep::Char { option, ch })
            }
        }
    }

    fn advance_past<S: FnMut(OptionsAlarm, Duration)>(&mut self, option: usize, schedule: &mut S) {
        if option + 1 < self.options.len() {
            self.phase = OptionsPhase::PendingBegin { option: option + 1 };
            schedule(
                OptionsAlarm {
                    generation: self.generation,
                },
                self.pause,
            );
        } else {
            self.phase = OptionsPhase::Idle;
        }
    }

    /// Stops the reveal; pending alarms become stale
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.phase = OptionsPhase::Idle;
    }

    /// Whether a reveal is in flight
    pub fn is_running(&self) -> bool {
        self.phase != OptionsPhase::Idle
    }
}
