//! The interactive practice loop.
//!
//! A session walks through levels of increasing length. Each level reads
//! digits one keystroke at a time and scores them on the spot; a perfect
//! level raises the target by one, anything else retries the same length.
//! The session ends when the target passes the configured maximum or the
//! user interrupts, and in both cases the lifetime statistics are updated.

use crate::compare::{format_pi, style_digit, ColorMode, Outcome};
use crate::config::{PracticeConfig, PracticeMode};
use crate::digits::{self, MAX_DIGITS};
use crate::error::PracticeError;
use crate::runtime::{drain_for, read_digit, DigitRead, KeySource, RawModeGuard};
use crate::stats::{PracticeStats, SessionRecord, StatsStore};
use chrono::Local;
use crossterm::style::Stylize;
use std::io::Write;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Pause between levels
pub const DEFAULT_PAUSE: Duration = Duration::from_secs(1);

/// Extra reference digits fetched whenever the buffer runs short
const BUFFER_STEP: usize = 50;

/// Visual group size for the standard and timed echo
const ECHO_GROUP: usize = 5;

/// Progress marker interval in standard mode
const PROGRESS_EVERY: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Completed,
    Interrupted,
}

/// How a single level attempt ended
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LevelOutcome {
    Passed {
        level: usize,
        elapsed: Duration,
    },
    Missed {
        level: usize,
        position: usize,
        expected: char,
        typed: char,
        elapsed: Duration,
    },
    TimedOut {
        level: usize,
        typed: usize,
        elapsed: Duration,
    },
    Interrupted {
        level: usize,
    },
}

impl LevelOutcome {
    pub fn passed(&self) -> bool {
        matches!(self, LevelOutcome::Passed { .. })
    }
}

/// What a finished session reports back
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub end: SessionEnd,
    pub record: SessionRecord,
    /// seconds, quickest passed timed level
    pub fastest_attempt: Option<f64>,
    pub levels: Vec<LevelOutcome>,
    pub lifetime_best: usize,
    /// set when the statistics could not be written
    pub save_error: Option<String>,
}

/// Mutable progress of the running session
#[derive(Debug)]
struct SessionState {
    reference: &'static str,
    target: usize,
    correct_digits: usize,
    max_level: usize,
    fastest_attempt: Option<Duration>,
    levels: Vec<LevelOutcome>,
    started: Instant,
}

impl SessionState {
    fn new(target: usize) -> Result<Self, PracticeError> {
        let mut state = Self {
            reference: "",
            target,
            correct_digits: 0,
            max_level: 0,
            fastest_attempt: None,
            levels: Vec::new(),
            started: Instant::now(),
        };
        state.ensure_reference()?;
        Ok(state)
    }

    /// Grows the reference buffer to cover the current target
    fn ensure_reference(&mut self) -> Result<(), PracticeError> {
        if self.target > self.reference.len() {
            let wanted = (self.target + BUFFER_STEP).min(MAX_DIGITS).max(self.target);
            self.reference = digits::prefix(wanted)?;
            debug!(digits = self.reference.len(), "reference buffer grown");
        }
        Ok(())
    }

    fn apply(&mut self, outcome: LevelOutcome, mode: PracticeMode) -> Result<(), PracticeError> {
        if let LevelOutcome::Passed { level, elapsed } = outcome {
            self.max_level = self.max_level.max(level);
            if mode == PracticeMode::Timed && self.fastest_attempt.map_or(true, |f| elapsed < f) {
                self.fastest_attempt = Some(elapsed);
            }
            self.target = level + 1;
            self.ensure_reference_capped()?;
        }
        self.levels.push(outcome);
        Ok(())
    }

    fn ensure_reference_capped(&mut self) -> Result<(), PracticeError> {
        if self.target <= MAX_DIGITS {
            self.ensure_reference()?;
        }
        Ok(())
    }
}

/// Level the session opens with: one past the lifetime best, at least the
/// configured minimum, at most the configured maximum.
pub fn starting_level(config: &PracticeConfig, stats: &PracticeStats) -> usize {
    (stats.max_digits_reached + 1)
        .max(config.min_digits)
        .min(config.max_digits)
}

pub struct Practice<'a> {
    config: PracticeConfig,
    stats: &'a dyn StatsStore,
    color: ColorMode,
    pause: Duration,
}

impl<'a> Practice<'a> {
    pub fn new(config: PracticeConfig, stats: &'a dyn StatsStore) -> Self {
        Self {
            config,
            stats,
            color: ColorMode::default(),
            pause: DEFAULT_PAUSE,
        }
    }

    pub fn with_color_mode(mut self, color: ColorMode) -> Self {
        self.color = color;
        self
    }

    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Runs a whole session and folds it into the stored statistics.
    ///
    /// The statistics are written and the summary printed even when the
    /// terminal fails midway; the terminal error is returned afterwards.
    pub fn run<K, W>(&self, keys: &mut K, out: &mut W) -> Result<SessionSummary, PracticeError>
    where
        K: KeySource + ?Sized,
        W: Write + ?Sized,
    {
        self.config.validate()?;
        let mut lifetime = self.stats.load();
        let mut session = SessionState::new(starting_level(&self.config, &lifetime))?;
        debug!(level = session.target, mode = %self.config.mode, "practice session started");

        match self.play(keys, out, &mut session) {
            Ok(end) => {
                let summary = self.finish(&mut lifetime, session, end);
                self.print_summary(out, &summary)?;
                Ok(summary)
            }
            Err(e) => {
                let summary = self.finish(&mut lifetime, session, SessionEnd::Interrupted);
                if let Err(print_err) = self.print_summary(out, &summary) {
                    warn!(error = %print_err, "could not print session summary");
                }
                Err(e)
            }
        }
    }

    fn play<K, W>(
        &self,
        keys: &mut K,
        out: &mut W,
        session: &mut SessionState,
    ) -> Result<SessionEnd, PracticeError>
    where
        K: KeySource + ?Sized,
        W: Write + ?Sized,
    {
        writeln!(
            out,
            "π practice · {} mode · levels {} to {} · Ctrl+C to stop",
            self.config.mode, session.target, self.config.max_digits
        )?;

        loop {
            if session.target > self.config.max_digits {
                writeln!(
                    out,
                    "\n{} You recited all {} digits. Session complete!",
                    "★".yellow(),
                    self.config.max_digits
                )?;
                return Ok(SessionEnd::Completed);
            }

            let outcome = self.run_level(keys, out, session)?;
            debug!(?outcome, "level finished");
            session.apply(outcome, self.config.mode)?;

            if let LevelOutcome::Interrupted { .. } = outcome {
                return Ok(SessionEnd::Interrupted);
            }
            if session.target <= self.config.max_digits && self.pace(keys)? {
                return Ok(SessionEnd::Interrupted);
            }
        }
    }

    /// One attempt at the current target. Raw mode is held only inside.
    fn run_level<K, W>(
        &self,
        keys: &mut K,
        out: &mut W,
        session: &mut SessionState,
    ) -> Result<LevelOutcome, PracticeError>
    where
        K: KeySource + ?Sized,
        W: Write + ?Sized,
    {
        let level = session.target;
        let buffer = session.reference;
        let reference = &buffer[..level];
        let timed = self.config.mode == PracticeMode::Timed;

        write!(out, "\nLevel {level}: type {level} digits of π")?;
        if timed && self.config.show_timer {
            write!(out, " within {}s", self.config.time_limit_seconds)?;
        }
        write!(out, "\n3.")?;
        out.flush()?;

        let mut keys = RawModeGuard::acquire(keys)?;
        let started = Instant::now();
        let deadline = if timed {
            started.checked_add(Duration::from_secs(self.config.time_limit_seconds))
        } else {
            None
        };

        for (position, expected) in reference.chars().enumerate() {
            let typed = match read_digit(&mut *keys, deadline)? {
                DigitRead::Digit(c) => c,
                DigitRead::Interrupted => {
                    write!(out, "\r\n")?;
                    return Ok(LevelOutcome::Interrupted { level });
                }
                DigitRead::TimedOut => {
                    let elapsed = started.elapsed();
                    write!(
                        out,
                        "\r\n{} Time's up after {:.1}s ({} of {} digits).\r\n",
                        "⏱".yellow(),
                        elapsed.as_secs_f64(),
                        position,
                        level
                    )?;
                    return Ok(LevelOutcome::TimedOut {
                        level,
                        typed: position,
                        elapsed,
                    });
                }
            };

            write!(out, "{}", self.separator(position))?;

            if typed != expected {
                let elapsed = started.elapsed();
                write!(out, "{}", style_digit(typed, Outcome::Incorrect, self.color))?;
                write!(
                    out,
                    "\r\n{} Digit {} should have been {}, you typed {}.\r\n   π = {}\r\n",
                    "✗".red(),
                    position + 1,
                    expected.bold(),
                    typed,
                    format_pi(&reference[..=position])
                )?;
                out.flush()?;
                return Ok(LevelOutcome::Missed {
                    level,
                    position,
                    expected,
                    typed,
                    elapsed,
                });
            }

            session.correct_digits += 1;
            write!(out, "{}", style_digit(typed, Outcome::Correct, self.color))?;
            write!(out, "{}", self.progress(position + 1, level))?;
            out.flush()?;
        }

        let elapsed = started.elapsed();
        write!(out, "\r\n{} Level {level} complete", "✓".green())?;
        if self.config.show_timer {
            write!(out, " in {:.1}s", elapsed.as_secs_f64())?;
        }
        write!(out, ".\r\n")?;
        out.flush()?;

        Ok(LevelOutcome::Passed { level, elapsed })
    }

    /// Text echoed before the digit at `position`
    fn separator(&self, position: usize) -> &'static str {
        if position == 0 {
            return "";
        }
        match self.config.mode {
            PracticeMode::Chunk if position % self.config.chunk_size == 0 => " | ",
            PracticeMode::Standard | PracticeMode::Timed
                if self.config.visual_aid && position % ECHO_GROUP == 0 =>
            {
                " "
            }
            _ => "",
        }
    }

    /// Progress marker after `done` correct digits
    fn progress(&self, done: usize, level: usize) -> String {
        if self.config.mode == PracticeMode::Standard
            && self.config.visual_aid
            && done % PROGRESS_EVERY == 0
            && done < level
        {
            format!("{}", format!(" [{done}/{level}]").dim())
        } else {
            String::new()
        }
    }

    /// Pause between levels. Keys typed meanwhile are dropped, Ctrl+C still
    /// ends the session.
    fn pace<K: KeySource + ?Sized>(&self, keys: &mut K) -> Result<bool, PracticeError> {
        if self.pause.is_zero() {
            return Ok(false);
        }
        let mut keys = RawModeGuard::acquire(keys)?;
        Ok(drain_for(&mut *keys, self.pause)?)
    }

    /// Folds the session into the lifetime statistics and persists them
    fn finish(
        &self,
        lifetime: &mut PracticeStats,
        session: SessionState,
        end: SessionEnd,
    ) -> SessionSummary {
        let record = SessionRecord {
            timestamp: Local::now(),
            mode: self.config.mode,
            max_level_reached: session.max_level,
            correct_digit_count: session.correct_digits,
            duration_seconds: session.started.elapsed().as_secs_f64(),
        };
        let fastest_attempt = session.fastest_attempt.map(|d| d.as_secs_f64());

        lifetime.record_session(record.clone(), fastest_attempt);
        let save_error = match self.stats.save(lifetime) {
            Ok(()) => None,
            Err(e) => {
                warn!(error = %e, "could not save practice statistics");
                Some(e.to_string())
            }
        };
        debug!(?end, level = session.max_level, "practice session finished");

        SessionSummary {
            end,
            record,
            fastest_attempt,
            levels: session.levels,
            lifetime_best: lifetime.max_digits_reached,
            save_error,
        }
    }

    fn print_summary<W: Write + ?Sized>(
        &self,
        out: &mut W,
        summary: &SessionSummary,
    ) -> Result<(), PracticeError> {
        let ended = match summary.end {
            SessionEnd::Completed => "completed",
            SessionEnd::Interrupted => "interrupted",
        };

        writeln!(out, "\nSession summary ({ended})")?;
        writeln!(out, "  Highest level passed: {}", summary.record.max_level_reached)?;
        writeln!(out, "  Correct digits:       {}", summary.record.correct_digit_count)?;
        writeln!(out, "  Level attempts:       {}", summary.levels.len())?;
        writeln!(out, "  Duration:             {:.1}s", summary.record.duration_seconds)?;
        if let Some(speed) = summary.record.digits_per_minute() {
            writeln!(out, "  Speed:                {speed:.1} digits/min")?;
        }
        if let Some(secs) = summary.fastest_attempt {
            writeln!(out, "  Fastest level:        {secs:.1}s")?;
        }
        writeln!(out, "  Best ever:            {} digits", summary.lifetime_best)?;
        if let Some(err) = &summary.save_error {
            writeln!(out, "warning: could not save statistics: {err}")?;
        }
        out.flush()?;
        Ok(())
    }
}
