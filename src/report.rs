//! Text for the one-shot commands: comparison, `-p`, version, easter egg
//! and the statistics overview.

use crate::compare::{compare, format_pi, render_pi, ColorMode, Comparison};
use crate::digits::{self, DEFAULT_LENGTH, MAX_DIGITS};
use crate::error::DigitsError;
use crate::stats::PracticeStats;
use crate::validation::Candidate;
use chrono::{DateTime, Local};
use itertools::Itertools;
use std::fmt::Write;
use time_humanize::{Accuracy, HumanTime, Tense};

/// Sessions listed under "Recent sessions"
const RECENT_SESSIONS: usize = 5;

const EASTER_EGGS: [&str; 3] = ["pi", "PI", "Archimedes"];

const EASTER_EGG_TEXT: &str = "π is also called Archimedes constant and is commonly defined as
the ratio of a circles circumference C to its diameter d:
π = C / d";

pub fn is_easter_egg(input: &str) -> bool {
    EASTER_EGGS.contains(&input)
}

pub fn easter_egg() -> &'static str {
    EASTER_EGG_TEXT
}

pub fn version_line(name: &str, version: &str, repository: &str) -> String {
    format!("{name} version: {version} ({repository})")
}

/// π to `length` decimals, grouped, as printed by `-p`
pub fn pi_line(length: usize, verbose: bool) -> Result<String, DigitsError> {
    let pi = format_pi(digits::prefix(length)?);
    Ok(if verbose {
        format!("π with {length} decimals:\t{pi}")
    } else {
        pi
    })
}

/// A candidate scored against the reference
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonReport {
    pub candidate: Candidate,
    pub decimals: usize,
    pub reference: &'static str,
    pub comparison: Comparison,
}

impl ComparisonReport {
    /// Scores against `decimals` reference digits, or as many as the
    /// candidate has (up to the table size) when no length is given.
    pub fn new(candidate: Candidate, decimals: Option<usize>) -> Result<Self, DigitsError> {
        let decimals = decimals.unwrap_or_else(|| candidate.decimals().min(MAX_DIGITS));
        let reference = digits::prefix(decimals)?;
        let comparison = compare(&candidate.fraction, reference);
        Ok(Self {
            candidate,
            decimals,
            reference,
            comparison,
        })
    }

    /// Mistaken decimals, plus one for a wrong integer part
    pub fn error_count(&self) -> usize {
        self.comparison.error_count + usize::from(!self.candidate.integer_ok())
    }

    pub fn is_match(&self) -> bool {
        self.candidate.integer_ok() && self.comparison.is_exact()
    }

    fn verdict(&self, verbose: bool) -> &'static str {
        match (self.is_match(), verbose) {
            (true, true) if self.decimals < DEFAULT_LENGTH => "Well done.",
            (true, true) => "Perfect!",
            (true, false) => "Match",
            (false, true) => "You can do better!",
            (false, false) => "No match",
        }
    }

    pub fn render(&self, verbose: bool, mode: ColorMode) -> String {
        let candidate = render_pi(
            &self.candidate.integer,
            self.candidate.integer_ok(),
            &self.comparison,
            mode,
        );

        let mut out = String::new();
        if verbose {
            let _ = writeln!(
                out,
                "π with {} decimals:\t{}",
                self.decimals,
                format_pi(self.reference)
            );
            let _ = writeln!(out, "Your version of π:\t{candidate}");
            let _ = writeln!(out, "Number of errors: {}", self.error_count());
        } else {
            let _ = writeln!(out, "{candidate}");
        }
        out.push_str(self.verdict(verbose));
        out
    }
}

fn format_duration(seconds: f64) -> String {
    let total = seconds.round() as u64;
    match (total / 60, total % 60) {
        (0, s) => format!("{s}s"),
        (m, s) => format!("{m}m {s:02}s"),
    }
}

/// Overview printed by `--stats`
pub fn stats_summary(stats: &PracticeStats, now: DateTime<Local>) -> String {
    if stats.total_sessions == 0 {
        return "No practice sessions yet. Start one with `pigame --practice`.".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "Practice statistics");
    let _ = writeln!(out, "  Sessions played:      {}", stats.total_sessions);
    let _ = writeln!(out, "  Best level:           {} digits", stats.max_digits_reached);
    let _ = writeln!(out, "  Total correct digits: {}", stats.total_digits_correct);
    if let Some(speed) = stats.best_speed {
        let _ = writeln!(out, "  Best speed:           {speed:.1} digits/min");
    }
    if let Some(secs) = stats.fastest_time {
        let _ = writeln!(out, "  Fastest timed level:  {secs:.1}s");
    }
    if let Some(last) = stats.last_session_timestamp {
        let ago = (now - last).to_std().unwrap_or_default();
        let _ = writeln!(
            out,
            "  Last session:         {} ({})",
            HumanTime::from(ago).to_text_en(Accuracy::Rough, Tense::Past),
            last.format("%Y-%m-%d %H:%M")
        );
    }

    if !stats.history.is_empty() {
        let recent = stats
            .history
            .iter()
            .rev()
            .take(RECENT_SESSIONS)
            .map(|r| {
                format!(
                    "  {}  {:<8}  level {:>4}  {:>5} digits  {}",
                    r.timestamp.format("%Y-%m-%d %H:%M"),
                    r.mode,
                    r.max_level_reached,
                    r.correct_digit_count,
                    format_duration(r.duration_seconds)
                )
            })
            .join("\n");
        let _ = write!(out, "\nRecent sessions\n{recent}");
    }
    out.trim_end().to_string()
}
