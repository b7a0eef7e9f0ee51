//! Digit-by-digit scoring of a candidate against the reference, and the
//! rendering of the result for humans.

use crossterm::style::{StyledContent, Stylize};
use itertools::Itertools;
use std::fmt::Write;

/// Digits per visual group when showing π to a human
pub const GROUP_SIZE: usize = 5;

#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
}

/// How outcomes are told apart on screen
#[derive(Clone, Debug, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// mistakes in red
    #[default]
    Color,
    /// mistakes underlined and bold, readable without hue
    Colorblind,
}

impl ColorMode {
    pub fn from_flag(colorblind: bool) -> Self {
        if colorblind {
            ColorMode::Colorblind
        } else {
            ColorMode::Color
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoredDigit {
    pub digit: char,
    pub outcome: Outcome,
}

/// Result of lining a candidate up against the reference.
///
/// Only the overlapping prefix is scored. Candidate digits past the end of
/// the reference are kept in `unscored` for display and never count as
/// errors; reference digits the candidate never reached are counted in
/// `missing`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Comparison {
    pub scored: Vec<ScoredDigit>,
    pub unscored: Vec<char>,
    pub missing: usize,
    pub error_count: usize,
}

impl Comparison {
    pub fn mismatch_positions(&self) -> Vec<usize> {
        self.scored
            .iter()
            .positions(|d| d.outcome == Outcome::Incorrect)
            .collect()
    }

    /// Same digits, same length
    pub fn is_exact(&self) -> bool {
        self.error_count == 0 && self.unscored.is_empty() && self.missing == 0
    }
}

pub fn compare(candidate: &str, reference: &str) -> Comparison {
    let candidate: Vec<char> = candidate.chars().collect();
    let reference: Vec<char> = reference.chars().collect();
    let overlap = candidate.len().min(reference.len());

    let scored: Vec<ScoredDigit> = candidate
        .iter()
        .zip(reference.iter())
        .map(|(&digit, &expected)| ScoredDigit {
            digit,
            outcome: if digit == expected {
                Outcome::Correct
            } else {
                Outcome::Incorrect
            },
        })
        .collect();

    let error_count = scored
        .iter()
        .filter(|d| d.outcome == Outcome::Incorrect)
        .count();

    Comparison {
        scored,
        unscored: candidate[overlap..].to_vec(),
        missing: reference.len() - overlap,
        error_count,
    }
}

pub fn style_digit(digit: char, outcome: Outcome, mode: ColorMode) -> StyledContent<char> {
    match (outcome, mode) {
        (Outcome::Correct, _) => digit.stylize(),
        (Outcome::Incorrect, ColorMode::Color) => digit.red(),
        (Outcome::Incorrect, ColorMode::Colorblind) => digit.underlined().bold(),
    }
}

fn styled_pieces(comparison: &Comparison, mode: ColorMode) -> Vec<String> {
    comparison
        .scored
        .iter()
        .map(|d| style_digit(d.digit, d.outcome, mode).to_string())
        .chain(comparison.unscored.iter().map(|&c| c.dim().to_string()))
        .collect()
}

/// Renders the scored digits without grouping
pub fn render(comparison: &Comparison, mode: ColorMode) -> String {
    styled_pieces(comparison, mode).concat()
}

/// Renders a full candidate ("3." plus its decimals) grouped by five.
///
/// `integer_ok` says whether the integer part was the expected "3"; a wrong
/// integer part is styled like a mistaken digit.
pub fn render_pi(
    integer: &str,
    integer_ok: bool,
    comparison: &Comparison,
    mode: ColorMode,
) -> String {
    let mut out = String::new();
    for c in integer.chars() {
        let outcome = if integer_ok {
            Outcome::Correct
        } else {
            Outcome::Incorrect
        };
        let _ = write!(out, "{}", style_digit(c, outcome, mode));
    }

    let pieces = styled_pieces(comparison, mode);
    if pieces.is_empty() {
        return out;
    }

    out.push('.');
    for (i, piece) in pieces.iter().enumerate() {
        if i > 0 && i % GROUP_SIZE == 0 {
            out.push(' ');
        }
        out.push_str(piece);
    }
    out
}

/// Inserts a space every five decimals of a "3.xxxx" string.
///
/// Presentation only: removing the spaces gives back the input.
pub fn group_digits(pi: &str) -> String {
    let (head, tail) = match pi.find('.') {
        Some(dot) => pi.split_at(dot + 1),
        None => ("", pi),
    };

    let chunks = tail.chars().chunks(GROUP_SIZE);
    let grouped = chunks
        .into_iter()
        .map(|chunk| chunk.collect::<String>())
        .join(" ");
    format!("{head}{grouped}")
}

/// "3." followed by the given decimals, grouped
pub fn format_pi(decimals: &str) -> String {
    group_digits(&format!("3.{decimals}"))
}
