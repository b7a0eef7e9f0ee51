use crate::app_dirs::AppContext;
use crate::digits::MAX_DIGITS;
use crate::error::{ConfigError, StoreError};
use crate::storage::{read_json, write_json};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Longest time limit a timed level may have, in seconds
pub const MAX_TIME_LIMIT: u64 = 24 * 60 * 60;

/// Pacing strategy of a practice session
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PracticeMode {
    #[default]
    Standard,
    Timed,
    Chunk,
}

impl PracticeMode {
    fn parse(input: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(input, true).ok()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PracticeConfig {
    pub mode: PracticeMode,
    pub min_digits: usize,
    pub max_digits: usize,
    pub chunk_size: usize,
    pub time_limit_seconds: u64,
    pub show_timer: bool,
    pub visual_aid: bool,
}

impl Default for PracticeConfig {
    fn default() -> Self {
        Self {
            mode: PracticeMode::Standard,
            min_digits: 5,
            max_digits: 100,
            chunk_size: 5,
            time_limit_seconds: 60,
            show_timer: true,
            visual_aid: true,
        }
    }
}

impl PracticeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_digits == 0 {
            return Err(ConfigError::Invalid("min_digits must be at least 1".into()));
        }
        if self.min_digits > self.max_digits {
            return Err(ConfigError::Invalid(format!(
                "min_digits ({}) must not exceed max_digits ({})",
                self.min_digits, self.max_digits
            )));
        }
        if self.max_digits > MAX_DIGITS {
            return Err(ConfigError::Invalid(format!(
                "max_digits must be at most {MAX_DIGITS}"
            )));
        }
        if self.chunk_size == 0 {
            return Err(ConfigError::Invalid("chunk_size must be at least 1".into()));
        }
        if !(1..=MAX_TIME_LIMIT).contains(&self.time_limit_seconds) {
            return Err(ConfigError::Invalid(format!(
                "time_limit_seconds must be from 1 to {MAX_TIME_LIMIT}"
            )));
        }
        Ok(())
    }

    /// Applies one-off command line settings on top of the stored ones
    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        if let Some(mode) = overrides.mode {
            self.mode = mode;
        }
        if let Some(n) = overrides.min_digits {
            self.min_digits = n;
        }
        if let Some(n) = overrides.max_digits {
            self.max_digits = n;
        }
        if let Some(n) = overrides.chunk_size {
            self.chunk_size = n;
        }
        if let Some(n) = overrides.time_limit_seconds {
            self.time_limit_seconds = n;
        }
        if let Some(b) = overrides.visual_aid {
            self.visual_aid = b;
        }
        if let Some(b) = overrides.show_timer {
            self.show_timer = b;
        }
        self.validate()?;
        Ok(self)
    }
}

/// Settings given on the command line for a single session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub mode: Option<PracticeMode>,
    pub min_digits: Option<usize>,
    pub max_digits: Option<usize>,
    pub chunk_size: Option<usize>,
    pub time_limit_seconds: Option<u64>,
    pub visual_aid: Option<bool>,
    pub show_timer: Option<bool>,
}

pub trait ConfigStore {
    fn load(&self) -> PracticeConfig;
    fn save(&self, cfg: &PracticeConfig) -> Result<(), StoreError>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new(ctx: &AppContext) -> Self {
        Self::with_path(&ctx.config_file)
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for FileConfigStore {
    /// Never fails: a missing, corrupt or invalid file is replaced by the
    /// defaults, which are written back.
    fn load(&self) -> PracticeConfig {
        if let Some(cfg) = read_json::<PracticeConfig>(&self.path) {
            match cfg.validate() {
                Ok(()) => return cfg,
                Err(e) => warn!(path = %self.path.display(), error = %e, "discarding config"),
            }
        }

        let cfg = PracticeConfig::default();
        if let Err(e) = self.save(&cfg) {
            warn!(error = %e, "could not write default config");
        }
        cfg
    }

    fn save(&self, cfg: &PracticeConfig) -> Result<(), StoreError> {
        write_json(&self.path, cfg)
    }
}

/// Walks the user through every setting on a line-based terminal.
///
/// An empty answer keeps the current value; end of input keeps all the
/// remaining ones.
pub fn edit_config<R: BufRead, W: Write>(
    current: &PracticeConfig,
    input: &mut R,
    output: &mut W,
) -> io::Result<PracticeConfig> {
    let mut prompter = Prompter { input, output };
    let mut cfg = current.clone();

    writeln!(prompter.output, "Practice settings (press Enter to keep a value)")?;

    cfg.mode = prompter.ask(
        "Practice mode (standard/timed/chunk)",
        cfg.mode,
        |s| PracticeMode::parse(s).ok_or("expected standard, timed or chunk".to_string()),
    )?;
    cfg.min_digits = prompter.ask("Minimum digits", cfg.min_digits, |s| {
        parse_count(s, 1, MAX_DIGITS)
    })?;
    let min = cfg.min_digits;
    cfg.max_digits = prompter.ask("Maximum digits", cfg.max_digits.max(min), |s| {
        parse_count(s, min, MAX_DIGITS)
    })?;
    cfg.chunk_size = prompter.ask("Chunk size", cfg.chunk_size, |s| {
        parse_count(s, 1, MAX_DIGITS)
    })?;
    cfg.time_limit_seconds = prompter.ask("Time limit (seconds)", cfg.time_limit_seconds, |s| {
        parse_count(s, 1, MAX_TIME_LIMIT as usize).map(|n| n as u64)
    })?;
    cfg.show_timer = prompter.ask_bool("Show timer", cfg.show_timer)?;
    cfg.visual_aid = prompter.ask_bool("Visual aid", cfg.visual_aid)?;

    Ok(cfg)
}

fn parse_count(input: &str, min: usize, max: usize) -> Result<usize, String> {
    match input.parse::<usize>() {
        Ok(n) if (min..=max).contains(&n) => Ok(n),
        _ => Err(format!("expected a whole number from {min} to {max}")),
    }
}

struct Prompter<'a, R, W> {
    input: &'a mut R,
    output: &'a mut W,
}

impl<R: BufRead, W: Write> Prompter<'_, R, W> {
    fn ask<T, F>(&mut self, label: &str, current: T, parse: F) -> io::Result<T>
    where
        T: std::fmt::Display,
        F: Fn(&str) -> Result<T, String>,
    {
        loop {
            write!(self.output, "{label} [{current}]: ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                return Ok(current);
            }

            let answer = line.trim();
            if answer.is_empty() {
                return Ok(current);
            }
            match parse(answer) {
                Ok(value) => return Ok(value),
                Err(msg) => writeln!(self.output, "  {msg}")?,
            }
        }
    }

    fn ask_bool(&mut self, label: &str, current: bool) -> io::Result<bool> {
        let shown = if current { "yes" } else { "no" };
        let answer = self.ask(label, shown.to_string(), |s| {
            match s.to_ascii_lowercase().as_str() {
                "y" | "yes" | "true" | "on" => Ok("yes".to_string()),
                "n" | "no" | "false" | "off" => Ok("no".to_string()),
                _ => Err("expected yes or no".to_string()),
            }
        })?;
        Ok(answer == "yes")
    }
}
