use crate::app_dirs::AppContext;
use crate::config::PracticeMode;
use crate::error::StoreError;
use crate::storage::{read_json, write_json};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Sessions kept in the history, newest last
pub const HISTORY_LIMIT: usize = 100;

/// One finished (or interrupted) practice session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionRecord {
    pub timestamp: DateTime<Local>,
    pub mode: PracticeMode,
    pub max_level_reached: usize,
    pub correct_digit_count: usize,
    pub duration_seconds: f64,
}

impl SessionRecord {
    /// Correct digits per minute, if the session lasted long enough to tell
    pub fn digits_per_minute(&self) -> Option<f64> {
        if self.duration_seconds > 0.0 && self.correct_digit_count > 0 {
            Some(self.correct_digit_count as f64 * 60.0 / self.duration_seconds)
        } else {
            None
        }
    }
}

/// Lifetime practice performance
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PracticeStats {
    pub max_digits_reached: usize,
    pub total_digits_correct: usize,
    pub total_sessions: usize,
    pub last_session_timestamp: Option<DateTime<Local>>,
    /// seconds, fastest passed level in timed mode
    pub fastest_time: Option<f64>,
    /// digits per minute, best session
    pub best_speed: Option<f64>,
    pub history: Vec<SessionRecord>,
}

impl PracticeStats {
    /// Appends to the history, dropping the oldest entries past the limit
    pub fn push_history(&mut self, record: SessionRecord) {
        self.history.push(record);
        if self.history.len() > HISTORY_LIMIT {
            let excess = self.history.len() - HISTORY_LIMIT;
            self.history.drain(..excess);
        }
    }

    /// Folds a session into the lifetime totals.
    ///
    /// `fastest_attempt` is the quickest passed timed level of the session,
    /// in seconds.
    pub fn record_session(&mut self, record: SessionRecord, fastest_attempt: Option<f64>) {
        self.max_digits_reached = self.max_digits_reached.max(record.max_level_reached);
        self.total_digits_correct += record.correct_digit_count;
        self.total_sessions += 1;
        self.last_session_timestamp = Some(record.timestamp);

        if let Some(speed) = record.digits_per_minute() {
            if self.best_speed.map_or(true, |best| speed > best) {
                self.best_speed = Some(speed);
            }
        }
        if let Some(secs) = fastest_attempt {
            if self.fastest_time.map_or(true, |best| secs < best) {
                self.fastest_time = Some(secs);
            }
        }

        self.push_history(record);
    }
}

pub trait StatsStore {
    fn load(&self) -> PracticeStats;
    fn save(&self, stats: &PracticeStats) -> Result<(), StoreError>;
}

#[derive(Debug, Clone)]
pub struct FileStatsStore {
    path: PathBuf,
}

impl FileStatsStore {
    pub fn new(ctx: &AppContext) -> Self {
        Self::with_path(&ctx.stats_file)
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl StatsStore for FileStatsStore {
    fn load(&self) -> PracticeStats {
        if let Some(stats) = read_json::<PracticeStats>(&self.path) {
            return stats;
        }

        let stats = PracticeStats::default();
        if let Err(e) = self.save(&stats) {
            warn!(error = %e, "could not write fresh statistics");
        }
        stats
    }

    fn save(&self, stats: &PracticeStats) -> Result<(), StoreError> {
        write_json(&self.path, stats)
    }
}
