use std::collections::VecDeque;
use std::io;
use std::ops::{Deref, DerefMut};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::warn;

/// A keystroke as the practice loop cares about it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyInput {
    Char(char),
    /// Ctrl+C or Esc
    Interrupt,
    Other,
}

impl From<KeyEvent> for KeyInput {
    fn from(key: KeyEvent) -> Self {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                KeyInput::Interrupt
            }
            KeyCode::Esc => KeyInput::Interrupt,
            KeyCode::Char(c) => KeyInput::Char(c),
            _ => KeyInput::Other,
        }
    }
}

/// Source of single keystrokes
pub trait KeySource {
    fn enter_raw_mode(&mut self) -> io::Result<()>;
    fn leave_raw_mode(&mut self) -> io::Result<()>;

    /// Waits for the next key. `None` as timeout blocks until one arrives;
    /// `Ok(None)` means the timeout expired first.
    fn poll_key(&mut self, timeout: Option<Duration>) -> io::Result<Option<KeyInput>>;
}

/// Production key source reading the controlling terminal through crossterm
#[derive(Debug, Default)]
pub struct CrosstermKeySource;

impl KeySource for CrosstermKeySource {
    fn enter_raw_mode(&mut self) -> io::Result<()> {
        crossterm::terminal::enable_raw_mode()
    }

    fn leave_raw_mode(&mut self) -> io::Result<()> {
        crossterm::terminal::disable_raw_mode()
    }

    fn poll_key(&mut self, timeout: Option<Duration>) -> io::Result<Option<KeyInput>> {
        let deadline = timeout.map(|t| Instant::now() + t);
        loop {
            if let Some(deadline) = deadline {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if !event::poll(remaining)? {
                    return Ok(None);
                }
            }
            match event::read()? {
                CtEvent::Key(key) if key.kind != KeyEventKind::Release => {
                    return Ok(Some(key.into()))
                }
                _ => {}
            }
        }
    }
}

/// Raw mode held for as long as the guard lives. Dropping it restores the
/// terminal on every path out of the scope, errors and early returns
/// included.
pub struct RawModeGuard<'a, K: KeySource + ?Sized> {
    source: &'a mut K,
}

impl<'a, K: KeySource + ?Sized> RawModeGuard<'a, K> {
    pub fn acquire(source: &'a mut K) -> io::Result<Self> {
        source.enter_raw_mode()?;
        Ok(Self { source })
    }
}

impl<K: KeySource + ?Sized> Deref for RawModeGuard<'_, K> {
    type Target = K;

    fn deref(&self) -> &K {
        self.source
    }
}

impl<K: KeySource + ?Sized> DerefMut for RawModeGuard<'_, K> {
    fn deref_mut(&mut self) -> &mut K {
        self.source
    }
}

impl<K: KeySource + ?Sized> Drop for RawModeGuard<'_, K> {
    fn drop(&mut self) {
        if let Err(e) = self.source.leave_raw_mode() {
            warn!(error = %e, "failed to restore terminal mode");
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DigitRead {
    Digit(char),
    Interrupted,
    TimedOut,
}

/// Blocks until a decimal digit is typed, skipping every other key.
///
/// With a deadline the wait gives up once it passes.
pub fn read_digit<K: KeySource + ?Sized>(
    source: &mut K,
    deadline: Option<Instant>,
) -> io::Result<DigitRead> {
    loop {
        let timeout = match deadline {
            Some(deadline) => {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    return Ok(DigitRead::TimedOut);
                }
                Some(remaining)
            }
            None => None,
        };

        match source.poll_key(timeout)? {
            Some(KeyInput::Char(c)) if c.is_ascii_digit() => return Ok(DigitRead::Digit(c)),
            Some(KeyInput::Interrupt) => return Ok(DigitRead::Interrupted),
            Some(_) | None => continue,
        }
    }
}

/// Discards keys until `duration` has passed. Returns true if the user
/// interrupted meanwhile.
pub fn drain_for<K: KeySource + ?Sized>(source: &mut K, duration: Duration) -> io::Result<bool> {
    if duration.is_zero() {
        return Ok(false);
    }

    let deadline = Instant::now() + duration;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Ok(false);
        }
        if let Some(KeyInput::Interrupt) = source.poll_key(Some(remaining))? {
            return Ok(true);
        }
    }
}

/// One step of a scripted key sequence
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScriptStep {
    Key(KeyInput),
    /// The user types nothing until the read times out. A read without a
    /// timeout sees an interrupt instead.
    Stall,
}

/// Key source for tests, replaying a fixed script.
///
/// When the script runs out every read reports an interrupt, so a session
/// driven by it always terminates. Raw mode changes are only counted.
#[derive(Debug, Default)]
pub struct ScriptedKeySource {
    steps: VecDeque<ScriptStep>,
    pub raw_enters: usize,
    pub raw_leaves: usize,
}

impl ScriptedKeySource {
    pub fn new<I: IntoIterator<Item = ScriptStep>>(steps: I) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            raw_enters: 0,
            raw_leaves: 0,
        }
    }

    /// Script that types `text` one character at a time
    pub fn typing(text: &str) -> Self {
        Self::new(text.chars().map(|c| ScriptStep::Key(KeyInput::Char(c))))
    }

    pub fn then(mut self, step: ScriptStep) -> Self {
        self.steps.push_back(step);
        self
    }

    pub fn then_typing(mut self, text: &str) -> Self {
        self.steps
            .extend(text.chars().map(|c| ScriptStep::Key(KeyInput::Char(c))));
        self
    }

    pub fn remaining(&self) -> usize {
        self.steps.len()
    }

    pub fn in_raw_mode(&self) -> bool {
        self.raw_enters > self.raw_leaves
    }
}

impl KeySource for ScriptedKeySource {
    fn enter_raw_mode(&mut self) -> io::Result<()> {
        self.raw_enters += 1;
        Ok(())
    }

    fn leave_raw_mode(&mut self) -> io::Result<()> {
        self.raw_leaves += 1;
        Ok(())
    }

    fn poll_key(&mut self, timeout: Option<Duration>) -> io::Result<Option<KeyInput>> {
        match self.steps.pop_front() {
            Some(ScriptStep::Key(key)) => Ok(Some(key)),
            Some(ScriptStep::Stall) => match timeout {
                Some(timeout) => {
                    std::thread::sleep(timeout);
                    Ok(None)
                }
                None => Ok(Some(KeyInput::Interrupt)),
            },
            None => Ok(Some(KeyInput::Interrupt)),
        }
    }
}
