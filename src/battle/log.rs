//! Append-only combat log shown to players
//!
//! Repeating the previous message in the same turn bumps its count instead
//! of adding a line.

use serde::{Deserialize, Serialize};

use crate::core::types::Turn;

/// One line of the combat log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogMessage {
    pub turn: Turn,
    pub message: String,
    pub count: u32,
}

impl LogMessage {
    /// Display form, e.g. `[T3] Axis turn ended (x2)`
    pub fn render(&self) -> String {
        if self.count > 1 {
            format!("[T{}] {} (x{})", self.turn, self.message, self.count)
        } else {
            format!("[T{}] {}", self.turn, self.message)
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CombatLog {
    messages: Vec<LogMessage>,
}

impl CombatLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: Turn, message: impl Into<String>) {
        let message = message.into();
        if let Some(last) = self.messages.last_mut() {
            if last.turn == turn && last.message == message {
                last.count += 1;
                return;
            }
        }
        self.messages.push(LogMessage {
            turn,
            message,
            count: 1,
        });
    }

    pub fn extend<I, S>(&mut self, turn: Turn, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for line in lines {
            self.push(turn, line);
        }
    }

    pub fn messages(&self) -> &[LogMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&LogMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Messages appended after the first `from` entries
    pub fn since(&self, from: usize) -> &[LogMessage] {
        &self.messages[from.min(self.messages.len())..]
    }
}
