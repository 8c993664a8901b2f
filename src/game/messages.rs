//! # Message Log
//!
//! Player-facing log of what happened. Identical consecutive messages stack.

use crate::game::world::Color;
use serde::{Deserialize, Serialize};

/// Foreground colors used by the log.
pub mod palette {
    use crate::game::world::Color;

    pub const WHITE: Color = (255, 255, 255);
    pub const PLAYER_ATTACK: Color = (224, 224, 224);
    pub const ENEMY_ATTACK: Color = (255, 192, 192);
    pub const NEEDS_TARGET: Color = (63, 255, 255);
    pub const STATUS_EFFECT: Color = (63, 255, 63);
    pub const DESCEND: Color = (159, 63, 255);
    pub const PLAYER_DIE: Color = (255, 48, 48);
    pub const ENEMY_DIE: Color = (255, 160, 48);
    pub const INVALID: Color = (255, 255, 0);
    pub const IMPOSSIBLE: Color = (128, 128, 128);
    pub const HEALTH_RECOVERED: Color = (0, 255, 0);
    pub const WELCOME: Color = (32, 160, 255);
    pub const CORPSE: Color = (191, 0, 0);
}

/// One log line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub fg: Color,
    pub count: u32,
}

impl Message {
    pub fn new(text: impl Into<String>, fg: Color) -> Self {
        Self {
            text: text.into(),
            fg,
            count: 1,
        }
    }

    /// Text with the stack counter appended when repeated.
    ///
    /// # Examples
    ///
    /// ```
    /// use fleshtower::{Message, palette};
    ///
    /// let mut message = Message::new("The orc attacks", palette::WHITE);
    /// assert_eq!(message.full_text(), "The orc attacks");
    /// message.count = 3;
    /// assert_eq!(message.full_text(), "The orc attacks (x3)");
    /// ```
    pub fn full_text(&self) -> String {
        if self.count > 1 {
            format!("{} (x{})", self.text, self.count)
        } else {
            self.text.clone()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageLog {
    pub messages: Vec<Message>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message, stacking it onto the last one if the text matches.
    pub fn add_message(&mut self, text: impl Into<String>, fg: Color) {
        let text = text.into();
        if let Some(last) = self.messages.last_mut() {
            if last.text == text {
                last.count += 1;
                return;
            }
        }
        self.messages.push(Message::new(text, fg));
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// The most recent `count` messages, oldest first.
    pub fn recent(&self, count: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(count);
        &self.messages[start..]
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// True if any message in the log contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.messages.iter().any(|m| m.text.contains(needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consecutive_messages_stack() {
        let mut log = MessageLog::new();
        log.add_message("Ouch", palette::WHITE);
        log.add_message("Ouch", palette::WHITE);
        log.add_message("Bite", palette::WHITE);
        log.add_message("Ouch", palette::WHITE);
        assert_eq!(log.len(), 3);
        assert_eq!(log.messages[0].count, 2);
        assert_eq!(log.messages[0].full_text(), "Ouch (x2)");
        assert_eq!(log.last().map(|m| m.count), Some(1));
    }

    #[test]
    fn test_recent_window() {
        let mut log = MessageLog::new();
        for i in 0..5 {
            log.add_message(format!("line {}", i), palette::WHITE);
        }
        let recent = log.recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].text, "line 3");
        assert_eq!(log.recent(10).len(), 5);
        assert!(log.contains("line 4"));
    }
}
