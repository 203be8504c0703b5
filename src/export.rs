//! Clipboard export and the transient notice shown after copying.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::error::ClipboardError;
use crate::normalize::Token;

#[cfg(windows)]
pub const NEWLINE: &str = "\r\n";
#[cfg(not(windows))]
pub const NEWLINE: &str = "\n";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportCase {
    #[default]
    AsIs,
    /// Upper-case initial letter on every entry.
    Capitalized,
}

/// One entry per line in list order, no trailing newline.
pub fn render(list: &[Token], case: ExportCase) -> String {
    let lines: Vec<String> = list
        .iter()
        .map(|token| match case {
            ExportCase::AsIs => token.to_string(),
            ExportCase::Capitalized => capitalize(token),
        })
        .collect();
    lines.join(NEWLINE)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Host-provided clipboard.
pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Copied,
    CopyFailed,
}

/// A notice that expires on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub expires_at: Instant,
}

impl Notice {
    pub fn new(kind: NoticeKind, now: Instant, duration: Duration) -> Self {
        Self {
            kind,
            expires_at: now + duration,
        }
    }

    pub fn is_active(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}
