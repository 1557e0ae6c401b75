//! Keystroke filtering for decimal amount fields.

use std::ops::Range;

/// A key press as seen by an amount field, before it edits the text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Keystroke {
    /// A key that inserts a character.
    Char(char),
    /// Navigation and editing keys (backspace, arrows, tab, ...).
    Control,
    /// Any key pressed together with Ctrl or Meta (copy, paste, select all).
    Chord,
}

/// Decides which keystrokes an amount field accepts: digits, a single
/// decimal point, and no more than `max_fraction_digits` after it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecimalFilter {
    max_fraction_digits: usize,
}

impl DecimalFilter {
    pub const fn new(max_fraction_digits: usize) -> Self {
        Self {
            max_fraction_digits,
        }
    }

    /// `true` when `key`, typed with the caret at the end of `current`, may
    /// be applied.
    pub fn accepts(&self, current: &str, key: Keystroke) -> bool {
        let end = current.chars().count();
        self.accepts_at(current, key, end..end)
    }

    /// `true` when `key` may replace `selection` (character positions; an
    /// empty range is the caret) in `current`. The result is judged as a
    /// whole, so digits can still go before the point of a full fraction.
    pub fn accepts_at(&self, current: &str, key: Keystroke, selection: Range<usize>) -> bool {
        let c = match key {
            Keystroke::Control | Keystroke::Chord => return true,
            Keystroke::Char(c) => c,
        };
        if !c.is_ascii_digit() && c != '.' {
            return false;
        }
        if c == '.' && self.max_fraction_digits == 0 {
            return false;
        }

        let end = selection.end.min(current.chars().count());
        let start = selection.start.min(end);
        let edited: String = current
            .chars()
            .take(start)
            .chain(std::iter::once(c))
            .chain(current.chars().skip(end))
            .collect();

        match edited.split_once('.') {
            None => true,
            Some((_, fraction)) => {
                !fraction.contains('.') && fraction.chars().count() <= self.max_fraction_digits
            }
        }
    }
}

impl Default for DecimalFilter {
    fn default() -> Self {
        Self::new(crate::amount::DECIMALS)
    }
}
