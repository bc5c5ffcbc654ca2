// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typeahead: jump to an item by typing the start of its label.
//!
//! Printable key presses accumulate into a prefix buffer that resets after a quiet period
//! (500ms by default). Two behaviors fall out of the buffer contents:
//!
//! - **Cycling**: pressing the same character repeatedly ("b", "b", "b") visits every item whose
//!   label starts with that character in turn.
//! - **Prefix search**: differing characters ("b", "a", "n") build a multi-character prefix.
//!
//! Both searches start just after the current item and wrap around to the start, so the current
//! item is the last candidate considered. Matching is case-insensitive.
//!
//! ## Usage
//!
//! ```
//! use understory_event_state::typeahead::TypeaheadState;
//!
//! let labels = ["Apple", "Banana", "Blueberry", "Cherry"];
//! let mut state = TypeaheadState::new();
//!
//! // "b" from "Apple" lands on "Banana"; a second "b" cycles to "Blueberry".
//! let q = state.on_key('b', 1_000);
//! let hit = q.search(&labels, |l| *l, Some(0));
//! assert_eq!(hit, Some(1));
//! let q = state.on_key('b', 1_100);
//! assert_eq!(q.search(&labels, |l| *l, hit), Some(2));
//!
//! // After the quiet period the buffer starts over.
//! let q = state.on_key('c', 5_000);
//! assert_eq!(q.search(&labels, |l| *l, Some(2)), Some(3));
//! ```

use alloc::string::String;

/// Quiet period after which the buffer resets, in milliseconds.
pub const DEFAULT_RESET_MS: u64 = 500;

/// Prefix buffer state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeaheadState {
    buffer: String,
    last_key: Option<u64>,
    /// Quiet period after which the next key starts a fresh buffer (milliseconds).
    pub reset_ms: u64,
}

impl Default for TypeaheadState {
    fn default() -> Self {
        Self::new()
    }
}

/// What to look for after a key press.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Query<'a> {
    /// Same character pressed repeatedly: cycle through labels starting with it.
    Cycle(char),
    /// Multi-character prefix.
    Prefix(&'a str),
}

impl TypeaheadState {
    /// Create a state with the default 500ms reset.
    pub fn new() -> Self {
        Self::with_reset(DEFAULT_RESET_MS)
    }

    /// Create a state with a custom reset period.
    ///
    /// # Arguments
    /// * `reset_ms` - Quiet period in milliseconds after which the buffer starts over
    pub fn with_reset(reset_ms: u64) -> Self {
        Self {
            buffer: String::new(),
            last_key: None,
            reset_ms,
        }
    }

    /// Record a key press and return the query it produces.
    ///
    /// # Arguments
    /// * `ch` - The printable character typed
    /// * `timestamp` - Event timestamp in milliseconds
    pub fn on_key(&mut self, ch: char, timestamp: u64) -> Query<'_> {
        let expired = self
            .last_key
            .is_none_or(|last| timestamp.saturating_sub(last) > self.reset_ms);
        if expired {
            self.buffer.clear();
        }
        self.last_key = Some(timestamp);
        self.buffer.push(ch);

        let mut chars = self.buffer.chars();
        let first = chars.next().unwrap_or(ch);
        if chars.all(|c| c == first) {
            Query::Cycle(first)
        } else {
            Query::Prefix(&self.buffer)
        }
    }

    /// Current buffer contents.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Whether the buffer is still live at `timestamp`.
    pub fn is_active(&self, timestamp: u64) -> bool {
        self.last_key
            .is_some_and(|last| timestamp.saturating_sub(last) <= self.reset_ms)
    }

    /// Forget the buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.last_key = None;
    }
}

impl Query<'_> {
    /// Whether `label` matches this query.
    pub fn matches(&self, label: &str) -> bool {
        match *self {
            Self::Cycle(ch) => {
                let mut needle = [0_u8; 4];
                starts_with_ignore_case(label, ch.encode_utf8(&mut needle))
            }
            Self::Prefix(prefix) => starts_with_ignore_case(label, prefix),
        }
    }

    /// Index of the first matching item after `current`, wrapping around.
    ///
    /// With no current item the search starts at the first item. The current item itself is
    /// checked last, so a lone match keeps focus where it is.
    ///
    /// # Arguments
    /// * `items` - Items in navigation order
    /// * `label` - Maps an item to its label
    /// * `current` - Index of the currently focused item
    pub fn search<'i, K>(
        &self,
        items: &'i [K],
        label: impl Fn(&'i K) -> &'i str,
        current: Option<usize>,
    ) -> Option<usize> {
        let len = items.len();
        let start = current.map_or(0, |c| c + 1);
        (0..len)
            .map(|offset| (start + offset) % len)
            .find(|&idx| self.matches(label(&items[idx])))
    }
}

fn starts_with_ignore_case(label: &str, prefix: &str) -> bool {
    let mut label = label.chars().flat_map(char::to_lowercase);
    prefix
        .chars()
        .flat_map(char::to_lowercase)
        .all(|p| label.next() == Some(p))
}
