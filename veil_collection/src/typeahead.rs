// Copyright 2025 the Veil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typeahead: focus a list item by typing the start of its label.

use alloc::string::String;

/// Default time, in milliseconds, before a pending search is cleared.
pub const DEFAULT_TYPEAHEAD_TIMEOUT: u64 = 1000;

/// Pending search string with a single expiry deadline.
///
/// Each push resets the deadline. A push after the deadline starts a new search.
#[derive(Clone, Debug)]
pub struct TypeaheadBuffer {
    search: String,
    expires_at: Option<u64>,
    timeout: u64,
}

impl Default for TypeaheadBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeaheadBuffer {
    /// An empty buffer with the default timeout.
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TYPEAHEAD_TIMEOUT)
    }

    /// An empty buffer clearing after `timeout` milliseconds of inactivity.
    pub fn with_timeout(timeout: u64) -> Self {
        Self {
            search: String::new(),
            expires_at: None,
            timeout,
        }
    }

    /// Append `ch` at time `now` and return the search to run.
    pub fn push(&mut self, ch: char, now: u64) -> &str {
        self.expire(now);
        self.search.push(ch);
        self.expires_at = Some(now.saturating_add(self.timeout));
        &self.search
    }

    /// Clear the buffer if its deadline has passed. Returns whether it was cleared.
    pub fn expire(&mut self, now: u64) -> bool {
        match self.expires_at {
            Some(deadline) if now >= deadline => {
                self.clear();
                true
            }
            _ => false,
        }
    }

    /// Clear the buffer and its deadline.
    pub fn clear(&mut self) {
        self.search.clear();
        self.expires_at = None;
    }

    /// Current search.
    pub fn as_str(&self) -> &str {
        &self.search
    }

    /// Whether no search is pending.
    pub fn is_empty(&self) -> bool {
        self.search.is_empty()
    }

    /// When the pending search clears, if any.
    pub fn expires_at(&self) -> Option<u64> {
        self.expires_at
    }
}

/// Find the item a typeahead `search` should move to.
///
/// Items are searched starting at `current` and wrapping around. A search made of
/// one repeated character (`"bb"`) is treated as that single character, and
/// single-character searches skip the current item, so repeated presses cycle
/// through items sharing an initial. Matching is a case-insensitive prefix test on
/// `text_of(item)`.
///
/// Returns the index of the match, or `None` if nothing matches or the match is
/// the current item.
pub fn typeahead_search<T>(
    search: &str,
    items: &[T],
    current: Option<usize>,
    text_of: impl Fn(&T) -> &str,
) -> Option<usize> {
    let first = search.chars().next()?;
    if items.is_empty() {
        return None;
    }
    let repeated = search.chars().nth(1).is_some() && search.chars().all(|c| c == first);
    let normalized = if repeated {
        &search[..first.len_utf8()]
    } else {
        search
    };
    let single = normalized.chars().nth(1).is_none();
    let start = current.filter(|&i| i < items.len()).unwrap_or(0);

    let found = (0..items.len())
        .map(|offset| (start + offset) % items.len())
        .filter(|&i| !(single && Some(i) == current))
        .find(|&i| starts_with_ignore_case(text_of(&items[i]), normalized))?;
    (Some(found) != current).then_some(found)
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    let mut text = text.chars().flat_map(char::to_lowercase);
    prefix
        .chars()
        .flat_map(char::to_lowercase)
        .all(|p| text.next() == Some(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRUIT: [&str; 3] = ["Apple", "Banana", "Blueberry"];

    fn search(s: &str, current: Option<usize>) -> Option<usize> {
        typeahead_search(s, &FRUIT, current, |t| *t)
    }

    #[test]
    fn repeated_presses_cycle_through_same_initial() {
        let mut buf = TypeaheadBuffer::new();
        let mut focused = 0;

        focused = search(buf.push('b', 0), Some(focused)).unwrap();
        assert_eq!(FRUIT[focused], "Banana");
        focused = search(buf.push('b', 300), Some(focused)).unwrap();
        assert_eq!(FRUIT[focused], "Blueberry");

        // Buffer expires; search starts over from the current item.
        assert!(buf.expire(1300));
        focused = search(buf.push('b', 1300), Some(focused)).unwrap();
        assert_eq!(FRUIT[focused], "Banana");
    }

    #[test]
    fn multi_character_search_keeps_current_match() {
        assert_eq!(search("bl", Some(2)), None);
        assert_eq!(search("bl", Some(0)), Some(2));
        assert_eq!(search("BAN", None), Some(1));
    }

    #[test]
    fn no_match_and_empty_inputs() {
        assert_eq!(search("z", Some(0)), None);
        assert_eq!(search("", Some(0)), None);
        let empty: [&str; 0] = [];
        assert_eq!(typeahead_search("a", &empty, None, |t| *t), None);
        // Only the current item matches a single character: nothing to move to.
        assert_eq!(search("a", Some(0)), None);
    }

    #[test]
    fn push_resets_deadline() {
        let mut buf = TypeaheadBuffer::with_timeout(100);
        buf.push('a', 0);
        buf.push('b', 90);
        assert_eq!(buf.expires_at(), Some(190));
        assert!(!buf.expire(150));
        assert_eq!(buf.as_str(), "ab");
        assert_eq!(buf.push('c', 200), "c");
        buf.clear();
        assert!(buf.is_empty());
    }
}
