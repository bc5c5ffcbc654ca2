// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recovery: replacement focus when the focused item leaves its zone.

use understory_zone::RecoveryPolicy;

/// Compute the item that should take focus after `removed` left the order.
///
/// `previous` is the order before the removal and `current` the order after it. The removed
/// item's index in `previous` selects the replacement in `current`:
///
/// - [`RecoveryPolicy::Next`]: the item now at that index, clamped to the last index.
/// - [`RecoveryPolicy::Prev`]: the item at the index before it, clamped to the first index.
/// - [`RecoveryPolicy::Nearest`]: `Next` while an item follows, else `Prev`.
///
/// Returns `None` when `current` is empty. When `removed` was not in `previous` the first item
/// of `current` is used.
pub fn recover<K>(previous: &[K], current: &[K], removed: &K, policy: RecoveryPolicy) -> Option<K>
where
    K: PartialEq + Clone,
{
    let last = current.len().checked_sub(1)?;
    let Some(index) = previous.iter().position(|k| k == removed) else {
        return current.first().cloned();
    };

    let next = index.min(last);
    let prev = index.saturating_sub(1).min(last);
    let pick = match policy {
        RecoveryPolicy::Next => next,
        RecoveryPolicy::Prev => prev,
        RecoveryPolicy::Nearest if index <= last => next,
        RecoveryPolicy::Nearest => prev,
    };
    current.get(pick).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_takes_the_following_item() {
        assert_eq!(
            recover(&["a", "b", "c"], &["a", "c"], &"b", RecoveryPolicy::Next),
            Some("c")
        );
    }

    #[test]
    fn next_at_the_tail_falls_back_to_the_new_last_item() {
        assert_eq!(
            recover(&["a", "b", "c"], &["a", "b"], &"c", RecoveryPolicy::Next),
            Some("b")
        );
    }

    #[test]
    fn prev_takes_the_preceding_item_and_clamps_at_the_head() {
        assert_eq!(
            recover(&["a", "b", "c"], &["a", "c"], &"b", RecoveryPolicy::Prev),
            Some("a")
        );
        assert_eq!(
            recover(&["a", "b", "c"], &["b", "c"], &"a", RecoveryPolicy::Prev),
            Some("b")
        );
    }

    #[test]
    fn nearest_prefers_next_then_prev() {
        assert_eq!(
            recover(&["a", "b", "c"], &["a", "c"], &"b", RecoveryPolicy::Nearest),
            Some("c")
        );
        assert_eq!(
            recover(&["a", "b", "c"], &["a", "b"], &"c", RecoveryPolicy::Nearest),
            Some("b")
        );
    }

    #[test]
    fn empty_zone_recovers_to_nothing() {
        assert_eq!(recover(&["a"], &[], &"a", RecoveryPolicy::Nearest), None);
    }

    #[test]
    fn unknown_removed_item_uses_the_first_item() {
        assert_eq!(
            recover(&["a", "b"], &["a", "b"], &"z", RecoveryPolicy::Prev),
            Some("a")
        );
    }
}
