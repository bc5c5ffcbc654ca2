// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Selection: pure selection transitions over an item order.
//!
//! A [`Selection`] is an ordered list of selected keys plus an optional **anchor**, the pivot
//! for range operations. Every function here takes the current selection by reference and
//! returns the next one; nothing is mutated in place and nothing fails. Invalid input degrades
//! to a safe result (an anchor that left the order behaves as no anchor; a target that is not in
//! the order leaves the selection unchanged).
//!
//! The primitives are:
//!
//! - [`single`]: exactly `{target}`, or empty when re-selecting the sole selected key and
//!   deselection is allowed.
//! - [`toggle`]: add or remove `target`, refusing moves that would violate the count bounds.
//! - [`range`]: the contiguous slice between the anchor and `target`, keeping the anchor so that
//!   repeated extension grows and shrinks one continuous range.
//! - [`replace`], [`select_all`], [`clear`].
//!
//! [`apply`] gates a requested [`SelectOp`] through a zone's
//! [`SelectConfig`](understory_zone::SelectConfig), and [`follow_focus`] implements
//! selection-follows-focus.
//!
//! ```rust
//! use understory_selection::{range, Selection};
//!
//! let order = ["a", "b", "c", "d"];
//! let start = Selection::only("a");
//!
//! // Shift+Down three times, then Shift+Up twice.
//! let wide = range(&start, &order, &"d");
//! assert_eq!(wide.selected, ["a", "b", "c", "d"]);
//! let narrow = range(&wide, &order, &"b");
//! assert_eq!(narrow.selected, ["a", "b"]);
//! assert_eq!(narrow.anchor, Some("a"));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;

use understory_zone::{SelectConfig, SelectionMode};

/// Selected keys in selection order, plus the range anchor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection<K> {
    /// Selected keys.
    pub selected: Vec<K>,
    /// Pivot for range operations.
    pub anchor: Option<K>,
}

impl<K> Default for Selection<K> {
    fn default() -> Self {
        Self {
            selected: Vec::new(),
            anchor: None,
        }
    }
}

impl<K: Clone> Selection<K> {
    /// An empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// A selection of exactly `key`, anchored there.
    pub fn only(key: K) -> Self {
        Self {
            selected: alloc::vec![key.clone()],
            anchor: Some(key),
        }
    }

    /// Build from parts, normalizing the anchor for empty and singular selections.
    pub fn from_parts(selected: Vec<K>, anchor: Option<K>) -> Self
    where
        K: PartialEq,
    {
        Self { selected, anchor }.normalized()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Number of selected keys.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Whether `key` is selected.
    pub fn contains(&self, key: &K) -> bool
    where
        K: PartialEq,
    {
        self.selected.contains(key)
    }

    // Empty clears the anchor; a single key becomes it. A stale anchor in a larger selection is
    // left for `range` to treat as absent.
    fn normalized(mut self) -> Self
    where
        K: PartialEq,
    {
        match self.selected.as_slice() {
            [] => self.anchor = None,
            [only] => self.anchor = Some(only.clone()),
            _ => {}
        }
        self
    }
}

/// Requested selection operation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SelectOp {
    /// Plain click or Space: replace (or toggle, in toggle zones).
    #[default]
    Replace,
    /// Ctrl/Meta click: flip membership.
    Toggle,
    /// Shift click or Shift+Arrow: extend from the anchor.
    Range,
    /// Exactly one item, deselecting it when it is already the selection.
    Single,
}

/// Count limits for [`toggle`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Bounds {
    /// Fewest keys that may remain selected.
    pub min: usize,
    /// Most keys that may be selected.
    pub max: Option<usize>,
}

impl Default for Bounds {
    fn default() -> Self {
        Self { min: 0, max: None }
    }
}

impl Bounds {
    /// Bounds implied by a zone's selection config.
    pub fn from_config(config: &SelectConfig) -> Self {
        Self {
            min: config.min(),
            max: config.max,
        }
    }

    fn allows(&self, len: usize) -> bool {
        len >= self.min && self.max.is_none_or(|max| len <= max)
    }
}

/// Select exactly `target`.
///
/// When `target` is already the whole selection and `allow_deselect` is set, the selection is
/// cleared instead.
pub fn single<K: Clone + PartialEq>(
    current: &Selection<K>,
    target: &K,
    allow_deselect: bool,
) -> Selection<K> {
    if allow_deselect && current.selected.as_slice() == core::slice::from_ref(target) {
        return Selection::new();
    }
    Selection::only(target.clone())
}

/// Add `target` when absent, remove it when present.
///
/// Returns the selection unchanged when the result would fall outside `bounds`. The anchor
/// moves to an added key and is normalized on removal.
pub fn toggle<K: Clone + PartialEq>(
    current: &Selection<K>,
    target: &K,
    bounds: Bounds,
) -> Selection<K> {
    let mut next = current.clone();
    if let Some(pos) = next.selected.iter().position(|k| k == target) {
        next.selected.remove(pos);
        if next.anchor.as_ref() == Some(target) {
            next.anchor = next.selected.last().cloned();
        }
    } else {
        next.selected.push(target.clone());
        next.anchor = Some(target.clone());
    }
    if !bounds.allows(next.selected.len()) {
        return current.clone();
    }
    next.normalized()
}

/// Select the contiguous slice of `order` between the anchor and `target`, inclusive.
///
/// The anchor is kept. Without an anchor, or when the anchor is no longer in `order`, only
/// `target` is selected and becomes the anchor. A `target` outside `order` is a no-op.
pub fn range<K: Clone + PartialEq>(current: &Selection<K>, order: &[K], target: &K) -> Selection<K> {
    let Some(to) = order.iter().position(|k| k == target) else {
        return current.clone();
    };
    let from = current
        .anchor
        .as_ref()
        .and_then(|a| order.iter().position(|k| k == a));
    let Some(from) = from else {
        return Selection::only(target.clone());
    };
    let (lo, hi) = if from <= to { (from, to) } else { (to, from) };
    Selection {
        selected: order[lo..=hi].to_vec(),
        anchor: Some(order[from].clone()),
    }
}

/// Select exactly `target`.
pub fn replace<K: Clone>(target: &K) -> Selection<K> {
    Selection::only(target.clone())
}

/// Select every key of `order`, unless that exceeds `max`.
///
/// The anchor is kept when it is still in `order`, else it becomes the first key.
pub fn select_all<K: Clone + PartialEq>(
    current: &Selection<K>,
    order: &[K],
    max: Option<usize>,
) -> Selection<K> {
    if max.is_some_and(|max| order.len() > max) {
        return current.clone();
    }
    let anchor = current
        .anchor
        .clone()
        .filter(|a| order.contains(a))
        .or_else(|| order.first().cloned());
    Selection::from_parts(order.to_vec(), anchor)
}

/// Clear the selection, unless at least `min` keys must stay selected.
pub fn clear<K: Clone>(current: &Selection<K>, min: usize) -> Selection<K> {
    if min > 0 && !current.selected.is_empty() {
        return current.clone();
    }
    Selection::new()
}

/// Apply `op` on `target` under a zone's selection policy.
///
/// - [`SelectionMode::None`]: never changes anything.
/// - [`SelectionMode::Single`]: every op selects only `target`. Re-selecting it with `Replace`,
///   `Toggle` or `Single` clears unless `disallow_empty` is set; `Range` always replaces.
/// - [`SelectionMode::Multiple`]: `Toggle` toggles within bounds; `Range` extends from the anchor
///   when `range` is enabled and replaces otherwise; `Replace` toggles in `toggle` zones and
///   replaces otherwise.
///
/// A `target` that is not in `order` leaves the selection unchanged.
pub fn apply<K: Clone + PartialEq>(
    config: &SelectConfig,
    current: &Selection<K>,
    order: &[K],
    target: &K,
    op: SelectOp,
) -> Selection<K> {
    if !order.contains(target) {
        return current.clone();
    }
    let allow_deselect = !config.disallow_empty;
    match config.mode {
        SelectionMode::None => current.clone(),
        SelectionMode::Single => match op {
            SelectOp::Toggle | SelectOp::Single | SelectOp::Replace => {
                single(current, target, allow_deselect)
            }
            SelectOp::Range => replace(target),
        },
        SelectionMode::Multiple => {
            let bounds = Bounds::from_config(config);
            let within = |next: Selection<K>| {
                if bounds.allows(next.len()) {
                    next
                } else {
                    current.clone()
                }
            };
            match op {
                SelectOp::Toggle => toggle(current, target, bounds),
                SelectOp::Replace if config.toggle => toggle(current, target, bounds),
                SelectOp::Range if config.range => within(range(current, order, target)),
                SelectOp::Single => within(single(current, target, allow_deselect)),
                SelectOp::Replace | SelectOp::Range => replace(target),
            }
        }
    }
}

/// Selection after focus moved to `focused`, for zones with `follow_focus`.
///
/// Returns `None` when the zone does not follow focus, so callers can tell "unchanged" from
/// "replaced with the same key".
pub fn follow_focus<K: Clone>(config: &SelectConfig, focused: &K) -> Option<Selection<K>> {
    (config.follow_focus && config.mode != SelectionMode::None).then(|| replace(focused))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    const ORDER: [&str; 5] = ["a", "b", "c", "d", "e"];

    fn multiple() -> SelectConfig {
        SelectConfig {
            mode: SelectionMode::Multiple,
            range: true,
            ..SelectConfig::default()
        }
    }

    #[test]
    fn single_selects_exactly_the_target() {
        let sel = Selection::from_parts(vec!["a", "b"], Some("a"));
        let next = single(&sel, &"c", true);
        assert_eq!(next, Selection::only("c"));
    }

    #[test]
    fn single_deselects_only_when_allowed() {
        let sel = Selection::only("b");
        assert!(single(&sel, &"b", true).is_empty());
        assert_eq!(single(&sel, &"b", false), sel);
    }

    #[test]
    fn toggle_is_symmetric() {
        let empty = Selection::new();
        let once = toggle(&empty, &"b", Bounds::default());
        assert_eq!(once.selected, ["b"]);
        let twice = toggle(&once, &"b", Bounds::default());
        assert_eq!(twice, empty);
    }

    #[test]
    fn toggle_respects_bounds() {
        let sel = Selection::from_parts(vec!["a", "b"], Some("b"));
        let capped = Bounds {
            min: 0,
            max: Some(2),
        };
        assert_eq!(toggle(&sel, &"c", capped), sel);

        let floor = Bounds { min: 1, max: None };
        let one = Selection::only("a");
        assert_eq!(toggle(&one, &"a", floor), one);
    }

    #[test]
    fn toggle_reanchors_when_the_anchor_is_removed() {
        let sel = Selection::from_parts(vec!["a", "b", "c"], Some("c"));
        let next = toggle(&sel, &"c", Bounds::default());
        assert_eq!(next.anchor, Some("b"));

        let next = toggle(&next, &"b", Bounds::default());
        assert_eq!(next.anchor, Some("a"), "a sole remaining key becomes the anchor");
    }

    #[test]
    fn range_keeps_its_anchor() {
        let start = Selection::only("b");
        let down = range(&start, &ORDER, &"d");
        assert_eq!(down.selected, ["b", "c", "d"]);
        let up = range(&down, &ORDER, &"a");
        assert_eq!(up.selected, ["a", "b"]);
        assert_eq!(up.anchor, Some("b"));
    }

    #[test]
    fn range_without_a_valid_anchor_selects_only_the_target() {
        let stale = Selection::from_parts(vec!["x", "y"], Some("x"));
        assert_eq!(range(&stale, &ORDER, &"c"), Selection::only("c"));
        assert_eq!(range(&Selection::new(), &ORDER, &"c"), Selection::only("c"));
    }

    #[test]
    fn select_all_and_clear() {
        let sel = Selection::only("c");
        let all = select_all(&sel, &ORDER, None);
        assert_eq!(all.selected, ORDER);
        assert_eq!(all.anchor, Some("c"));
        assert_eq!(select_all(&sel, &ORDER, Some(3)), sel);

        assert!(clear(&all, 0).is_empty());
        assert_eq!(clear(&all, 1), all);
    }

    #[test]
    fn apply_ignores_zones_without_selection() {
        let config = SelectConfig::default();
        let sel = Selection::new();
        assert_eq!(apply(&config, &sel, &ORDER, &"a", SelectOp::Replace), sel);
    }

    #[test]
    fn apply_single_mode_degrades_every_op() {
        let config = SelectConfig {
            mode: SelectionMode::Single,
            ..SelectConfig::default()
        };
        let sel = Selection::only("a");
        let next = apply(&config, &sel, &ORDER, &"c", SelectOp::Range);
        assert_eq!(next, Selection::only("c"));
        let cleared = apply(&config, &next, &ORDER, &"c", SelectOp::Toggle);
        assert!(cleared.is_empty());
    }

    #[test]
    fn apply_single_mode_replace_on_the_selected_item_clears() {
        let config = SelectConfig {
            mode: SelectionMode::Single,
            ..SelectConfig::default()
        };
        let sel = Selection::only("b");
        assert!(apply(&config, &sel, &ORDER, &"b", SelectOp::Replace).is_empty());
        assert_eq!(
            apply(&config, &sel, &ORDER, &"b", SelectOp::Range),
            Selection::only("b")
        );

        let kept = SelectConfig {
            disallow_empty: true,
            ..config
        };
        assert_eq!(apply(&kept, &sel, &ORDER, &"b", SelectOp::Replace), sel);
    }

    #[test]
    fn apply_multiple_routes_ops() {
        let config = multiple();
        let sel = Selection::only("a");
        let ranged = apply(&config, &sel, &ORDER, &"c", SelectOp::Range);
        assert_eq!(ranged.selected, ["a", "b", "c"]);
        let toggled = apply(&config, &ranged, &ORDER, &"e", SelectOp::Toggle);
        assert_eq!(toggled.selected, ["a", "b", "c", "e"]);
        let replaced = apply(&config, &toggled, &ORDER, &"d", SelectOp::Replace);
        assert_eq!(replaced, Selection::only("d"));
    }

    #[test]
    fn apply_range_disabled_replaces() {
        let config = SelectConfig {
            range: false,
            ..multiple()
        };
        let next = apply(&config, &Selection::only("a"), &ORDER, &"c", SelectOp::Range);
        assert_eq!(next, Selection::only("c"));
    }

    #[test]
    fn apply_toggle_zone_toggles_on_replace() {
        let config = SelectConfig {
            toggle: true,
            ..multiple()
        };
        let sel = Selection::only("a");
        let next = apply(&config, &sel, &ORDER, &"b", SelectOp::Replace);
        assert_eq!(next.selected, ["a", "b"]);
    }

    #[test]
    fn apply_range_over_max_is_refused() {
        let config = SelectConfig {
            max: Some(2),
            ..multiple()
        };
        let sel = Selection::only("a");
        assert_eq!(apply(&config, &sel, &ORDER, &"d", SelectOp::Range), sel);
    }

    #[test]
    fn apply_unknown_target_is_a_no_op() {
        let sel = Selection::only("a");
        assert_eq!(apply(&multiple(), &sel, &ORDER, &"zz", SelectOp::Replace), sel);
    }

    #[test]
    fn follow_focus_only_when_configured() {
        let mut config = SelectConfig {
            mode: SelectionMode::Single,
            ..SelectConfig::default()
        };
        assert_eq!(follow_focus(&config, &"b"), None);
        config.follow_focus = true;
        assert_eq!(follow_focus(&config, &"b"), Some(Selection::only("b")));
    }
}
