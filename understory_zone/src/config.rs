// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-zone policy.
//!
//! A [`ZoneConfig`] is fixed when a zone registers. Every field has a default so hosts can
//! describe only what differs, either in code or through any `serde` format:
//!
//! ```rust
//! use understory_zone::{Orientation, SelectionMode, ZoneConfig};
//!
//! let mut config = ZoneConfig::listbox();
//! config.navigate.wrap = true;
//! assert_eq!(config.navigate.orientation, Orientation::Vertical);
//! assert_eq!(config.select.mode, SelectionMode::Single);
//! ```

use serde::{Deserialize, Serialize};

/// Layout axis used to interpret arrow keys inside a zone.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Up/Down move through the item order.
    #[default]
    Vertical,
    /// Left/Right move through the item order.
    Horizontal,
    /// All four arrows move, either spatially or by column arithmetic.
    Grid,
}

/// Which item receives focus when a zone becomes active through navigation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryPolicy {
    /// The first item in order.
    #[default]
    First,
    /// The last focused item if it is still present, else the caller's index clamped to the zone.
    Restore,
    /// Reserved for selection-aware entry; currently behaves like [`EntryPolicy::First`].
    Selected,
}

/// Which item receives focus when the focused item is removed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryPolicy {
    /// The item that took the removed item's place, or the new last item at the tail.
    #[default]
    Next,
    /// The item before the removed one, or the new first item at the head.
    Prev,
    /// Prefer [`RecoveryPolicy::Next`], fall back to [`RecoveryPolicy::Prev`].
    Nearest,
}

/// Navigation policy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigateConfig {
    /// Arrow-key axis.
    pub orientation: Orientation,
    /// Wrap from the last item to the first (and back).
    #[serde(alias = "loop")]
    pub wrap: bool,
    /// At a boundary, escape to a spatially adjacent sibling zone.
    pub seamless: bool,
    /// Accept typeahead characters.
    pub typeahead: bool,
    /// Entry policy when the zone is entered by navigation.
    pub entry: EntryPolicy,
    /// Recovery policy when the focused item is removed.
    pub recovery: RecoveryPolicy,
    /// Column count for grids without geometry.
    pub columns: Option<usize>,
}

impl Default for NavigateConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::Vertical,
            wrap: false,
            seamless: false,
            typeahead: false,
            entry: EntryPolicy::First,
            recovery: RecoveryPolicy::Next,
            columns: None,
        }
    }
}

/// What Tab does inside a zone.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TabBehavior {
    /// Tab cycles through the zone's items and never leaves.
    Trap,
    /// Tab leaves the zone immediately for the next zone in tab order.
    Escape,
    /// Tab steps through items, then continues into the next zone.
    #[default]
    Flow,
}

/// Selection cardinality.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// Selection commands are ignored.
    #[default]
    None,
    /// At most one item is selected.
    Single,
    /// Any number of items may be selected.
    Multiple,
}

/// Selection policy.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectConfig {
    /// Cardinality.
    pub mode: SelectionMode,
    /// Focus changes replace the selection with the focused item.
    pub follow_focus: bool,
    /// Shift-extended contiguous ranges are allowed.
    pub range: bool,
    /// Plain selection toggles membership instead of replacing.
    pub toggle: bool,
    /// Selection may never become empty once set.
    pub disallow_empty: bool,
    /// Upper bound on the number of selected items.
    pub max: Option<usize>,
}

impl SelectConfig {
    /// Lower bound on the number of selected items implied by `disallow_empty`.
    pub fn min(&self) -> usize {
        usize::from(self.disallow_empty)
    }
}

/// When activation fires.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    /// Only explicit activation (Enter, click).
    #[default]
    Manual,
    /// Every navigation focus change also activates.
    Automatic,
}

/// What Escape does inside a zone.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DismissPolicy {
    /// Clear the selection.
    Deselect,
    /// Route the zone's dismiss callback and return focus to the parent zone.
    Close,
    /// Do nothing.
    #[default]
    None,
}

/// Dismiss policy and its scope.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DismissConfig {
    /// What Escape does.
    pub policy: DismissPolicy,
    /// When this zone's dismiss has no effect, offer it to the parent zone.
    pub bubble: bool,
}

/// Immutable per-zone policy.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneConfig {
    /// Navigation.
    pub navigate: NavigateConfig,
    /// Tab behavior.
    pub tab: TabBehavior,
    /// Selection.
    pub select: SelectConfig,
    /// Activation.
    pub activate: Activation,
    /// Dismiss.
    pub dismiss: DismissConfig,
}

impl ZoneConfig {
    /// Vertical single-select list where selection follows focus.
    pub fn listbox() -> Self {
        Self {
            navigate: NavigateConfig {
                typeahead: true,
                ..NavigateConfig::default()
            },
            select: SelectConfig {
                mode: SelectionMode::Single,
                follow_focus: true,
                disallow_empty: true,
                ..SelectConfig::default()
            },
            ..Self::default()
        }
    }

    /// Vertical multi-select list with toggle and range selection.
    pub fn multiselect() -> Self {
        Self {
            select: SelectConfig {
                mode: SelectionMode::Multiple,
                range: true,
                ..SelectConfig::default()
            },
            dismiss: DismissConfig {
                policy: DismissPolicy::Deselect,
                bubble: false,
            },
            ..Self::default()
        }
    }

    /// Horizontal, wrapping toolbar that Tab leaves immediately.
    pub fn toolbar() -> Self {
        Self {
            navigate: NavigateConfig {
                orientation: Orientation::Horizontal,
                wrap: true,
                ..NavigateConfig::default()
            },
            tab: TabBehavior::Escape,
            ..Self::default()
        }
    }

    /// Grid with a fixed column count, used when items carry no geometry.
    pub fn grid(columns: usize) -> Self {
        Self {
            navigate: NavigateConfig {
                orientation: Orientation::Grid,
                columns: Some(columns),
                ..NavigateConfig::default()
            },
            ..Self::default()
        }
    }

    /// Modal scope: Tab is trapped and Escape closes.
    pub fn dialog() -> Self {
        Self {
            navigate: NavigateConfig {
                wrap: true,
                ..NavigateConfig::default()
            },
            tab: TabBehavior::Trap,
            dismiss: DismissConfig {
                policy: DismissPolicy::Close,
                bubble: false,
            },
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_inert() {
        let config = ZoneConfig::default();
        assert_eq!(config.navigate.orientation, Orientation::Vertical);
        assert!(!config.navigate.wrap);
        assert_eq!(config.select.mode, SelectionMode::None);
        assert_eq!(config.dismiss.policy, DismissPolicy::None);
        assert_eq!(config.tab, TabBehavior::Flow);
    }

    #[test]
    fn disallow_empty_sets_the_lower_bound() {
        let mut select = SelectConfig::default();
        assert_eq!(select.min(), 0);
        select.disallow_empty = true;
        assert_eq!(select.min(), 1);
    }

    #[test]
    fn presets_differ_where_expected() {
        assert_eq!(ZoneConfig::toolbar().tab, TabBehavior::Escape);
        assert_eq!(ZoneConfig::dialog().dismiss.policy, DismissPolicy::Close);
        assert_eq!(ZoneConfig::grid(3).navigate.columns, Some(3));
        assert!(ZoneConfig::multiselect().select.range);
    }
}
