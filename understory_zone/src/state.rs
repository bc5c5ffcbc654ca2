// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::ItemId;

/// Mutable focus and selection state of a single zone.
///
/// The registry owns a zone's *shape* (item order, policy, callbacks); `ZoneState` holds what
/// changes as the user interacts. It is plain data so it can be snapshotted and serialized.
///
/// Invariants maintained by the code that drives commands:
/// - `focused` is `None` or a member of the zone's item order (it may briefly name a removed
///   item while recovery runs).
/// - `selection` is a subset of the item order, kept in selection order.
/// - `anchor`, when set, is a member of the item order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneState {
    /// Item holding focus inside this zone.
    pub focused: Option<ItemId>,
    /// Selected items.
    pub selection: Vec<ItemId>,
    /// Pivot for range selection.
    pub anchor: Option<ItemId>,
    /// Expanded tree items.
    pub expanded: BTreeSet<ItemId>,
    /// Remembered horizontal position for vertical moves.
    pub sticky_x: Option<f64>,
    /// Remembered vertical position for horizontal moves.
    pub sticky_y: Option<f64>,
    /// Last item that held focus, used by [`EntryPolicy::Restore`](crate::EntryPolicy::Restore).
    pub last_focused: Option<ItemId>,
}

impl ZoneState {
    /// Whether `item` is selected.
    pub fn is_selected(&self, item: &ItemId) -> bool {
        self.selection.contains(item)
    }

    /// Whether `item` is expanded.
    pub fn is_expanded(&self, item: &ItemId) -> bool {
        self.expanded.contains(item)
    }

    /// Move focus to `item`, remembering it for restore-on-entry.
    pub fn focus(&mut self, item: Option<ItemId>) {
        if let Some(id) = &item {
            self.last_focused = Some(id.clone());
        }
        self.focused = item;
    }

    /// Drop every reference to items that are no longer in `order`, except `focused`.
    ///
    /// `focused` is left to the recovery pass, which needs to know what was removed.
    pub fn retain_items(&mut self, order: &[ItemId]) {
        self.selection.retain(|id| order.contains(id));
        self.expanded.retain(|id| order.contains(id));
        if self.anchor.as_ref().is_some_and(|a| !order.contains(a)) {
            self.anchor = self.selection.first().cloned();
        }
        if self.last_focused.as_ref().is_some_and(|l| !order.contains(l)) {
            self.last_focused = None;
        }
    }
}
