// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Entry policy: which item receives focus when a zone becomes active.

use understory_zone::{EntryPolicy, ItemId, ZoneDescriptor, ZoneState};

use crate::step::first_enabled;

/// Resolve the item to focus when entering a zone.
///
/// - [`EntryPolicy::First`] and [`EntryPolicy::Selected`]: the first enabled item.
/// - [`EntryPolicy::Restore`]: the zone's last focused item while it is still in the order,
///   else the item at `sticky_index` clamped to the last index.
///
/// An empty zone yields `None`: the zone becomes active with no item focus.
pub fn resolve_entry<C>(
    descriptor: &ZoneDescriptor<C>,
    state: Option<&ZoneState>,
    sticky_index: usize,
) -> Option<ItemId> {
    let items = &descriptor.items;
    if items.is_empty() {
        return None;
    }
    match descriptor.config.navigate.entry {
        EntryPolicy::First | EntryPolicy::Selected => {
            first_enabled(descriptor).map(|idx| items[idx].clone())
        }
        EntryPolicy::Restore => state
            .and_then(|s| s.last_focused.as_ref())
            .filter(|last| items.contains(last))
            .cloned()
            .or_else(|| items.get(sticky_index.min(items.len() - 1)).cloned()),
    }
}
