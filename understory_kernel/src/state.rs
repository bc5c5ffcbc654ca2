// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Kernel state: application data, interaction state, and history.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use understory_event_state::TypeaheadState;
use understory_zone::{ItemId, ZoneId, ZoneRegistry, ZoneState};

use crate::history::History;

/// Active zone plus its focused item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusTarget {
    /// Active zone.
    pub zone: ZoneId,
    /// Focused item; `None` for a zone-only focus.
    pub item: Option<ItemId>,
}

/// Interaction state owned by the kernel.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OsState {
    /// Per-zone focus and selection state.
    pub zones: BTreeMap<ZoneId, ZoneState>,
    /// Deepest active zone.
    pub active_zone: Option<ZoneId>,
    /// Root→active zone path.
    pub focus_path: Vec<ZoneId>,
    /// A native text editor owns host focus.
    pub host_editing: bool,
    /// An IME composition is in progress.
    pub composing: bool,
    /// Typeahead buffer.
    #[serde(skip)]
    pub typeahead: TypeaheadState,
}

impl OsState {
    /// State of `zone`.
    pub fn zone(&self, zone: &ZoneId) -> Option<&ZoneState> {
        self.zones.get(zone)
    }

    /// Mutable state of `zone`, created on first use.
    pub fn zone_mut(&mut self, zone: &ZoneId) -> &mut ZoneState {
        self.zones.entry(zone.clone()).or_default()
    }

    /// Active zone and its focused item.
    pub fn focus(&self) -> Option<FocusTarget> {
        let zone = self.active_zone.clone()?;
        let item = self.zones.get(&zone).and_then(|s| s.focused.clone());
        Some(FocusTarget { zone, item })
    }

    /// Focused item of the active zone.
    pub fn focused_item(&self) -> Option<&ItemId> {
        let zone = self.active_zone.as_ref()?;
        self.zones.get(zone)?.focused.as_ref()
    }

    /// Make `zone` active and recompute the focus path.
    pub fn activate<C>(&mut self, registry: &ZoneRegistry<C>, zone: &ZoneId) {
        self.active_zone = Some(zone.clone());
        self.focus_path = registry.path_to(zone).into_vec();
    }

    /// Drop the active zone.
    pub fn deactivate(&mut self) {
        self.active_zone = None;
        self.focus_path.clear();
    }
}

/// Everything the kernel holds.
#[derive(Clone, Debug)]
pub struct State<D> {
    /// Application data; the slice history snapshots and persistence saves.
    pub data: D,
    /// Interaction state.
    pub os: OsState,
    /// Undo/redo stacks.
    pub history: History<D>,
}

impl<D> State<D> {
    /// Fresh state around `data`.
    pub fn new(data: D) -> Self {
        Self {
            data,
            os: OsState::default(),
            history: History::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use understory_zone::{ZoneConfig, ZoneDescriptor};

    #[test]
    fn activation_tracks_the_registered_path() {
        let mut registry: ZoneRegistry<()> = ZoneRegistry::new();
        registry.register(ZoneId::from("app"), ZoneDescriptor::new(ZoneConfig::default()));
        registry.register(
            ZoneId::from("list"),
            ZoneDescriptor::new(ZoneConfig::default()).with_parent("app"),
        );

        let mut os = OsState::default();
        os.activate(&registry, &ZoneId::from("list"));
        assert_eq!(os.focus_path, [ZoneId::from("app"), ZoneId::from("list")]);
        assert_eq!(
            os.focus(),
            Some(FocusTarget {
                zone: ZoneId::from("list"),
                item: None
            })
        );

        os.zone_mut(&ZoneId::from("list")).focused = Some(ItemId::from("a"));
        assert_eq!(os.focused_item(), Some(&ItemId::from("a")));

        os.deactivate();
        assert!(os.focus().is_none());
        assert!(os.focus_path.is_empty());
    }
}
