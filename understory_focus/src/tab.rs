// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tab traversal across items and zones.
//!
//! The active zone's [`TabBehavior`] decides what Tab does:
//!
//! - [`TabBehavior::Trap`]: cycle through the zone's items; focus never leaves.
//! - [`TabBehavior::Flow`]: step through the items, then continue into the next zone.
//! - [`TabBehavior::Escape`]: leave for the next zone immediately.
//!
//! "Next zone" is the next zone in [`ZoneRegistry::tab_order`] with at least one enabled item;
//! its entry policy picks the item. When there is no such zone the move is a no-op.

use alloc::vec::Vec;

use understory_zone::{ItemId, TabBehavior, ZoneId, ZoneRegistry};

use crate::entry::resolve_entry;
use crate::step::{Step, first_enabled, step_linear};
use crate::{NavOutcome, StateLookup};

/// Tab direction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TabDirection {
    /// Tab.
    Forward,
    /// Shift+Tab.
    Backward,
}

impl TabDirection {
    fn step(self) -> Step {
        match self {
            Self::Forward => Step::Forward,
            Self::Backward => Step::Backward,
        }
    }
}

/// Compute where Tab moves focus from `zone`.
///
/// Returns `None` when `zone` is not registered. Sticky coordinates are cleared by any move
/// that actually happens.
pub fn tab<C, S: StateLookup + ?Sized>(
    registry: &ZoneRegistry<C>,
    states: &S,
    zone: &ZoneId,
    direction: TabDirection,
) -> Option<NavOutcome> {
    let descriptor = registry.get(zone)?;
    let state = states.zone_state(zone);
    let focused = state.and_then(|s| s.focused.clone());
    let current = focused.as_ref().and_then(|f| descriptor.index_of(f));

    let stay = || NavOutcome {
        zone: zone.clone(),
        item: focused.clone(),
        sticky_x: state.and_then(|s| s.sticky_x),
        sticky_y: state.and_then(|s| s.sticky_y),
        zone_changed: false,
        previous: focused.clone(),
    };
    let within = |idx: usize| NavOutcome {
        zone: zone.clone(),
        item: Some(descriptor.items[idx].clone()),
        sticky_x: None,
        sticky_y: None,
        zone_changed: false,
        previous: focused.clone(),
    };

    let step = direction.step();
    match descriptor.config.tab {
        TabBehavior::Trap => Some(
            step_linear(descriptor, current, step, true)
                .map(within)
                .unwrap_or_else(stay),
        ),
        TabBehavior::Flow => {
            if let Some(idx) = step_linear(descriptor, current, step, false) {
                return Some(within(idx));
            }
            Some(leave(registry, states, zone, direction, focused.clone()).unwrap_or_else(stay))
        }
        TabBehavior::Escape => {
            Some(leave(registry, states, zone, direction, focused.clone()).unwrap_or_else(stay))
        }
    }
}

fn leave<C, S: StateLookup + ?Sized>(
    registry: &ZoneRegistry<C>,
    states: &S,
    zone: &ZoneId,
    direction: TabDirection,
    previous: Option<ItemId>,
) -> Option<NavOutcome> {
    let order = registry.tab_order();
    let here = order.iter().position(|z| z == zone)?;
    let mut rest: Vec<&ZoneId> = match direction {
        TabDirection::Forward => order[here + 1..].iter().collect(),
        TabDirection::Backward => order[..here].iter().rev().collect(),
    };
    rest.retain(|z| {
        registry
            .get(z)
            .is_some_and(|d| first_enabled(d).is_some())
    });
    let target = *rest.first()?;
    let descriptor = registry.get(target)?;
    let item = resolve_entry(descriptor, states.zone_state(target), 0);
    Some(NavOutcome {
        zone: target.clone(),
        item,
        sticky_x: None,
        sticky_y: None,
        zone_changed: true,
        previous,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::collections::BTreeMap;
    use understory_zone::{EntryPolicy, ZoneConfig, ZoneDescriptor, ZoneState};

    type States = BTreeMap<ZoneId, ZoneState>;

    fn zone(id: &str) -> ZoneId {
        ZoneId::from(id)
    }

    fn item(id: &str) -> ItemId {
        ItemId::from(id)
    }

    fn config(tab: TabBehavior) -> ZoneConfig {
        ZoneConfig {
            tab,
            ..ZoneConfig::default()
        }
    }

    fn registry(first: TabBehavior) -> ZoneRegistry<()> {
        let mut registry = ZoneRegistry::new();
        registry.register(zone("app"), ZoneDescriptor::new(ZoneConfig::default()));
        registry.register(
            zone("one"),
            ZoneDescriptor::new(config(first))
                .with_parent("app")
                .with_items(["a", "b"]),
        );
        registry.register(
            zone("two"),
            ZoneDescriptor::new(ZoneConfig::default())
                .with_parent("app")
                .with_items(["x", "y"]),
        );
        registry
    }

    fn focused_on(z: &str, i: &str) -> States {
        let mut states = States::new();
        states.entry(zone(z)).or_default().focused = Some(item(i));
        states
    }

    #[test]
    fn trap_cycles_inside_the_zone() {
        let registry = registry(TabBehavior::Trap);
        let states = focused_on("one", "b");
        let out = tab(&registry, &states, &zone("one"), TabDirection::Forward).unwrap();
        assert_eq!(out.zone, zone("one"));
        assert_eq!(out.item, Some(item("a")));

        let states = focused_on("one", "a");
        let out = tab(&registry, &states, &zone("one"), TabDirection::Backward).unwrap();
        assert_eq!(out.item, Some(item("b")));
    }

    #[test]
    fn flow_steps_items_then_leaves() {
        let registry = registry(TabBehavior::Flow);
        let states = focused_on("one", "a");
        let out = tab(&registry, &states, &zone("one"), TabDirection::Forward).unwrap();
        assert_eq!(out.item, Some(item("b")));
        assert!(!out.zone_changed);

        let states = focused_on("one", "b");
        let out = tab(&registry, &states, &zone("one"), TabDirection::Forward).unwrap();
        assert!(out.zone_changed);
        assert_eq!(out.zone, zone("two"));
        assert_eq!(out.item, Some(item("x")));
    }

    #[test]
    fn escape_leaves_immediately() {
        let registry = registry(TabBehavior::Escape);
        let states = focused_on("one", "a");
        let out = tab(&registry, &states, &zone("one"), TabDirection::Forward).unwrap();
        assert_eq!(out.zone, zone("two"));
    }

    #[test]
    fn backward_skips_zones_without_items() {
        let registry = registry(TabBehavior::Flow);
        let states = focused_on("two", "x");
        let out = tab(&registry, &states, &zone("two"), TabDirection::Backward).unwrap();
        // "app" has no items, so the previous stop is "one".
        assert_eq!(out.zone, zone("one"));
    }

    #[test]
    fn no_further_zone_is_a_no_op() {
        let registry = registry(TabBehavior::Flow);
        let states = focused_on("two", "y");
        let out = tab(&registry, &states, &zone("two"), TabDirection::Forward).unwrap();
        assert!(!out.moved());
        assert_eq!(out.item, Some(item("y")));
    }

    #[test]
    fn entering_a_zone_applies_restore() {
        let mut registry = registry(TabBehavior::Escape);
        let mut restore = ZoneConfig::default();
        restore.navigate.entry = EntryPolicy::Restore;
        registry.register(
            zone("two"),
            ZoneDescriptor::new(restore)
                .with_parent("app")
                .with_items(["x", "y"]),
        );
        let mut states = focused_on("one", "a");
        states.entry(zone("two")).or_default().last_focused = Some(item("y"));

        let out = tab(&registry, &states, &zone("one"), TabDirection::Forward).unwrap();
        assert_eq!(out.item, Some(item("y")));
    }
}
