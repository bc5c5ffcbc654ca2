// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Focus: focus navigation over Understory zones.
//!
//! This crate computes *where focus goes next*. It never moves focus itself: every function is
//! pure over a [`ZoneRegistry`](understory_zone::ZoneRegistry) snapshot and a read-only view of
//! per-zone state ([`StateLookup`]), and returns a [`NavOutcome`] that the caller applies.
//!
//! ## Navigation pipeline
//!
//! Arrow-key navigation runs three stages, each taking and returning a [`NavContext`] (or `None`
//! to halt):
//!
//! 1. [`pipeline::restore`]: establishes the sticky perpendicular coordinate so repeated vertical
//!    moves through items of uneven width stay aligned (and likewise for horizontal moves).
//! 2. [`pipeline::direction`]: steps through the zone's item order according to its orientation
//!    and wrap policy; at a boundary it either stays put or, for seamless zones, escapes to the
//!    spatially adjacent sibling zone.
//! 3. [`pipeline::entry`]: when the target is a zone (or an item standing for a nested zone),
//!    picks the item inside it per the zone's [`EntryPolicy`](understory_zone::EntryPolicy).
//!
//! [`navigate`] runs the three stages.
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use understory_focus::{navigate, Direction};
//! use understory_zone::{ItemId, ZoneConfig, ZoneDescriptor, ZoneId, ZoneRegistry, ZoneState};
//!
//! let mut registry: ZoneRegistry<()> = ZoneRegistry::new();
//! let list = ZoneId::from("list");
//! registry.register(
//!     list.clone(),
//!     ZoneDescriptor::new(ZoneConfig::default()).with_items(["a", "b", "c"]),
//! );
//!
//! let mut states = BTreeMap::new();
//! states.insert(list.clone(), ZoneState { focused: Some(ItemId::from("c")), ..ZoneState::default() });
//!
//! // Without wrap, moving past the last item keeps focus where it is.
//! let outcome = navigate(&registry, &states, &list, Direction::Down).unwrap();
//! assert_eq!(outcome.item, Some(ItemId::from("c")));
//! assert!(!outcome.moved());
//! ```
//!
//! ## Other entry points
//!
//! - [`tab::tab`]: Tab/Shift+Tab per the zone's [`TabBehavior`](understory_zone::TabBehavior).
//! - [`recovery::recover`]: replacement focus when the focused item leaves the order.
//! - [`entry::resolve_entry`]: the entry policy on its own, for direct zone activation.
//! - [`spatial::nearest_in_direction`]: the directional scoring used by grids and seamless escape.
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for dependencies such as `kurbo`.
//! - `libm`: enables `no_std` + `alloc` builds that rely on `libm` for floating-point math.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::collections::BTreeMap;

use understory_zone::{ItemId, ZoneId, ZoneState};

pub mod entry;
pub mod pipeline;
pub mod recovery;
pub mod spatial;
mod step;
pub mod tab;

pub use pipeline::{NavContext, navigate};
pub use tab::TabDirection;

/// Direction of arrow-key style navigation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Move up.
    Up,
    /// Move down.
    Down,
    /// Move left.
    Left,
    /// Move right.
    Right,
    /// Jump to the first item.
    Home,
    /// Jump to the last item.
    End,
}

impl Direction {
    /// Whether this direction moves along the vertical axis.
    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }

    /// Whether this direction moves along the horizontal axis.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    /// Whether this direction moves toward the start of an order.
    pub fn is_backward(self) -> bool {
        matches!(self, Self::Up | Self::Left | Self::Home)
    }
}

/// Read-only access to per-zone state.
pub trait StateLookup {
    /// State of `zone`, if it has any.
    fn zone_state(&self, zone: &ZoneId) -> Option<&ZoneState>;
}

impl StateLookup for BTreeMap<ZoneId, ZoneState> {
    fn zone_state(&self, zone: &ZoneId) -> Option<&ZoneState> {
        self.get(zone)
    }
}

/// A `StateLookup` with no state at all; every zone looks freshly registered.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoState;

impl StateLookup for NoState {
    fn zone_state(&self, _zone: &ZoneId) -> Option<&ZoneState> {
        None
    }
}

/// Result of a navigation step.
#[derive(Clone, Debug, PartialEq)]
pub struct NavOutcome {
    /// Zone that should become active.
    pub zone: ZoneId,
    /// Item that should receive focus; `None` for a zone-only focus (empty zone).
    pub item: Option<ItemId>,
    /// Sticky horizontal coordinate to remember.
    pub sticky_x: Option<f64>,
    /// Sticky vertical coordinate to remember.
    pub sticky_y: Option<f64>,
    /// Whether the active zone changes.
    pub zone_changed: bool,
    /// Item focused before the step, in the zone navigation started from.
    pub previous: Option<ItemId>,
}

impl NavOutcome {
    /// Whether focus moves at all.
    pub fn moved(&self) -> bool {
        self.zone_changed || self.item != self.previous
    }
}
