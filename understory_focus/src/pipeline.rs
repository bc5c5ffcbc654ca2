// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The three-stage navigation pipeline.
//!
//! Each stage takes a [`NavContext`] and returns it (possibly updated) or `None` to halt. Stages
//! are plain functions so hosts can run them individually, reorder them in tests, or splice in
//! their own stage between two of them.
//!
//! A no-op move (a non-wrapping boundary in a non-seamless zone) is *not* a halt: the context
//! comes out with the current item as its target, so callers can distinguish "focus stays" from
//! "nothing to navigate".

use understory_zone::{ItemId, Orientation, ZoneDescriptor, ZoneId, ZoneRegistry};

use crate::entry::resolve_entry;
use crate::spatial::{nearest_in_direction, sticky_origin};
use crate::step::{Step, first_enabled, last_enabled, step_linear};
use crate::{Direction, NavOutcome, StateLookup};

// Items standing for nested zones are followed at most this deep.
const MAX_NESTING: usize = 8;

/// State threaded through the navigation stages.
#[derive(Debug)]
pub struct NavContext<'a, C, S: ?Sized> {
    /// Registry snapshot.
    pub registry: &'a ZoneRegistry<C>,
    /// Per-zone state.
    pub states: &'a S,
    /// Requested direction.
    pub direction: Direction,
    /// Zone navigation starts from.
    pub zone: ZoneId,
    /// Item focused in `zone` before the move.
    pub focused: Option<ItemId>,
    /// Sticky horizontal coordinate.
    pub sticky_x: Option<f64>,
    /// Sticky vertical coordinate.
    pub sticky_y: Option<f64>,
    /// Zone that will be active after the move.
    pub target_zone: ZoneId,
    /// Item that will be focused after the move.
    pub target_item: Option<ItemId>,
    /// Set when `target_zone` still needs its entry item resolved.
    pub entering: bool,
    /// Index of the origin item, handed to restore-entry as a fallback.
    pub sticky_index: usize,
}

impl<'a, C, S: StateLookup + ?Sized> NavContext<'a, C, S> {
    /// Seed a context from the registry and the zone's current state.
    ///
    /// Returns `None` when `zone` is not registered.
    pub fn new(
        registry: &'a ZoneRegistry<C>,
        states: &'a S,
        zone: &ZoneId,
        direction: Direction,
    ) -> Option<Self> {
        if !registry.contains(zone) {
            return None;
        }
        let state = states.zone_state(zone);
        let focused = state.and_then(|s| s.focused.clone());
        Some(Self {
            registry,
            states,
            direction,
            zone: zone.clone(),
            target_zone: zone.clone(),
            target_item: focused.clone(),
            focused,
            sticky_x: state.and_then(|s| s.sticky_x),
            sticky_y: state.and_then(|s| s.sticky_y),
            entering: false,
            sticky_index: 0,
        })
    }

    /// Collapse the context into its outcome.
    pub fn finish(self) -> NavOutcome {
        NavOutcome {
            zone_changed: self.target_zone != self.zone,
            zone: self.target_zone,
            item: self.target_item,
            sticky_x: self.sticky_x,
            sticky_y: self.sticky_y,
            previous: self.focused,
        }
    }

    fn descriptor(&self) -> Option<&'a ZoneDescriptor<C>> {
        self.registry.get(&self.zone)
    }
}

/// Run restore → direction → entry for `direction` starting in `zone`.
pub fn navigate<C, S: StateLookup + ?Sized>(
    registry: &ZoneRegistry<C>,
    states: &S,
    zone: &ZoneId,
    direction: Direction,
) -> Option<NavOutcome> {
    NavContext::new(registry, states, zone, direction)
        .and_then(restore)
        .and_then(self::direction)
        .and_then(entry)
        .map(NavContext::finish)
}

/// Restore stage: establish the sticky coordinate for the movement axis.
///
/// A vertical move keeps (or, when absent, measures from the focused item) the horizontal
/// coordinate and clears the vertical one; a horizontal move does the opposite. An existing
/// value is reused rather than recomputed. Home/End clear both.
pub fn restore<C, S: StateLookup + ?Sized>(
    mut ctx: NavContext<'_, C, S>,
) -> Option<NavContext<'_, C, S>> {
    let center = ctx
        .focused
        .as_ref()
        .and_then(|f| ctx.descriptor()?.item_rect(f))
        .map(|r| r.center());

    if ctx.direction.is_vertical() {
        ctx.sticky_x = ctx.sticky_x.or(center.map(|c| c.x));
        ctx.sticky_y = None;
    } else if ctx.direction.is_horizontal() {
        ctx.sticky_y = ctx.sticky_y.or(center.map(|c| c.y));
        ctx.sticky_x = None;
    } else {
        ctx.sticky_x = None;
        ctx.sticky_y = None;
    }
    Some(ctx)
}

/// Direction stage: compute the next item in the current zone.
///
/// At a boundary the current item is kept, unless the zone is seamless and a sibling zone lies
/// in the requested direction; then that zone becomes the target and is marked for entry.
pub fn direction<C, S: StateLookup + ?Sized>(
    mut ctx: NavContext<'_, C, S>,
) -> Option<NavContext<'_, C, S>> {
    let descriptor = ctx.descriptor()?;
    let nav = &descriptor.config.navigate;
    let current = ctx.focused.as_ref().and_then(|f| descriptor.index_of(f));
    ctx.sticky_index = current.unwrap_or(0);

    let dir = ctx.direction;
    let next = match (dir, nav.orientation) {
        (Direction::Home, _) => first_enabled(descriptor),
        (Direction::End, _) => last_enabled(descriptor),
        (_, Orientation::Vertical) if dir.is_vertical() => {
            step_linear(descriptor, current, linear_step(dir), nav.wrap)
        }
        (_, Orientation::Horizontal) if dir.is_horizontal() => {
            step_linear(descriptor, current, linear_step(dir), nav.wrap)
        }
        (_, Orientation::Grid) => step_grid(&ctx, descriptor, current),
        _ => None,
    };

    match next {
        Some(idx) => ctx.target_item = Some(descriptor.items[idx].clone()),
        None => {
            if nav.seamless
                && let Some(zone) = escape(&ctx, descriptor)
            {
                ctx.target_zone = zone;
                ctx.target_item = None;
                ctx.entering = true;
            } else {
                ctx.target_item = ctx.focused.clone();
            }
        }
    }
    Some(ctx)
}

/// Entry stage: resolve the focused item of a newly entered zone.
///
/// Also descends into nested zones whose id matches the target item and whose parent is the
/// target zone, so a zone can appear as an item of its parent.
pub fn entry<C, S: StateLookup + ?Sized>(
    mut ctx: NavContext<'_, C, S>,
) -> Option<NavContext<'_, C, S>> {
    let registry = ctx.registry;
    for _ in 0..MAX_NESTING {
        if ctx.entering {
            let descriptor = registry.get(&ctx.target_zone)?;
            let state = ctx.states.zone_state(&ctx.target_zone);
            ctx.target_item = resolve_entry(descriptor, state, ctx.sticky_index);
            ctx.entering = false;
        }
        if ctx.target_zone == ctx.zone && ctx.target_item == ctx.focused {
            break;
        }
        let Some(item) = &ctx.target_item else {
            break;
        };
        let nested = ZoneId::new(item.as_str());
        if registry.parent_of(&nested) != Some(&ctx.target_zone) {
            break;
        }
        ctx.target_zone = nested;
        ctx.entering = true;
    }
    Some(ctx)
}

fn linear_step(dir: Direction) -> Step {
    if dir.is_backward() {
        Step::Backward
    } else {
        Step::Forward
    }
}

fn step_grid<C, S: StateLookup + ?Sized>(
    ctx: &NavContext<'_, C, S>,
    descriptor: &ZoneDescriptor<C>,
    current: Option<usize>,
) -> Option<usize> {
    let nav = &descriptor.config.navigate;
    let dir = ctx.direction;
    let Some(cur) = current else {
        return step_linear(descriptor, None, linear_step(dir), nav.wrap);
    };

    // Spatial when the origin has geometry.
    if let Some(rect) = descriptor.item_rect(&descriptor.items[cur]) {
        let origin = sticky_origin(rect, dir, ctx.sticky_x, ctx.sticky_y);
        let candidates = descriptor
            .items
            .iter()
            .enumerate()
            .filter(|(i, item)| *i != cur && !descriptor.is_disabled(item))
            .filter_map(|(i, item)| descriptor.item_rect(item).map(|r| (i, r)));
        return nearest_in_direction(origin, dir, candidates).or_else(|| {
            // Fallback to linear traversal only when wrapping.
            nav.wrap
                .then(|| step_linear(descriptor, Some(cur), linear_step(dir), true))
                .flatten()
        });
    }

    let len = descriptor.items.len();
    match nav.columns.filter(|c| *c > 0) {
        Some(cols) => step_columns(cur, len, cols, dir, nav.wrap),
        None => step_linear(descriptor, Some(cur), linear_step(dir), nav.wrap),
    }
}

fn step_columns(cur: usize, len: usize, cols: usize, dir: Direction, wrap: bool) -> Option<usize> {
    let col = cur % cols;
    let row_start = cur - col;
    let row_end = (row_start + cols - 1).min(len - 1);
    match dir {
        Direction::Left if col > 0 => Some(cur - 1),
        Direction::Left if wrap => Some(row_end),
        Direction::Right if cur < row_end => Some(cur + 1),
        Direction::Right if wrap => Some(row_start),
        Direction::Up if cur >= cols => Some(cur - cols),
        Direction::Up if wrap => {
            let mut idx = (len - 1) / cols * cols + col;
            if idx >= len {
                idx -= cols;
            }
            Some(idx)
        }
        Direction::Down if cur + cols < len => Some(cur + cols),
        Direction::Down if wrap => Some(col),
        _ => None,
    }
}

fn escape<C, S: StateLookup + ?Sized>(
    ctx: &NavContext<'_, C, S>,
    descriptor: &ZoneDescriptor<C>,
) -> Option<ZoneId> {
    let registry = ctx.registry;
    let origin_rect = ctx
        .focused
        .as_ref()
        .and_then(|f| descriptor.item_rect(f))
        .or(descriptor.rect)?;
    let origin = sticky_origin(origin_rect, ctx.direction, ctx.sticky_x, ctx.sticky_y);
    let candidates = registry
        .siblings_of(&ctx.zone)
        .into_iter()
        .filter_map(|z| registry.get(&z).and_then(|d| d.rect).map(|r| (z, r)));
    nearest_in_direction(origin, ctx.direction, candidates)
}
