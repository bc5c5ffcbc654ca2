// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `OS_SELECT`, `TOGGLE_SELECTION`, `OS_SELECT_ALL` and `OS_DESELECT_ALL`.

use tracing::debug;
use understory_selection::{SelectOp, Selection};
use understory_zone::{Hook, ItemId, SelectionMode, ZoneId};

use super::{FocusSource, apply_focus, owning_zone, route};
use crate::command::{Payload, keys};
use crate::scope::{Context, Reaction};
use crate::state::State;

fn current<D>(state: &State<D>, zone: &ZoneId) -> Selection<ItemId> {
    state.os.zone(zone).map_or_else(Selection::new, |s| {
        Selection::from_parts(s.selection.clone(), s.anchor.clone())
    })
}

/// Store `next` for `zone` and route its select callback. Returns `false` when nothing changed.
fn commit<D>(
    cx: &Context<'_>,
    state: &mut State<D>,
    zone: &ZoneId,
    next: Selection<ItemId>,
    reaction: &mut Reaction,
) -> bool {
    let zone_state = state.os.zone_mut(zone);
    if zone_state.selection == next.selected && zone_state.anchor == next.anchor {
        return false;
    }
    zone_state.selection = next.selected;
    zone_state.anchor = next.anchor;
    if let Some(command) = route(cx, state, zone, None, Hook::Select) {
        reaction.follow_up(command);
    }
    true
}

/// Apply `op` on `target` in `zone` under the zone's selection policy.
pub(crate) fn select_in<D>(
    cx: &Context<'_>,
    state: &mut State<D>,
    zone: &ZoneId,
    target: &ItemId,
    op: SelectOp,
    reaction: &mut Reaction,
) -> bool {
    let Some(descriptor) = cx.registry.get(zone) else {
        return false;
    };
    let next = understory_selection::apply(
        &descriptor.config.select,
        &current(state, zone),
        &descriptor.items,
        target,
        op,
    );
    commit(cx, state, zone, next, reaction)
}

fn select_with<D>(
    cx: &Context<'_>,
    state: &mut State<D>,
    payload: &Payload,
    op: SelectOp,
) -> Reaction {
    let mut reaction = Reaction::none();
    let Some(target) = payload.item(keys::TARGET) else {
        debug!(command = cx.command, "selection without a target");
        return reaction;
    };
    let Some(zone) = owning_zone(cx, state, Some(target)) else {
        return reaction;
    };
    if !cx.registry.items(&zone).contains(target) {
        debug!(%zone, %target, "selection target outside the zone");
        return reaction;
    }
    select_in(cx, state, &zone, target, op, &mut reaction);
    if state.os.active_zone.as_ref() != Some(&zone) || state.os.focused_item() != Some(target) {
        apply_focus(
            cx,
            state,
            &zone,
            Some(target.clone()),
            FocusSource::Selection,
            &mut reaction,
        );
    }
    reaction
}

pub(crate) fn select<D>(cx: &Context<'_>, state: &mut State<D>, payload: &Payload) -> Reaction {
    let op = payload.select_op(keys::MODE).unwrap_or_default();
    select_with(cx, state, payload, op)
}

pub(crate) fn toggle_selection<D>(
    cx: &Context<'_>,
    state: &mut State<D>,
    payload: &Payload,
) -> Reaction {
    select_with(cx, state, payload, SelectOp::Toggle)
}

pub(crate) fn select_all<D>(cx: &Context<'_>, state: &mut State<D>, _: &Payload) -> Reaction {
    let mut reaction = Reaction::none();
    let Some(zone) = state.os.active_zone.clone() else {
        return reaction;
    };
    let Some(descriptor) = cx.registry.get(&zone) else {
        return reaction;
    };
    let config = &descriptor.config.select;
    if config.mode != SelectionMode::Multiple {
        debug!(%zone, "select-all in a zone without multiple selection");
        return reaction;
    }
    let next = understory_selection::select_all(&current(state, &zone), &descriptor.items, config.max);
    commit(cx, state, &zone, next, &mut reaction);
    reaction
}

pub(crate) fn deselect_all<D>(cx: &Context<'_>, state: &mut State<D>, _: &Payload) -> Reaction {
    let mut reaction = Reaction::none();
    let Some(zone) = state.os.active_zone.clone() else {
        return reaction;
    };
    let min = cx
        .registry
        .get(&zone)
        .map_or(0, |d| d.config.select.min());
    let next = understory_selection::clear(&current(state, &zone), min);
    commit(cx, state, &zone, next, &mut reaction);
    reaction
}
