// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `OS_NAVIGATE`, `OS_FOCUS`, `OS_TAB` and `OS_TYPEAHEAD`.

use tracing::debug;
use understory_focus::entry::resolve_entry;
use understory_focus::{NavOutcome, TabDirection};
use understory_selection::SelectOp;
use understory_zone::ZoneState;

use super::{FocusSource, apply_focus, select};
use crate::command::{Payload, keys};
use crate::scope::{Context, Reaction};
use crate::state::State;

fn write_sticky(zone_state: &mut ZoneState, outcome: &NavOutcome) {
    zone_state.sticky_x = outcome.sticky_x;
    zone_state.sticky_y = outcome.sticky_y;
}

pub(crate) fn navigate<D>(cx: &Context<'_>, state: &mut State<D>, payload: &Payload) -> Reaction {
    let mut reaction = Reaction::none();
    let Some(direction) = payload.direction(keys::DIRECTION) else {
        return reaction;
    };
    let Some(zone) = state.os.active_zone.clone() else {
        debug!(?direction, "navigation with no active zone");
        return reaction;
    };
    let Some(outcome) = understory_focus::navigate(cx.registry, &state.os.zones, &zone, direction)
    else {
        return reaction;
    };
    write_sticky(state.os.zone_mut(&outcome.zone), &outcome);
    if !outcome.moved() {
        return reaction;
    }

    let extend = payload.flag(keys::EXTEND)
        && !outcome.zone_changed
        && cx
            .registry
            .get(&zone)
            .is_some_and(|d| d.config.select.range);
    if !extend {
        apply_focus(
            cx,
            state,
            &outcome.zone,
            outcome.item,
            FocusSource::Navigation,
            &mut reaction,
        );
        return reaction;
    }

    // Extending starts from the item focus is leaving when no anchor is set yet.
    let zone_state = state.os.zone_mut(&zone);
    if zone_state.anchor.is_none()
        && let Some(previous) = outcome.previous.clone()
    {
        zone_state.selection = vec![previous.clone()];
        zone_state.anchor = Some(previous);
    }
    apply_focus(
        cx,
        state,
        &zone,
        outcome.item.clone(),
        FocusSource::Selection,
        &mut reaction,
    );
    if let Some(item) = &outcome.item {
        select::select_in(cx, state, &zone, item, SelectOp::Range, &mut reaction);
    }
    reaction
}

pub(crate) fn focus<D>(cx: &Context<'_>, state: &mut State<D>, payload: &Payload) -> Reaction {
    let mut reaction = Reaction::none();
    let target = payload.item(keys::TARGET);
    let zone = payload
        .zone(keys::ZONE)
        .or_else(|| target.and_then(|t| cx.registry.find_item_owner(t)));
    let Some(zone) = zone.cloned() else {
        debug!("focus request without a zone");
        return reaction;
    };
    let Some(descriptor) = cx.registry.get(&zone) else {
        debug!(%zone, "focus request for an unknown zone");
        return reaction;
    };
    let item = match target {
        Some(item) if descriptor.index_of(item).is_some() => Some(item.clone()),
        Some(item) => {
            debug!(%zone, %item, "focus request for an item outside the zone");
            return reaction;
        }
        None => resolve_entry(descriptor, state.os.zone(&zone), 0),
    };
    let zone_state = state.os.zone_mut(&zone);
    zone_state.sticky_x = None;
    zone_state.sticky_y = None;
    apply_focus(cx, state, &zone, item, FocusSource::Direct, &mut reaction);
    reaction
}

pub(crate) fn tab<D>(cx: &Context<'_>, state: &mut State<D>, payload: &Payload) -> Reaction {
    let mut reaction = Reaction::none();
    let direction = payload.tab(keys::TAB).unwrap_or(TabDirection::Forward);

    let Some(zone) = state.os.active_zone.clone() else {
        // Nothing active yet: enter the first (or last) zone that has items.
        let order = cx.registry.tab_order();
        let mut candidates = order
            .iter()
            .filter_map(|z| cx.registry.get(z).map(|d| (z, d)))
            .filter(|(_, d)| !d.items.is_empty());
        let entered = match direction {
            TabDirection::Forward => candidates.next(),
            TabDirection::Backward => candidates.last(),
        };
        if let Some((zone, descriptor)) = entered {
            let item = resolve_entry(descriptor, state.os.zone(zone), 0);
            apply_focus(cx, state, zone, item, FocusSource::Navigation, &mut reaction);
        }
        return reaction;
    };

    let Some(outcome) = understory_focus::tab::tab(cx.registry, &state.os.zones, &zone, direction)
    else {
        return reaction;
    };
    write_sticky(state.os.zone_mut(&outcome.zone), &outcome);
    if outcome.moved() {
        apply_focus(
            cx,
            state,
            &outcome.zone,
            outcome.item,
            FocusSource::Navigation,
            &mut reaction,
        );
    }
    reaction
}

pub(crate) fn typeahead<D>(cx: &Context<'_>, state: &mut State<D>, payload: &Payload) -> Reaction {
    let mut reaction = Reaction::none();
    if state.os.composing || state.os.host_editing {
        debug!(
            composing = state.os.composing,
            host_editing = state.os.host_editing,
            "typeahead suppressed"
        );
        return reaction;
    }
    let Some(key) = payload.text(keys::KEY).and_then(single_char) else {
        return reaction;
    };
    let Some(zone) = state.os.active_zone.clone() else {
        return reaction;
    };
    let Some(descriptor) = cx.registry.get(&zone) else {
        return reaction;
    };
    if !descriptor.config.navigate.typeahead {
        return reaction;
    }

    let current = state
        .os
        .zone(&zone)
        .and_then(|s| s.focused.as_ref())
        .and_then(|f| descriptor.index_of(f));
    let buffer = &mut state.os.typeahead;
    buffer.reset_ms = cx.config.typeahead_reset_ms;
    let found = buffer
        .on_key(key, cx.now_ms)
        .search(&descriptor.items, |item| descriptor.label(item), current);

    if let Some(index) = found
        && Some(index) != current
    {
        let item = descriptor.items[index].clone();
        apply_focus(
            cx,
            state,
            &zone,
            Some(item),
            FocusSource::Navigation,
            &mut reaction,
        );
    }
    reaction
}

fn single_char(text: &str) -> Option<char> {
    let mut chars = text.chars();
    let ch = chars.next()?;
    chars.next().is_none().then_some(ch)
}
