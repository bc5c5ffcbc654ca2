// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `OS_ACTIVATE`, `OS_EXPAND`, `OS_CHECK`, `OS_DELETE` and `OS_ESCAPE`.

use tracing::debug;
use understory_focus::entry::resolve_entry;
use understory_selection::Selection;
use understory_zone::{DismissPolicy, Hook, ItemId, ZoneId};

use super::{FocusSource, apply_focus, owning_zone, route};
use crate::command::{ExpandAction, Payload, keys};
use crate::scope::{Context, Reaction};
use crate::state::State;

/// Target item of an item command: the explicit target, else the focused item.
fn target<D>(state: &State<D>, payload: &Payload) -> Option<ItemId> {
    payload
        .item(keys::TARGET)
        .or_else(|| state.os.focused_item())
        .cloned()
}

fn set_expanded<D>(state: &mut State<D>, zone: &ZoneId, item: &ItemId, action: ExpandAction) {
    let expanded = &mut state.os.zone_mut(zone).expanded;
    let open = match action {
        ExpandAction::Toggle => !expanded.contains(item),
        ExpandAction::Expand => true,
        ExpandAction::Collapse => false,
    };
    if open {
        expanded.insert(item.clone());
    } else {
        expanded.remove(item);
    }
}

pub(crate) fn activate<D>(cx: &Context<'_>, state: &mut State<D>, payload: &Payload) -> Reaction {
    let mut reaction = Reaction::none();
    let Some(item) = target(state, payload) else {
        return reaction;
    };
    let Some(zone) = owning_zone(cx, state, Some(&item)) else {
        return reaction;
    };
    if let Some(command) = route(cx, state, &zone, Some(&item), Hook::Action) {
        reaction.follow_up(command);
    } else if cx
        .registry
        .get(&zone)
        .and_then(|d| d.meta.get(&item))
        .is_some_and(|m| m.expandable)
    {
        set_expanded(state, &zone, &item, ExpandAction::Toggle);
    } else {
        debug!(%zone, %item, "activation with no action bound");
    }
    reaction
}

pub(crate) fn expand<D>(cx: &Context<'_>, state: &mut State<D>, payload: &Payload) -> Reaction {
    let Some(item) = target(state, payload) else {
        return Reaction::none();
    };
    let Some(zone) = owning_zone(cx, state, Some(&item)) else {
        return Reaction::none();
    };
    if cx.registry.items(&zone).contains(&item) {
        let action = payload.expand(keys::ACTION).unwrap_or_default();
        set_expanded(state, &zone, &item, action);
    }
    Reaction::none()
}

fn route_item<D>(cx: &Context<'_>, state: &State<D>, payload: &Payload, hook: Hook) -> Reaction {
    let mut reaction = Reaction::none();
    let item = target(state, payload);
    let Some(zone) = owning_zone(cx, state, item.as_ref()) else {
        return reaction;
    };
    match route(cx, state, &zone, item.as_ref(), hook) {
        Some(command) => reaction.follow_up(command),
        None => debug!(%zone, ?hook, "no callback bound"),
    }
    reaction
}

pub(crate) fn check<D>(cx: &Context<'_>, state: &mut State<D>, payload: &Payload) -> Reaction {
    route_item(cx, state, payload, Hook::Check)
}

pub(crate) fn delete<D>(cx: &Context<'_>, state: &mut State<D>, payload: &Payload) -> Reaction {
    route_item(cx, state, payload, Hook::Delete)
}

/// Walk the focus path deepest-first, applying each zone's dismiss policy.
///
/// A zone whose dismiss has no effect (`none`, or `deselect` with nothing selected) hands the
/// dismissal to its parent only when its config sets `bubble`.
pub(crate) fn escape<D>(cx: &Context<'_>, state: &mut State<D>, _: &Payload) -> Reaction {
    let mut reaction = Reaction::none();
    let path: Vec<ZoneId> = state.os.focus_path.iter().rev().cloned().collect();
    for zone in &path {
        let Some(descriptor) = cx.registry.get(zone) else {
            continue;
        };
        let dismiss = descriptor.config.dismiss;
        let handled = match dismiss.policy {
            DismissPolicy::Deselect => deselect(state, zone, descriptor.config.select.min()),
            DismissPolicy::Close => {
                close(cx, state, zone, &mut reaction);
                true
            }
            DismissPolicy::None => false,
        };
        if handled || !dismiss.bubble {
            break;
        }
    }
    reaction
}

fn deselect<D>(state: &mut State<D>, zone: &ZoneId, min: usize) -> bool {
    let zone_state = state.os.zone_mut(zone);
    if zone_state.selection.is_empty() {
        return false;
    }
    let current = Selection::from_parts(zone_state.selection.clone(), zone_state.anchor.clone());
    let next = understory_selection::clear(&current, min);
    if next == current {
        return false;
    }
    zone_state.selection = next.selected;
    zone_state.anchor = next.anchor;
    true
}

fn close<D>(cx: &Context<'_>, state: &mut State<D>, zone: &ZoneId, reaction: &mut Reaction) {
    let focused = state.os.zone(zone).and_then(|s| s.focused.clone());
    if let Some(command) = route(cx, state, zone, focused.as_ref(), Hook::Dismiss) {
        reaction.follow_up(command);
    }
    let Some(parent) = cx.registry.parent_of(zone) else {
        return;
    };
    let Some(descriptor) = cx.registry.get(parent) else {
        return;
    };
    let item = state
        .os
        .zone(parent)
        .and_then(|s| s.focused.clone())
        .filter(|f| descriptor.index_of(f).is_some())
        .or_else(|| resolve_entry(descriptor, state.os.zone(parent), 0));
    apply_focus(cx, state, parent, item, FocusSource::Direct, reaction);
}
