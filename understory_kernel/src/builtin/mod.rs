// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handlers for the built-in `OS_*` commands, installed in the global scope.

mod activate;
mod clipboard;
mod focus;
mod history;
mod select;

use understory_selection::follow_focus;
use understory_zone::{Activation, CallbackCx, Hook, ItemId, ZoneId};

use crate::command::{Command, os};
use crate::effect::Effect;
use crate::scope::{CommandDef, Context, HandlerTable, Reaction};
use crate::state::State;

/// Register every built-in handler in `table`'s global scope.
pub(crate) fn install<D: Clone + 'static>(table: &mut HandlerTable<D>) {
    let defs = [
        CommandDef::new(os::NAVIGATE, focus::navigate::<D>),
        CommandDef::new(os::FOCUS, focus::focus::<D>),
        CommandDef::new(os::TAB, focus::tab::<D>),
        CommandDef::new(os::TYPEAHEAD, focus::typeahead::<D>),
        CommandDef::new(os::SELECT, select::select::<D>),
        CommandDef::new(os::TOGGLE_SELECTION, select::toggle_selection::<D>),
        CommandDef::new(os::SELECT_ALL, select::select_all::<D>),
        CommandDef::new(os::DESELECT_ALL, select::deselect_all::<D>),
        CommandDef::new(os::ACTIVATE, activate::activate::<D>),
        CommandDef::new(os::EXPAND, activate::expand::<D>),
        CommandDef::new(os::CHECK, activate::check::<D>),
        CommandDef::new(os::DELETE, activate::delete::<D>),
        CommandDef::new(os::ESCAPE, activate::escape::<D>),
        CommandDef::new(os::COPY, clipboard::copy::<D>),
        CommandDef::new(os::CUT, clipboard::cut::<D>),
        CommandDef::new(os::PASTE, clipboard::paste::<D>),
        CommandDef::new(os::UNDO, history::undo::<D>),
        CommandDef::new(os::REDO, history::redo::<D>),
    ];
    for def in defs {
        table.register(def);
    }
}

/// What caused a focus change.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum FocusSource {
    /// Arrow keys, Tab, typeahead.
    Navigation,
    /// Direct focus request, history restore, dismissal.
    Direct,
    /// A selection operation moved focus; selection is not replaced again.
    Selection,
}

/// Make `zone` active with `item` focused and queue the matching host effects.
///
/// Zones that follow focus replace their selection unless the change came from a selection
/// operation. Zones with automatic activation route their action callback on navigation.
pub(crate) fn apply_focus<D>(
    cx: &Context<'_>,
    state: &mut State<D>,
    zone: &ZoneId,
    item: Option<ItemId>,
    source: FocusSource,
    reaction: &mut Reaction,
) {
    let previous = state.os.focus();
    if state.os.active_zone.as_ref() != Some(zone) || state.os.focus_path.is_empty() {
        state.os.activate(cx.registry, zone);
    }
    let descriptor = cx.registry.get(zone);
    let zone_state = state.os.zone_mut(zone);
    zone_state.focus(item.clone());

    if let (Some(descriptor), Some(item)) = (descriptor, &item)
        && source != FocusSource::Selection
        && let Some(next) = follow_focus(&descriptor.config.select, item)
    {
        zone_state.selection = next.selected;
        zone_state.anchor = next.anchor;
    }

    reaction.effect(Effect::Focus {
        zone: zone.clone(),
        item: item.clone(),
    });
    if let Some(item) = &item {
        reaction.effect(Effect::ScrollIntoView { item: item.clone() });
    }

    let moved = previous.is_none_or(|p| &p.zone != zone || p.item != item);
    if moved
        && source == FocusSource::Navigation
        && descriptor.is_some_and(|d| d.config.activate == Activation::Automatic)
        && let Some(command) = route(cx, state, zone, item.as_ref(), Hook::Action)
    {
        reaction.follow_up(command);
    }
}

/// Call the callback bound to `hook` for `item` (or the zone) and return its command.
pub(crate) fn route<D>(
    cx: &Context<'_>,
    state: &State<D>,
    zone: &ZoneId,
    item: Option<&ItemId>,
    hook: Hook,
) -> Option<Command> {
    let callback = cx.registry.callback(zone, item, hook)?;
    let selection = state
        .os
        .zone(zone)
        .map_or(&[][..], |s| s.selection.as_slice());
    callback(&CallbackCx {
        zone,
        item,
        selection,
    })
}

/// Zone an item command applies to: the item's owner, else the active zone.
pub(crate) fn owning_zone<D>(
    cx: &Context<'_>,
    state: &State<D>,
    item: Option<&ItemId>,
) -> Option<ZoneId> {
    item.and_then(|i| cx.registry.find_item_owner(i))
        .or(state.os.active_zone.as_ref())
        .cloned()
}
