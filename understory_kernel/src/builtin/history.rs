// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `OS_UNDO` and `OS_REDO`.

use std::borrow::Cow;

use tracing::debug;

use super::{FocusSource, apply_focus};
use crate::command::{Payload, os};
use crate::history::HistoryEntry;
use crate::scope::{Context, Reaction};
use crate::state::State;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Travel {
    Back,
    Forward,
}

fn travel<D: Clone>(cx: &Context<'_>, state: &mut State<D>, way: Travel) -> Reaction {
    let mut reaction = Reaction::none();
    let current = HistoryEntry {
        command: Cow::Borrowed(match way {
            Travel::Back => os::UNDO,
            Travel::Forward => os::REDO,
        }),
        field: None,
        timestamp: cx.now_ms,
        data: state.data.clone(),
        focus: state.os.focus(),
    };
    let entry = match way {
        Travel::Back => state.history.undo(current),
        Travel::Forward => state.history.redo(current),
    };
    let Some(entry) = entry else {
        debug!(command = cx.command, "nothing to restore");
        return reaction;
    };

    state.data = entry.data;
    if let Some(focus) = entry.focus
        && cx.registry.contains(&focus.zone)
    {
        let item = focus
            .item
            .filter(|item| cx.registry.items(&focus.zone).contains(item));
        apply_focus(cx, state, &focus.zone, item, FocusSource::Direct, &mut reaction);
    }
    reaction
}

pub(crate) fn undo<D: Clone>(cx: &Context<'_>, state: &mut State<D>, _: &Payload) -> Reaction {
    travel(cx, state, Travel::Back)
}

pub(crate) fn redo<D: Clone>(cx: &Context<'_>, state: &mut State<D>, _: &Payload) -> Reaction {
    travel(cx, state, Travel::Forward)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::KernelConfig;
    use crate::command::Command;
    use crate::effect::Effect;
    use crate::state::FocusTarget;
    use understory_zone::{ItemId, ZoneConfig, ZoneDescriptor, ZoneId, ZoneRegistry};

    #[test]
    fn undo_restores_data_and_focus_and_redo_mirrors_it() {
        let mut registry: ZoneRegistry<Command> = ZoneRegistry::new();
        registry.register(
            ZoneId::from("list"),
            ZoneDescriptor::new(ZoneConfig::default()).with_items(["a", "b"]),
        );
        let config = KernelConfig::default();
        let cx = Context {
            registry: &registry,
            config: &config,
            now_ms: 5,
            command: os::UNDO,
        };

        let mut state = State::new(2_u32);
        state.history.record(
            HistoryEntry {
                command: Cow::Borrowed("SET"),
                field: None,
                timestamp: 0,
                data: 1,
                focus: Some(FocusTarget {
                    zone: ZoneId::from("list"),
                    item: Some(ItemId::from("a")),
                }),
            },
            None,
        );

        let r = undo(&cx, &mut state, &Payload::new());
        assert_eq!(state.data, 1);
        assert_eq!(state.os.focused_item(), Some(&ItemId::from("a")));
        assert!(r.effects.contains(&Effect::Focus {
            zone: ZoneId::from("list"),
            item: Some(ItemId::from("a")),
        }));

        redo(&cx, &mut state, &Payload::new());
        assert_eq!(state.data, 2);
        assert!(state.history.can_undo());
        assert!(!state.history.can_redo());
    }

    #[test]
    fn underflow_is_a_no_op() {
        let registry: ZoneRegistry<Command> = ZoneRegistry::new();
        let config = KernelConfig::default();
        let cx = Context {
            registry: &registry,
            config: &config,
            now_ms: 0,
            command: os::REDO,
        };
        let mut state = State::new(7_u32);
        let r = redo(&cx, &mut state, &Payload::new());
        assert_eq!(state.data, 7);
        assert_eq!(r, Reaction::none());
    }
}
