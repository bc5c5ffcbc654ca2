// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Clipboard router: `OS_COPY`, `OS_CUT` and `OS_PASTE` become whatever command the active
//! zone's clipboard callback returns.
//!
//! Clipboard support is optional per zone. Every miss is a debug-level no-op:
//!
//! - a native text editor owns host focus (the host keeps its default clipboard behavior),
//! - no zone is active,
//! - the zone (and its focused item) bind no callback for the hook.

use tracing::debug;
use understory_zone::Hook;

use super::route;
use crate::command::Payload;
use crate::scope::{Context, Reaction};
use crate::state::State;

fn clipboard<D>(cx: &Context<'_>, state: &State<D>, hook: Hook) -> Reaction {
    let mut reaction = Reaction::none();
    if state.os.host_editing {
        debug!(command = cx.command, "native editor owns the clipboard");
        return reaction;
    }
    let Some(zone) = state.os.active_zone.as_ref() else {
        debug!(command = cx.command, "clipboard with no active zone");
        return reaction;
    };
    let item = state.os.zone(zone).and_then(|s| s.focused.as_ref());
    match route(cx, state, zone, item, hook) {
        Some(command) => reaction.follow_up(command),
        None => debug!(command = cx.command, %zone, "no clipboard callback"),
    }
    reaction
}

pub(crate) fn copy<D>(cx: &Context<'_>, state: &mut State<D>, _: &Payload) -> Reaction {
    clipboard(cx, state, Hook::Copy)
}

pub(crate) fn cut<D>(cx: &Context<'_>, state: &mut State<D>, _: &Payload) -> Reaction {
    clipboard(cx, state, Hook::Cut)
}

pub(crate) fn paste<D>(cx: &Context<'_>, state: &mut State<D>, _: &Payload) -> Reaction {
    clipboard(cx, state, Hook::Paste)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::KernelConfig;
    use crate::command::Command;
    use understory_zone::{ItemId, ZoneConfig, ZoneDescriptor, ZoneId, ZoneRegistry};

    fn run(registry: &ZoneRegistry<Command>, state: &mut State<()>, command: Command) -> Reaction {
        let config = KernelConfig::default();
        let cx = Context {
            registry,
            config: &config,
            now_ms: 0,
            command: &command.kind,
        };
        let handler: fn(&Context<'_>, &mut State<()>, &Payload) -> Reaction =
            match command.kind.as_ref() {
                crate::command::os::COPY => copy,
                crate::command::os::CUT => cut,
                _ => paste,
            };
        handler(&cx, state, &command.payload)
    }

    fn registry() -> ZoneRegistry<Command> {
        let mut registry = ZoneRegistry::new();
        registry.register(
            ZoneId::from("list"),
            ZoneDescriptor::new(ZoneConfig::default())
                .with_items(["a"])
                .with_callback(Hook::Copy, |cx| {
                    cx.item.map(|i| Command::new("COPY_ITEM").with_target(i.clone()))
                }),
        );
        registry
    }

    fn active(state: &mut State<()>) {
        let zone = ZoneId::from("list");
        state.os.active_zone = Some(zone.clone());
        state.os.focus_path = vec![zone.clone()];
        state.os.zone_mut(&zone).focused = Some(ItemId::from("a"));
    }

    #[test]
    fn copy_routes_to_the_zone_callback() {
        let registry = registry();
        let mut state = State::new(());
        active(&mut state);
        let r = run(&registry, &mut state, Command::copy());
        assert_eq!(r.follow_ups.len(), 1);
        assert_eq!(r.follow_ups[0].kind, "COPY_ITEM");
        assert_eq!(
            r.follow_ups[0].payload.item(crate::command::keys::TARGET),
            Some(&ItemId::from("a"))
        );
    }

    #[test]
    fn misses_are_no_ops() {
        let registry = registry();
        let mut state = State::new(());
        assert!(run(&registry, &mut state, Command::copy()).follow_ups.is_empty());

        active(&mut state);
        assert!(run(&registry, &mut state, Command::paste()).follow_ups.is_empty());

        state.os.host_editing = true;
        assert!(run(&registry, &mut state, Command::copy()).follow_ups.is_empty());
    }
}
