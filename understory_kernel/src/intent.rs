// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Translation of normalized input intents into commands.
//!
//! Host event capture produces [`Intent`]s (key and pointer events already classified). This
//! module turns them into [`Command`]s using the active zone's policy, and drops the ones that
//! must not reach the kernel at all (typing while an editor or IME owns the keyboard).

use bitflags::bitflags;
use understory_focus::{Direction, TabDirection};
use understory_selection::SelectOp;
use understory_zone::{ItemId, ZoneConfig, ZoneRegistry};

use crate::command::{Command, FocusRef};
use crate::state::OsState;

bitflags! {
    /// Modifier keys held during an intent.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift.
        const SHIFT = 1 << 0;
        /// Control.
        const CTRL = 1 << 1;
        /// Alt / Option.
        const ALT = 1 << 2;
        /// Meta / Command.
        const META = 1 << 3;
    }
}

/// A classified input event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    /// Arrow, Home or End key.
    Navigate {
        /// Direction.
        direction: Direction,
        /// Held modifiers.
        modifiers: Modifiers,
    },
    /// Tab or Shift+Tab.
    Tab {
        /// Shift+Tab.
        backward: bool,
    },
    /// Click or Space on an item.
    Select {
        /// Item clicked; `None` for the focused item.
        target: Option<ItemId>,
        /// Held modifiers.
        modifiers: Modifiers,
    },
    /// Enter or double click.
    Activate {
        /// Item activated; `None` for the focused item.
        target: Option<ItemId>,
    },
    /// Escape.
    Dismiss,
    /// A printable character.
    Typeahead(char),
}

/// Clipboard event kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ClipboardKind {
    /// Copy.
    Copy,
    /// Cut.
    Cut,
    /// Paste.
    Paste,
}

fn active_config<'r>(os: &OsState, registry: &'r ZoneRegistry<Command>) -> Option<&'r ZoneConfig> {
    registry.get(os.active_zone.as_ref()?).map(|d| &d.config)
}

fn focus_ref(target: Option<&ItemId>) -> FocusRef {
    target.cloned().map_or(FocusRef::Current, FocusRef::Explicit)
}

/// Command for `intent`, or `None` when the intent should not reach the kernel.
///
/// - Shift+Arrow extends the selection in zones with range selection.
/// - Select maps Shift to [`SelectOp::Range`], Ctrl or Meta to [`SelectOp::Toggle`], and
///   anything else to [`SelectOp::Replace`].
/// - Typeahead is dropped while composing or editing text, for control characters, and when the
///   active zone does not enable it.
pub fn translate(
    intent: &Intent,
    os: &OsState,
    registry: &ZoneRegistry<Command>,
) -> Option<Command> {
    let config = active_config(os, registry);
    let command = match intent {
        Intent::Navigate {
            direction,
            modifiers,
        } => {
            if modifiers.contains(Modifiers::SHIFT) && config.is_some_and(|c| c.select.range) {
                Command::navigate_extend(*direction)
            } else {
                Command::navigate(*direction)
            }
        }
        Intent::Tab { backward } => Command::tab(if *backward {
            TabDirection::Backward
        } else {
            TabDirection::Forward
        }),
        Intent::Select { target, modifiers } => {
            let op = if modifiers.contains(Modifiers::SHIFT) {
                SelectOp::Range
            } else if modifiers.intersects(Modifiers::CTRL | Modifiers::META) {
                SelectOp::Toggle
            } else {
                SelectOp::Replace
            };
            Command::select(focus_ref(target.as_ref()), op)
        }
        Intent::Activate { target } => Command::activate(focus_ref(target.as_ref())),
        Intent::Dismiss => Command::escape(),
        Intent::Typeahead(ch) => {
            if os.composing || os.host_editing || ch.is_control() {
                return None;
            }
            if !config?.navigate.typeahead {
                return None;
            }
            Command::typeahead(*ch)
        }
    };
    Some(command)
}

/// Command for a clipboard event, or `None` while a native editor owns host focus.
pub fn clipboard_command(kind: ClipboardKind, host_editing: bool) -> Option<Command> {
    if host_editing {
        return None;
    }
    Some(match kind {
        ClipboardKind::Copy => Command::copy(),
        ClipboardKind::Cut => Command::cut(),
        ClipboardKind::Paste => Command::paste(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{keys, os};
    use understory_zone::{ZoneDescriptor, ZoneId};

    fn setup(config: ZoneConfig) -> (OsState, ZoneRegistry<Command>) {
        let mut registry = ZoneRegistry::new();
        let zone = ZoneId::from("z");
        registry.register(zone.clone(), ZoneDescriptor::new(config).with_items(["a"]));
        let mut os = OsState::default();
        os.activate(&registry, &zone);
        (os, registry)
    }

    #[test]
    fn shift_arrow_extends_only_in_range_zones() {
        let intent = Intent::Navigate {
            direction: Direction::Down,
            modifiers: Modifiers::SHIFT,
        };
        let (os, registry) = setup(ZoneConfig::multiselect());
        let cmd = translate(&intent, &os, &registry).unwrap();
        assert!(cmd.payload.flag(keys::EXTEND));

        let (os, registry) = setup(ZoneConfig::listbox());
        let cmd = translate(&intent, &os, &registry).unwrap();
        assert!(!cmd.payload.flag(keys::EXTEND));
    }

    #[test]
    fn select_modifiers_pick_the_operation() {
        let (os, registry) = setup(ZoneConfig::multiselect());
        let op = |modifiers| {
            translate(
                &Intent::Select {
                    target: Some(ItemId::from("a")),
                    modifiers,
                },
                &os,
                &registry,
            )
            .and_then(|c| c.payload.select_op(keys::MODE))
        };
        assert_eq!(op(Modifiers::empty()), Some(SelectOp::Replace));
        assert_eq!(op(Modifiers::SHIFT | Modifiers::CTRL), Some(SelectOp::Range));
        assert_eq!(op(Modifiers::META), Some(SelectOp::Toggle));
    }

    #[test]
    fn activate_without_target_uses_the_placeholder() {
        let (os, registry) = setup(ZoneConfig::default());
        let cmd = translate(&Intent::Activate { target: None }, &os, &registry).unwrap();
        assert_eq!(cmd.kind, os::ACTIVATE);
        assert_eq!(
            cmd.payload.get(keys::TARGET),
            Some(&crate::command::Arg::Item(FocusRef::Current))
        );
    }

    #[test]
    fn typeahead_is_gated() {
        let (mut os, registry) = setup(ZoneConfig::listbox());
        assert!(translate(&Intent::Typeahead('a'), &os, &registry).is_some());
        assert!(translate(&Intent::Typeahead('\n'), &os, &registry).is_none());
        os.composing = true;
        assert!(translate(&Intent::Typeahead('a'), &os, &registry).is_none());

        let (os, registry) = setup(ZoneConfig::default());
        assert!(translate(&Intent::Typeahead('a'), &os, &registry).is_none());
    }

    #[test]
    fn clipboard_defers_to_native_editors() {
        assert_eq!(
            clipboard_command(ClipboardKind::Cut, false).map(|c| c.kind),
            Some(os::CUT.into())
        );
        assert!(clipboard_command(ClipboardKind::Paste, true).is_none());
    }
}
