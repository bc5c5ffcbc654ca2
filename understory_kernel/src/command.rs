// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Commands and their payloads.
//!
//! A [`Command`] is a kind (a string id such as [`os::NAVIGATE`]) plus a small ordered
//! key→[`Arg`] [`Payload`]. Item references use [`FocusRef`], whose [`FocusRef::Current`]
//! variant stands for "whatever is focused when this runs" and is resolved by the kernel before
//! handler lookup.

use std::borrow::Cow;
use std::fmt;

use smallvec::SmallVec;
use understory_focus::{Direction, TabDirection};
use understory_selection::SelectOp;
use understory_zone::{ItemId, ZoneId};

/// Built-in command ids.
pub mod os {
    /// Arrow-key navigation: `{direction, extend?}`.
    pub const NAVIGATE: &str = "OS_NAVIGATE";
    /// Direct focus: `{zone, item?}`.
    pub const FOCUS: &str = "OS_FOCUS";
    /// Tab traversal: `{tab}`.
    pub const TAB: &str = "OS_TAB";
    /// Selection: `{target, mode}`.
    pub const SELECT: &str = "OS_SELECT";
    /// Select every item of the active zone.
    pub const SELECT_ALL: &str = "OS_SELECT_ALL";
    /// Clear the active zone's selection.
    pub const DESELECT_ALL: &str = "OS_DESELECT_ALL";
    /// Activation: `{target}`.
    pub const ACTIVATE: &str = "OS_ACTIVATE";
    /// Escape / dismiss.
    pub const ESCAPE: &str = "OS_ESCAPE";
    /// Expansion: `{item, action}`.
    pub const EXPAND: &str = "OS_EXPAND";
    /// Check toggle: `{target}`.
    pub const CHECK: &str = "OS_CHECK";
    /// Clipboard copy.
    pub const COPY: &str = "OS_COPY";
    /// Clipboard cut.
    pub const CUT: &str = "OS_CUT";
    /// Clipboard paste.
    pub const PASTE: &str = "OS_PASTE";
    /// Undo.
    pub const UNDO: &str = "OS_UNDO";
    /// Redo.
    pub const REDO: &str = "OS_REDO";
    /// Typeahead key press: `{key}`.
    pub const TYPEAHEAD: &str = "OS_TYPEAHEAD";
    /// Deletion request: `{target}`.
    pub const DELETE: &str = "OS_DELETE";
    /// Toggle one item's membership in the selection: `{target}`.
    pub const TOGGLE_SELECTION: &str = "TOGGLE_SELECTION";
}

/// Payload keys used by the built-in commands.
pub mod keys {
    /// Item the command acts on.
    pub const TARGET: &str = "target";
    /// Zone the command acts on.
    pub const ZONE: &str = "zone";
    /// Navigation direction.
    pub const DIRECTION: &str = "direction";
    /// Tab direction.
    pub const TAB: &str = "tab";
    /// Extend the selection while navigating.
    pub const EXTEND: &str = "extend";
    /// Selection operation.
    pub const MODE: &str = "mode";
    /// Expansion action.
    pub const ACTION: &str = "action";
    /// Typed key.
    pub const KEY: &str = "key";
    /// Logical field a command edits; drives history coalescing.
    pub const FIELD: &str = "field";
    /// Free-form value.
    pub const VALUE: &str = "value";
}

/// Reference to an item that may be resolved at dispatch time.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FocusRef {
    /// A specific item.
    Explicit(ItemId),
    /// The item focused in the active zone when the command is dispatched.
    Current,
}

impl From<ItemId> for FocusRef {
    fn from(id: ItemId) -> Self {
        Self::Explicit(id)
    }
}

impl From<&str> for FocusRef {
    fn from(id: &str) -> Self {
        Self::Explicit(ItemId::from(id))
    }
}

/// What [`os::EXPAND`] does.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ExpandAction {
    /// Flip the expanded state.
    #[default]
    Toggle,
    /// Expand.
    Expand,
    /// Collapse.
    Collapse,
}

/// A payload value.
#[derive(Clone, Debug, PartialEq)]
pub enum Arg {
    /// Item reference.
    Item(FocusRef),
    /// Zone id.
    Zone(ZoneId),
    /// Text.
    Text(String),
    /// Integer.
    Int(i64),
    /// Boolean.
    Bool(bool),
    /// Navigation direction.
    Direction(Direction),
    /// Tab direction.
    Tab(TabDirection),
    /// Selection operation.
    Select(SelectOp),
    /// Expansion action.
    Expand(ExpandAction),
}

/// Ordered key→[`Arg`] list. Setting a key twice replaces the earlier value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Payload {
    entries: SmallVec<[(&'static str, Arg); 4]>,
}

impl Payload {
    /// Empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `arg`.
    pub fn set(&mut self, key: &'static str, arg: Arg) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = arg,
            None => self.entries.push((key, arg)),
        }
    }

    /// Value of `key`.
    pub fn get(&self, key: &str) -> Option<&Arg> {
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Mutable value of `key`.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Arg> {
        self.entries
            .iter_mut()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }

    /// Whether the payload has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Arg)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    /// Mutable entries in insertion order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&'static str, &mut Arg)> {
        self.entries.iter_mut().map(|(k, v)| (*k, v))
    }

    /// Explicit item under `key`. An unresolved [`FocusRef::Current`] yields `None`.
    pub fn item(&self, key: &str) -> Option<&ItemId> {
        match self.get(key)? {
            Arg::Item(FocusRef::Explicit(id)) => Some(id),
            _ => None,
        }
    }

    /// Zone under `key`.
    pub fn zone(&self, key: &str) -> Option<&ZoneId> {
        match self.get(key)? {
            Arg::Zone(id) => Some(id),
            _ => None,
        }
    }

    /// Text under `key`.
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.get(key)? {
            Arg::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Integer under `key`.
    pub fn int(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            Arg::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Boolean under `key`; absent reads as `false`.
    pub fn flag(&self, key: &str) -> bool {
        matches!(self.get(key), Some(Arg::Bool(true)))
    }

    /// Direction under `key`.
    pub fn direction(&self, key: &str) -> Option<Direction> {
        match self.get(key)? {
            Arg::Direction(d) => Some(*d),
            _ => None,
        }
    }

    /// Tab direction under `key`.
    pub fn tab(&self, key: &str) -> Option<TabDirection> {
        match self.get(key)? {
            Arg::Tab(d) => Some(*d),
            _ => None,
        }
    }

    /// Selection operation under `key`.
    pub fn select_op(&self, key: &str) -> Option<SelectOp> {
        match self.get(key)? {
            Arg::Select(op) => Some(*op),
            _ => None,
        }
    }

    /// Expansion action under `key`.
    pub fn expand(&self, key: &str) -> Option<ExpandAction> {
        match self.get(key)? {
            Arg::Expand(a) => Some(*a),
            _ => None,
        }
    }
}

/// A command: a kind plus its payload.
#[derive(Clone, Debug, PartialEq)]
pub struct Command {
    /// Command id, resolved against the scope chain.
    pub kind: Cow<'static, str>,
    /// Arguments.
    pub payload: Payload,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.kind)
    }
}

impl Command {
    /// Command with an empty payload.
    pub fn new(kind: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind: kind.into(),
            payload: Payload::new(),
        }
    }

    /// Add a payload entry.
    pub fn with(mut self, key: &'static str, arg: Arg) -> Self {
        self.payload.set(key, arg);
        self
    }

    /// Add an item reference under [`keys::TARGET`].
    pub fn with_target(self, target: impl Into<FocusRef>) -> Self {
        self.with(keys::TARGET, Arg::Item(target.into()))
    }

    /// Tag the logical field this command edits, for history coalescing.
    pub fn with_field(self, field: impl Into<String>) -> Self {
        self.with(keys::FIELD, Arg::Text(field.into()))
    }

    /// Logical field this command edits.
    pub fn field(&self) -> Option<&str> {
        self.payload.text(keys::FIELD)
    }

    /// [`os::NAVIGATE`].
    pub fn navigate(direction: Direction) -> Self {
        Self::new(os::NAVIGATE).with(keys::DIRECTION, Arg::Direction(direction))
    }

    /// [`os::NAVIGATE`] extending the selection from its anchor.
    pub fn navigate_extend(direction: Direction) -> Self {
        Self::navigate(direction).with(keys::EXTEND, Arg::Bool(true))
    }

    /// [`os::FOCUS`] on a zone, letting its entry policy pick the item.
    pub fn focus_zone(zone: impl Into<ZoneId>) -> Self {
        Self::new(os::FOCUS).with(keys::ZONE, Arg::Zone(zone.into()))
    }

    /// [`os::FOCUS`] on an item of a zone.
    pub fn focus(zone: impl Into<ZoneId>, item: impl Into<ItemId>) -> Self {
        Self::focus_zone(zone).with_target(item.into())
    }

    /// [`os::TAB`].
    pub fn tab(direction: TabDirection) -> Self {
        Self::new(os::TAB).with(keys::TAB, Arg::Tab(direction))
    }

    /// [`os::SELECT`].
    pub fn select(target: impl Into<FocusRef>, op: SelectOp) -> Self {
        Self::new(os::SELECT)
            .with_target(target)
            .with(keys::MODE, Arg::Select(op))
    }

    /// [`os::SELECT_ALL`].
    pub fn select_all() -> Self {
        Self::new(os::SELECT_ALL)
    }

    /// [`os::DESELECT_ALL`].
    pub fn deselect_all() -> Self {
        Self::new(os::DESELECT_ALL)
    }

    /// [`os::TOGGLE_SELECTION`].
    pub fn toggle_selection(target: impl Into<FocusRef>) -> Self {
        Self::new(os::TOGGLE_SELECTION).with_target(target)
    }

    /// [`os::ACTIVATE`].
    pub fn activate(target: impl Into<FocusRef>) -> Self {
        Self::new(os::ACTIVATE).with_target(target)
    }

    /// [`os::ESCAPE`].
    pub fn escape() -> Self {
        Self::new(os::ESCAPE)
    }

    /// [`os::EXPAND`].
    pub fn expand(item: impl Into<FocusRef>, action: ExpandAction) -> Self {
        Self::new(os::EXPAND)
            .with_target(item)
            .with(keys::ACTION, Arg::Expand(action))
    }

    /// [`os::CHECK`].
    pub fn check(target: impl Into<FocusRef>) -> Self {
        Self::new(os::CHECK).with_target(target)
    }

    /// [`os::DELETE`].
    pub fn delete(target: impl Into<FocusRef>) -> Self {
        Self::new(os::DELETE).with_target(target)
    }

    /// [`os::COPY`].
    pub fn copy() -> Self {
        Self::new(os::COPY)
    }

    /// [`os::CUT`].
    pub fn cut() -> Self {
        Self::new(os::CUT)
    }

    /// [`os::PASTE`].
    pub fn paste() -> Self {
        Self::new(os::PASTE)
    }

    /// [`os::UNDO`].
    pub fn undo() -> Self {
        Self::new(os::UNDO)
    }

    /// [`os::REDO`].
    pub fn redo() -> Self {
        Self::new(os::REDO)
    }

    /// [`os::TYPEAHEAD`].
    pub fn typeahead(key: char) -> Self {
        Self::new(os::TYPEAHEAD).with(keys::KEY, Arg::Text(key.to_string()))
    }
}
