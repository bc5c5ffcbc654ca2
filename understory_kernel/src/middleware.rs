// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Middleware around each command.
//!
//! Every command passes through the chain twice:
//!
//! ```text
//! before (registration order) → resolve → handler → after (registration order)
//! ```
//!
//! [`Middleware::before`] may rewrite the command before its handler is looked up.
//! [`Middleware::after`] sees the state the handler produced, the snapshot taken just before
//! it ran, and the effects it returned.
//!
//! The kernel installs three middlewares ahead of any added by the host:
//! [`PlaceholderResolver`], [`EffectApplier`] and [`HistoryRecorder`].

use std::fmt;

use crate::command::{Arg, Command, FocusRef};
use crate::config::KernelConfig;
use crate::effect::{Effect, EffectRecord};
use crate::history::HistoryEntry;
use crate::state::{FocusTarget, State};

/// The pre-handler view of the undoable slice.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot<D> {
    /// `data` before the handler ran.
    pub data: D,
    /// Focus before the handler ran.
    pub focus: Option<FocusTarget>,
}

/// Everything the post-handler pass can see and change.
pub struct AfterCx<'a, D> {
    /// The command that ran, after the `before` pass.
    pub command: &'a Command,
    /// The handler's history flag.
    pub log_to_history: Option<bool>,
    /// Dispatch time, in milliseconds.
    pub now_ms: u64,
    /// State before the handler ran.
    pub before: &'a Snapshot<D>,
    /// State after the handler ran.
    pub state: &'a mut State<D>,
    /// Effects the handler returned and the effect pass has not consumed yet.
    pub effects: &'a mut Vec<Effect>,
    /// Effect records waiting for the projector.
    pub records: &'a mut Vec<EffectRecord>,
    /// Kernel configuration.
    pub config: &'a KernelConfig,
}

impl<D> fmt::Debug for AfterCx<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AfterCx")
            .field("command", &self.command)
            .field("log_to_history", &self.log_to_history)
            .field("now_ms", &self.now_ms)
            .field("effects", &self.effects)
            .field("records", &self.records.len())
            .finish_non_exhaustive()
    }
}

/// A pass around each command.
pub trait Middleware<D> {
    /// Rewrite `command` before its handler is resolved.
    fn before(&mut self, state: &State<D>, command: &mut Command) {
        let _ = (state, command);
    }

    /// Observe or adjust the outcome of a handled command.
    fn after(&mut self, cx: &mut AfterCx<'_, D>) {
        let _ = cx;
    }
}

/// Replaces [`FocusRef::Current`] payload entries with the focused item of the active zone.
///
/// Entries stay unresolved when nothing is focused; handlers then see no explicit item.
#[derive(Copy, Clone, Debug, Default)]
pub struct PlaceholderResolver;

impl<D> Middleware<D> for PlaceholderResolver {
    fn before(&mut self, state: &State<D>, command: &mut Command) {
        let Some(focused) = state.os.focused_item() else {
            return;
        };
        for (_, arg) in command.payload.iter_mut() {
            if let Arg::Item(item @ FocusRef::Current) = arg {
                *item = FocusRef::Explicit(focused.clone());
            }
        }
    }
}

/// Turns handler effects into [`EffectRecord`]s for the projector.
#[derive(Copy, Clone, Debug, Default)]
pub struct EffectApplier;

impl<D> Middleware<D> for EffectApplier {
    fn after(&mut self, cx: &mut AfterCx<'_, D>) {
        cx.records
            .extend(cx.effects.drain(..).map(EffectRecord::from));
    }
}

/// Records a history entry when a command changed `data`.
///
/// Commands on the configured skip list, and handlers registered with
/// `log_to_history: Some(false)`, are never recorded. Kinds on the coalesce list merge into the
/// previous entry when they edit the same field within the configured window.
#[derive(Copy, Clone, Debug, Default)]
pub struct HistoryRecorder;

impl<D: Clone + PartialEq> Middleware<D> for HistoryRecorder {
    fn after(&mut self, cx: &mut AfterCx<'_, D>) {
        if cx.log_to_history == Some(false) || cx.state.data == cx.before.data {
            return;
        }
        let kind = &cx.command.kind;
        let history = &cx.config.history;
        if history.skips(kind) {
            return;
        }
        let entry = HistoryEntry {
            command: kind.clone(),
            field: cx.command.field().map(str::to_owned),
            timestamp: cx.now_ms,
            data: cx.before.data.clone(),
            focus: cx.before.focus.clone(),
        };
        let merged = cx.state.history.record(entry, history.coalesce_window(kind));
        tracing::trace!(command = %kind, merged, "history entry recorded");
    }
}
