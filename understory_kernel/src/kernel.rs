// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The command kernel: state, registry, handlers and the dispatch loop.
//!
//! ## Dispatch
//!
//! [`Kernel::dispatch`] runs one command to completion:
//!
//! 1. `before` middleware (placeholder resolution first).
//! 2. Scope-chain resolution against the current focus path. A miss logs exactly one warning
//!    naming the command and the searched chain, and leaves state untouched.
//! 3. The handler transforms the state and returns effects and follow-ups.
//! 4. `after` middleware (effect records, then history).
//! 5. Follow-up commands run the same way, in order, up to
//!    [`KernelConfig::max_follow_ups`].
//! 6. `data` is saved when it changed and persistence is attached; subscribers are notified.
//!
//! Handler panics are not caught.

use std::borrow::Cow;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use kurbo::Rect;
use tracing::{debug, trace, warn};
use understory_focus::recovery::recover;
use understory_selection::follow_focus;
use understory_zone::{
    CallbackCx, Hook, ItemId, ItemMeta, ZoneDescriptor, ZoneId, ZoneRegistry, bind,
};

use crate::builtin;
use crate::clock::{Clock, SystemClock};
use crate::command::{Command, Payload};
use crate::config::KernelConfig;
use crate::effect::{Effect, EffectRecord, Projector, project_all};
use crate::middleware::{
    AfterCx, EffectApplier, HistoryRecorder, Middleware, PlaceholderResolver, Snapshot,
};
use crate::persist::Persistence;
use crate::scope::{
    CommandDef, Context, HandlerTable, Reaction, Scope, describe_chain, scope_chain,
};
use crate::state::State;

/// How a dispatch ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DispatchStatus {
    /// A handler ran.
    Handled,
    /// No handler on the scope chain; state is unchanged.
    Unresolved,
    /// Another dispatch was in flight; the command was discarded.
    Dropped,
}

/// Handle returned by [`Kernel::subscribe`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Listener<D> = Box<dyn FnMut(&State<D>)>;

/// Single-threaded interaction kernel over application data `D`.
pub struct Kernel<D> {
    registry: ZoneRegistry<Command>,
    handlers: HandlerTable<D>,
    state: State<D>,
    middleware: Vec<Box<dyn Middleware<D>>>,
    records: Vec<EffectRecord>,
    config: KernelConfig,
    clock: Box<dyn Clock>,
    persistence: Option<Box<dyn Persistence<D>>>,
    listeners: Vec<(SubscriptionId, Listener<D>)>,
    next_subscription: u64,
}

impl<D> fmt::Debug for Kernel<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Kernel")
            .field("registry", &self.registry)
            .field("handlers", &self.handlers)
            .field("os", &self.state.os)
            .field("undo_depth", &self.state.history.undo_depth())
            .field("redo_depth", &self.state.history.redo_depth())
            .field("middleware", &self.middleware.len())
            .field("pending_effects", &self.records)
            .field("config", &self.config)
            .field("persistence", &self.persistence.is_some())
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl<D: Clone + PartialEq + 'static> Kernel<D> {
    /// Kernel over `data` with the built-in commands, the system clock and no persistence.
    pub fn new(data: D) -> Self {
        let mut handlers = HandlerTable::new();
        builtin::install(&mut handlers);
        let mut middleware: Vec<Box<dyn Middleware<D>>> = Vec::with_capacity(3);
        middleware.push(Box::new(PlaceholderResolver));
        middleware.push(Box::new(EffectApplier));
        middleware.push(Box::new(HistoryRecorder));
        Self {
            registry: ZoneRegistry::new(),
            handlers,
            state: State::new(data),
            middleware,
            records: Vec::new(),
            config: KernelConfig::default(),
            clock: Box::new(SystemClock),
            persistence: None,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: KernelConfig) -> Self {
        self.state.history.set_cap(config.history.cap);
        self.state.os.typeahead.reset_ms = config.typeahead_reset_ms;
        self.config = config;
        self
    }

    /// Replace the clock.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Attach a persistence adapter and load `data` from it.
    ///
    /// Loading uses [`KernelConfig::persist_key`], so configure the kernel first. Without a key
    /// the adapter is kept but never used. Load failures are logged and the initial data kept.
    pub fn with_persistence(mut self, mut store: impl Persistence<D> + 'static) -> Self {
        if let Some(key) = self.config.persist_key.as_deref() {
            match store.load(key) {
                Ok(Some(data)) => self.state.data = data,
                Ok(None) => {}
                Err(error) => warn!(key, %error, "failed to load persisted state"),
            }
        }
        self.persistence = Some(Box::new(store));
        self
    }

    /// Append a middleware after the built-in ones.
    pub fn with_middleware(mut self, middleware: impl Middleware<D> + 'static) -> Self {
        self.add_middleware(middleware);
        self
    }

    /// Append a middleware after those already installed.
    pub fn add_middleware(&mut self, middleware: impl Middleware<D> + 'static) {
        self.middleware.push(Box::new(middleware));
    }

    /// Register a command, returning the definition it replaced in the same scope.
    pub fn register_command(&mut self, def: CommandDef<D>) -> Option<CommandDef<D>> {
        self.handlers.register(def)
    }

    /// Register a handler for `id` in `scope`.
    pub fn on(
        &mut self,
        scope: Scope,
        id: impl Into<Cow<'static, str>>,
        run: impl Fn(&Context<'_>, &mut State<D>, &Payload) -> Reaction + 'static,
    ) {
        self.handlers.register(CommandDef::new(id, run).in_scope(scope));
    }

    /// Remove the handler for `id` in `scope`.
    pub fn unregister_command(&mut self, scope: &Scope, id: &str) -> Option<CommandDef<D>> {
        self.handlers.unregister(scope, id)
    }

    /// Handler `kind` would resolve to from the current focus path.
    pub fn resolve(&self, kind: &str) -> Option<&CommandDef<D>> {
        self.handlers
            .resolve(&scope_chain(&self.state.os.focus_path), kind)
    }

    /// Run `command` and its follow-ups to completion.
    pub fn dispatch(&mut self, command: Command) -> DispatchStatus {
        let baseline = self
            .persistence
            .is_some()
            .then(|| self.state.data.clone());

        let (status, follow_ups) = self.execute(command);
        let mut queue = VecDeque::from(follow_ups);
        let mut budget = self.config.max_follow_ups;
        while let Some(next) = queue.pop_front() {
            if budget == 0 {
                warn!(
                    dropped = queue.len() + 1,
                    limit = self.config.max_follow_ups,
                    "follow-up budget exhausted"
                );
                break;
            }
            budget -= 1;
            let (_, more) = self.execute(next);
            queue.extend(more);
        }

        if baseline.is_some_and(|before| before != self.state.data) {
            self.persist();
        }
        if status == DispatchStatus::Handled {
            self.notify();
        }
        status
    }

    /// Focus `item` in `zone`, or the zone's entry item when `item` is `None`.
    pub fn goto(&mut self, zone: impl Into<ZoneId>, item: Option<ItemId>) -> DispatchStatus {
        let command = Command::focus_zone(zone);
        self.dispatch(match item {
            Some(item) => command.with_target(item),
            None => command,
        })
    }

    fn execute(&mut self, mut command: Command) -> (DispatchStatus, Vec<Command>) {
        for middleware in &mut self.middleware {
            middleware.before(&self.state, &mut command);
        }

        let chain = scope_chain(&self.state.os.focus_path);
        let Some(def) = self.handlers.resolve(&chain, &command.kind) else {
            warn!(
                command = %command.kind,
                scope_chain = %describe_chain(&chain),
                "unresolved command"
            );
            return (DispatchStatus::Unresolved, Vec::new());
        };
        trace!(command = %command.kind, scope = %def.scope, "resolved command");
        let run = Rc::clone(&def.run);
        let log_to_history = def.log_to_history;

        let now_ms = self.clock.now_ms();
        let before = Snapshot {
            data: self.state.data.clone(),
            focus: self.state.os.focus(),
        };
        let cx = Context {
            registry: &self.registry,
            config: &self.config,
            now_ms,
            command: &command.kind,
        };
        let Reaction {
            mut effects,
            follow_ups,
        } = run(&cx, &mut self.state, &command.payload);

        let mut after = AfterCx {
            command: &command,
            log_to_history,
            now_ms,
            before: &before,
            state: &mut self.state,
            effects: &mut effects,
            records: &mut self.records,
            config: &self.config,
        };
        for middleware in &mut self.middleware {
            middleware.after(&mut after);
        }
        (DispatchStatus::Handled, follow_ups)
    }

    fn persist(&mut self) {
        let (Some(store), Some(key)) = (
            self.persistence.as_mut(),
            self.config.persist_key.as_deref(),
        ) else {
            return;
        };
        if let Err(error) = store.save(key, &self.state.data) {
            warn!(key, %error, "failed to persist state");
        }
    }

    fn notify(&mut self) {
        for (_, listener) in &mut self.listeners {
            listener(&self.state);
        }
    }

    /// Call `listener` with the new state after every handled dispatch.
    pub fn subscribe(&mut self, listener: impl FnMut(&State<D>) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` when `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    /// Effect records waiting for the projector.
    pub fn pending_effects(&self) -> &[EffectRecord] {
        &self.records
    }

    /// Hand every pending record to `projector` and return them with their outcome.
    pub fn flush_effects(&mut self, projector: &mut impl Projector) -> Vec<EffectRecord> {
        project_all(core::mem::take(&mut self.records), projector)
    }

    /// Register or replace a zone.
    ///
    /// Re-registration may change the item order; focus and selection are repaired the same
    /// way as for [`Kernel::set_items`]. Returns `true` when the zone is new.
    pub fn register_zone(
        &mut self,
        id: impl Into<ZoneId>,
        descriptor: ZoneDescriptor<Command>,
    ) -> bool {
        let id = id.into();
        let previous = self.registry.items(&id).to_vec();
        let created = self.registry.register(id.clone(), descriptor);
        if let Some(active) = self.state.os.active_zone.clone() {
            self.state.os.activate(&self.registry, &active);
        }
        if !self.reconcile(&id, &previous).is_empty() {
            self.notify();
        }
        created
    }

    /// Remove a zone and its state.
    ///
    /// When the zone was on the focus path, the nearest remaining ancestor becomes active (with
    /// its own focused item); with no ancestor left, nothing is active and a blur is queued.
    /// This holds when the removed zone is an ancestor of the active one: focus leaves the
    /// still-registered descendant.
    pub fn unregister_zone(&mut self, id: &ZoneId) -> Option<ZoneDescriptor<Command>> {
        let removed = self.registry.unregister(id)?;
        self.state.os.zones.remove(id);
        if let Some(pos) = self.state.os.focus_path.iter().position(|z| z == id) {
            let ancestor = self.state.os.focus_path[..pos]
                .iter()
                .rev()
                .find(|z| self.registry.contains(z))
                .cloned();
            match ancestor {
                Some(zone) => {
                    debug!(removed = %id, active = %zone, "active zone unregistered");
                    self.state.os.activate(&self.registry, &zone);
                    let item = self.state.os.zone(&zone).and_then(|s| s.focused.clone());
                    self.records
                        .push(EffectRecord::from(Effect::Focus { zone, item }));
                }
                None => {
                    debug!(removed = %id, "active zone unregistered with no ancestor");
                    self.state.os.deactivate();
                    self.records.push(EffectRecord::from(Effect::Blur));
                }
            }
            self.notify();
        }
        Some(removed)
    }

    /// Replace the item order of `zone`, returning the ids that left it.
    ///
    /// Selection, anchor and expansion drop removed ids. When the focused item left, the
    /// zone's recovery policy picks the replacement from the previous order.
    pub fn set_items<I, T>(&mut self, zone: impl Into<ZoneId>, items: I) -> Vec<ItemId>
    where
        I: IntoIterator<Item = T>,
        T: Into<ItemId>,
    {
        let zone = zone.into();
        let previous = self
            .registry
            .set_items(&zone, items.into_iter().map(Into::into).collect());
        let removed = self.reconcile(&zone, &previous);
        if !removed.is_empty() {
            self.notify();
        }
        removed
    }

    fn reconcile(&mut self, zone: &ZoneId, previous: &[ItemId]) -> Vec<ItemId> {
        let Some(descriptor) = self.registry.get(zone) else {
            return Vec::new();
        };
        let current = descriptor.items.as_slice();
        let removed: Vec<ItemId> = previous
            .iter()
            .filter(|item| !current.contains(item))
            .cloned()
            .collect();
        let Some(zone_state) = self.state.os.zones.get_mut(zone) else {
            return removed;
        };
        zone_state.retain_items(current);

        let Some(lost) = zone_state.focused.clone().filter(|f| !current.contains(f)) else {
            return removed;
        };
        let replacement = recover(previous, current, &lost, descriptor.config.navigate.recovery);
        debug!(%zone, %lost, ?replacement, "focused item removed");
        zone_state.focus(replacement.clone());
        if let Some(item) = &replacement
            && let Some(next) = follow_focus(&descriptor.config.select, item)
        {
            zone_state.selection = next.selected;
            zone_state.anchor = next.anchor;
        }
        if self.state.os.active_zone.as_ref() == Some(zone) {
            self.records.push(EffectRecord::from(Effect::Focus {
                zone: zone.clone(),
                item: replacement.clone(),
            }));
            if let Some(item) = replacement {
                self.records
                    .push(EffectRecord::from(Effect::ScrollIntoView { item }));
            }
        }
        removed
    }

    /// Attach metadata to an item. Returns `false` when the zone is unknown.
    pub fn set_item_meta(&mut self, zone: &ZoneId, item: impl Into<ItemId>, meta: ItemMeta) -> bool {
        self.registry.set_item_meta(zone, item.into(), meta)
    }

    /// Set the bounds of a zone. Returns `false` when the zone is unknown.
    pub fn set_zone_rect(&mut self, zone: &ZoneId, rect: Option<Rect>) -> bool {
        self.registry.set_zone_rect(zone, rect)
    }

    /// Bind a zone-level callback. Returns `false` when the zone is unknown.
    pub fn set_zone_callback(
        &mut self,
        zone: &ZoneId,
        hook: Hook,
        callback: impl Fn(&CallbackCx<'_>) -> Option<Command> + 'static,
    ) -> bool {
        self.registry.set_zone_callback(zone, hook, bind(callback))
    }

    /// Bind an item-level callback. Returns `false` when the zone is unknown.
    pub fn set_item_callback(
        &mut self,
        zone: &ZoneId,
        item: impl Into<ItemId>,
        hook: Hook,
        callback: impl Fn(&CallbackCx<'_>) -> Option<Command> + 'static,
    ) -> bool {
        self.registry
            .set_item_callback(zone, item.into(), hook, bind(callback))
    }

    /// Report whether a native text editor owns host focus.
    pub fn set_host_editing(&mut self, editing: bool) {
        self.state.os.host_editing = editing;
    }

    /// Report whether an IME composition is in progress.
    pub fn set_composing(&mut self, composing: bool) {
        self.state.os.composing = composing;
        if composing {
            self.state.os.typeahead.clear();
        }
    }

    /// Current state.
    pub fn state(&self) -> &State<D> {
        &self.state
    }

    /// Application data.
    pub fn data(&self) -> &D {
        &self.state.data
    }

    /// Zone registry.
    pub fn registry(&self) -> &ZoneRegistry<Command> {
        &self.registry
    }

    /// Configuration.
    pub fn config(&self) -> &KernelConfig {
        &self.config
    }
}
