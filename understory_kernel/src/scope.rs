// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Command handlers and scope-chain resolution.
//!
//! Handlers are registered per [`Scope`]: a zone, or the global scope. Resolution walks an
//! explicit chain, the focus path reversed (deepest zone first) followed by
//! [`Scope::Global`], and returns the first handler registered for the command kind:
//!
//! ```text
//! focus path:   app → sidebar → tree
//! scope chain:  tree → sidebar → app → global
//! ```
//!
//! A handler registered only at an ancestor is therefore found while any descendant is active,
//! and a descendant can shadow an ancestor's handler for the same kind.

use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;

use hashbrown::HashMap;
use smallvec::SmallVec;
use understory_zone::{ZoneId, ZoneRegistry};

use crate::KernelConfig;
use crate::command::{Command, Payload};
use crate::effect::Effect;
use crate::state::State;

/// Where a handler is registered.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Found from anywhere.
    Global,
    /// Found while the zone is on the focus path.
    Zone(ZoneId),
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str("global"),
            Self::Zone(zone) => fmt::Display::fmt(zone, f),
        }
    }
}

/// Resolution order for a focus path.
pub type ScopeChain = SmallVec<[Scope; 8]>;

/// Scope chain for `focus_path` (root→active): deepest zone first, ending with the global scope.
pub fn scope_chain(focus_path: &[ZoneId]) -> ScopeChain {
    focus_path
        .iter()
        .rev()
        .cloned()
        .map(Scope::Zone)
        .chain(core::iter::once(Scope::Global))
        .collect()
}

/// Render a chain as `deepest > ... > global` for diagnostics.
pub fn describe_chain(chain: &[Scope]) -> String {
    let mut out = String::new();
    for (i, scope) in chain.iter().enumerate() {
        if i > 0 {
            out.push_str(" > ");
        }
        out.push_str(&scope.to_string());
    }
    out
}

/// Read-only environment a handler runs in.
#[derive(Debug)]
pub struct Context<'a> {
    /// Zone registry.
    pub registry: &'a ZoneRegistry<Command>,
    /// Kernel configuration.
    pub config: &'a KernelConfig,
    /// Dispatch time, in milliseconds.
    pub now_ms: u64,
    /// Kind of the command being handled.
    pub command: &'a str,
}

/// What a handler produced besides its state change.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Reaction {
    /// Host actions to queue.
    pub effects: Vec<Effect>,
    /// Commands to dispatch after this one completes.
    pub follow_ups: Vec<Command>,
}

impl Reaction {
    /// Nothing beyond the state change.
    pub fn none() -> Self {
        Self::default()
    }

    /// Queue an effect.
    pub fn effect(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    /// Queue a follow-up command.
    pub fn follow_up(&mut self, command: Command) {
        self.follow_ups.push(command);
    }

    /// Builder form of [`Reaction::effect`].
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effect(effect);
        self
    }

    /// Builder form of [`Reaction::follow_up`].
    pub fn with_follow_up(mut self, command: Command) -> Self {
        self.follow_up(command);
        self
    }
}

/// Command handler: transforms the state in place and reports effects and follow-ups.
pub type Handler<D> = Rc<dyn Fn(&Context<'_>, &mut State<D>, &Payload) -> Reaction>;

/// Wrap a closure as a [`Handler`].
pub fn handler<D>(
    run: impl Fn(&Context<'_>, &mut State<D>, &Payload) -> Reaction + 'static,
) -> Handler<D> {
    Rc::new(run)
}

/// A registered command.
pub struct CommandDef<D> {
    /// Command kind.
    pub id: Cow<'static, str>,
    /// Handler.
    pub run: Handler<D>,
    /// Owning scope.
    pub scope: Scope,
    /// `Some(false)` keeps the command out of history even when it changes `data`.
    pub log_to_history: Option<bool>,
}

impl<D> Clone for CommandDef<D> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            run: Rc::clone(&self.run),
            scope: self.scope.clone(),
            log_to_history: self.log_to_history,
        }
    }
}

impl<D> fmt::Debug for CommandDef<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDef")
            .field("id", &self.id)
            .field("scope", &self.scope)
            .field("log_to_history", &self.log_to_history)
            .finish_non_exhaustive()
    }
}

impl<D> CommandDef<D> {
    /// Global command.
    pub fn new(
        id: impl Into<Cow<'static, str>>,
        run: impl Fn(&Context<'_>, &mut State<D>, &Payload) -> Reaction + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            run: handler(run),
            scope: Scope::Global,
            log_to_history: None,
        }
    }

    /// Register in `scope` instead of globally.
    pub fn in_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Register in a zone's scope.
    pub fn in_zone(self, zone: impl Into<ZoneId>) -> Self {
        self.in_scope(Scope::Zone(zone.into()))
    }

    /// Keep this command out of history.
    pub fn silent(mut self) -> Self {
        self.log_to_history = Some(false);
        self
    }
}

/// Handlers keyed by scope, then by command kind.
pub struct HandlerTable<D> {
    scopes: HashMap<Scope, HashMap<Cow<'static, str>, CommandDef<D>>>,
}

impl<D> Default for HandlerTable<D> {
    fn default() -> Self {
        Self {
            scopes: HashMap::new(),
        }
    }
}

impl<D> fmt::Debug for HandlerTable<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let handlers: usize = self.scopes.values().map(HashMap::len).sum();
        f.debug_struct("HandlerTable")
            .field("scopes", &self.scopes.len())
            .field("handlers", &handlers)
            .finish()
    }
}

impl<D> HandlerTable<D> {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `def`, returning the definition it replaced in the same scope.
    pub fn register(&mut self, def: CommandDef<D>) -> Option<CommandDef<D>> {
        self.scopes
            .entry(def.scope.clone())
            .or_default()
            .insert(def.id.clone(), def)
    }

    /// Remove the handler for `id` in `scope`.
    pub fn unregister(&mut self, scope: &Scope, id: &str) -> Option<CommandDef<D>> {
        let table = self.scopes.get_mut(scope)?;
        let removed = table.remove(id);
        if table.is_empty() {
            self.scopes.remove(scope);
        }
        removed
    }

    /// Remove every handler owned by `scope`.
    pub fn clear_scope(&mut self, scope: &Scope) -> usize {
        self.scopes.remove(scope).map_or(0, |t| t.len())
    }

    /// Handler for `id` registered exactly in `scope`.
    pub fn get(&self, scope: &Scope, id: &str) -> Option<&CommandDef<D>> {
        self.scopes.get(scope)?.get(id)
    }

    /// First handler for `id` along `chain`.
    pub fn resolve<'a>(&'a self, chain: &[Scope], id: &str) -> Option<&'a CommandDef<D>> {
        chain.iter().find_map(|scope| self.get(scope, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(id: &str) -> ZoneId {
        ZoneId::from(id)
    }

    fn def(id: &'static str, scope: Scope) -> CommandDef<()> {
        CommandDef::new(id, |_, _, _| Reaction::none()).in_scope(scope)
    }

    #[test]
    fn chain_is_deepest_first_then_global() {
        let chain = scope_chain(&[zone("app"), zone("sidebar"), zone("tree")]);
        assert_eq!(
            chain.as_slice(),
            [
                Scope::Zone(zone("tree")),
                Scope::Zone(zone("sidebar")),
                Scope::Zone(zone("app")),
                Scope::Global,
            ]
        );
        assert_eq!(scope_chain(&[]).as_slice(), [Scope::Global]);
        assert_eq!(describe_chain(&chain), "tree > sidebar > app > global");
    }

    #[test]
    fn ancestor_handler_is_found_from_a_descendant() {
        let mut table = HandlerTable::new();
        table.register(def("SAVE", Scope::Zone(zone("app"))));
        let chain = scope_chain(&[zone("app"), zone("sidebar")]);
        let found = table.resolve(&chain, "SAVE").unwrap();
        assert_eq!(found.scope, Scope::Zone(zone("app")));
    }

    #[test]
    fn deeper_scope_shadows() {
        let mut table = HandlerTable::new();
        table.register(def("DELETE", Scope::Global));
        table.register(def("DELETE", Scope::Zone(zone("list"))));
        let chain = scope_chain(&[zone("app"), zone("list")]);
        assert_eq!(
            table.resolve(&chain, "DELETE").unwrap().scope,
            Scope::Zone(zone("list"))
        );
        let other = scope_chain(&[zone("app")]);
        assert_eq!(table.resolve(&other, "DELETE").unwrap().scope, Scope::Global);
    }

    #[test]
    fn unknown_kind_resolves_to_nothing() {
        let table: HandlerTable<()> = HandlerTable::new();
        assert!(table.resolve(&scope_chain(&[zone("a")]), "NOPE").is_none());
    }

    #[test]
    fn unregister_and_clear_scope() {
        let mut table = HandlerTable::new();
        table.register(def("A", Scope::Zone(zone("z"))));
        table.register(def("B", Scope::Zone(zone("z"))));
        assert!(table.register(def("A", Scope::Zone(zone("z")))).is_some());
        assert!(table.unregister(&Scope::Zone(zone("z")), "A").is_some());
        assert_eq!(table.clear_scope(&Scope::Zone(zone("z"))), 1);
        assert!(table.get(&Scope::Zone(zone("z")), "B").is_none());
    }
}
