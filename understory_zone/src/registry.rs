// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The zone registry.
//!
//! ## Overview
//!
//! [`ZoneRegistry`] maps zone ids to [`ZoneDescriptor`]s: the policy, ordered item list, optional
//! geometry, and bound callbacks of each zone. It also keeps an item→zone reverse index so
//! [`ZoneRegistry::find_item_owner`] is a hash lookup rather than a tree walk.
//!
//! ## Registration race
//!
//! Items may be pushed with [`ZoneRegistry::set_items`] before the zone that owns them registers
//! (for example when data arrives before the owning view mounts). The registry creates a
//! placeholder descriptor, and a later [`ZoneRegistry::register`] with an empty item list keeps
//! the already-known order.
//!
//! ## Callbacks
//!
//! Callbacks are push-model: a host binds a [`Callback`] for a [`Hook`] on a zone or on a single
//! item, and the command layer asks the registry for it when the hook fires. A callback returns an
//! optional command of the host's command type `C`; the registry never runs it on its own.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;
use kurbo::Rect;
use smallvec::SmallVec;

use crate::{ItemId, ZoneConfig, ZoneId};

/// Root→zone chain of zone ids.
pub type ZonePath = SmallVec<[ZoneId; 8]>;

/// A bound callback producing an optional follow-up command.
pub type Callback<C> = Rc<dyn Fn(&CallbackCx<'_>) -> Option<C>>;

/// Wrap a closure as a [`Callback`].
pub fn bind<C>(callback: impl Fn(&CallbackCx<'_>) -> Option<C> + 'static) -> Callback<C> {
    Rc::new(callback)
}

/// Named interaction points a zone or item can bind a [`Callback`] to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Hook {
    /// Item activated (Enter, double click).
    Action,
    /// Selection changed.
    Select,
    /// Checkbox-like toggle.
    Check,
    /// Item deletion requested.
    Delete,
    /// Zone dismissed with the `close` policy.
    Dismiss,
    /// Copy.
    Copy,
    /// Cut.
    Cut,
    /// Paste.
    Paste,
}

/// Arguments handed to a [`Callback`].
#[derive(Copy, Clone, Debug)]
pub struct CallbackCx<'a> {
    /// Zone the hook fired in.
    pub zone: &'a ZoneId,
    /// Target item, when there is one.
    pub item: Option<&'a ItemId>,
    /// Current selection of the zone.
    pub selection: &'a [ItemId],
}

/// A small hook→callback table.
pub struct Callbacks<C> {
    entries: SmallVec<[(Hook, Callback<C>); 4]>,
}

impl<C> Default for Callbacks<C> {
    fn default() -> Self {
        Self {
            entries: SmallVec::new(),
        }
    }
}

impl<C> fmt::Debug for Callbacks<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(hook, _)| hook))
            .finish()
    }
}

impl<C> Callbacks<C> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `callback` to `hook`, replacing any previous binding.
    pub fn set(&mut self, hook: Hook, callback: Callback<C>) {
        if let Some(slot) = self.entries.iter_mut().find(|(h, _)| *h == hook) {
            slot.1 = callback;
        } else {
            self.entries.push((hook, callback));
        }
    }

    /// Builder form of [`Callbacks::set`].
    pub fn with(
        mut self,
        hook: Hook,
        callback: impl Fn(&CallbackCx<'_>) -> Option<C> + 'static,
    ) -> Self {
        self.set(hook, bind(callback));
        self
    }

    /// Callback bound to `hook`, if any.
    pub fn get(&self, hook: Hook) -> Option<&Callback<C>> {
        self.entries.iter().find(|(h, _)| *h == hook).map(|(_, cb)| cb)
    }

    /// Whether no hook is bound.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Per-item metadata provided by the host.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ItemMeta {
    /// Text used for typeahead matching. Falls back to the item id when absent.
    pub label: Option<String>,
    /// Bounds in the coordinate space shared by every zone of the registry.
    pub rect: Option<Rect>,
    /// Disabled items are skipped by linear navigation.
    pub disabled: bool,
    /// Whether the item can be expanded (tree rows, disclosure widgets).
    pub expandable: bool,
}

/// Everything the registry knows about one zone.
pub struct ZoneDescriptor<C> {
    /// Parent zone, if nested.
    pub parent: Option<ZoneId>,
    /// Policy.
    pub config: ZoneConfig,
    /// Ordered item list.
    pub items: Vec<ItemId>,
    /// Optional per-item metadata.
    pub meta: HashMap<ItemId, ItemMeta>,
    /// Zone bounds, used for seamless spatial escape.
    pub rect: Option<Rect>,
    /// Zone-level callbacks.
    pub callbacks: Callbacks<C>,
    /// Item-level callbacks, consulted before zone-level ones.
    pub item_callbacks: HashMap<ItemId, Callbacks<C>>,
}

impl<C> fmt::Debug for ZoneDescriptor<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZoneDescriptor")
            .field("parent", &self.parent)
            .field("config", &self.config)
            .field("items", &self.items)
            .field("rect", &self.rect)
            .field("callbacks", &self.callbacks)
            .finish_non_exhaustive()
    }
}

impl<C> ZoneDescriptor<C> {
    /// Create a root descriptor with no items.
    pub fn new(config: ZoneConfig) -> Self {
        Self {
            parent: None,
            config,
            items: Vec::new(),
            meta: HashMap::new(),
            rect: None,
            callbacks: Callbacks::new(),
            item_callbacks: HashMap::new(),
        }
    }

    /// Nest this zone under `parent`.
    pub fn with_parent(mut self, parent: impl Into<ZoneId>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Set the item order.
    pub fn with_items<I, T>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ItemId>,
    {
        self.items = items.into_iter().map(Into::into).collect();
        self
    }

    /// Set the zone bounds.
    pub fn with_rect(mut self, rect: Rect) -> Self {
        self.rect = Some(rect);
        self
    }

    /// Attach metadata to one item.
    pub fn with_item_meta(mut self, item: impl Into<ItemId>, meta: ItemMeta) -> Self {
        self.meta.insert(item.into(), meta);
        self
    }

    /// Bind a zone-level callback.
    pub fn with_callback(
        mut self,
        hook: Hook,
        callback: impl Fn(&CallbackCx<'_>) -> Option<C> + 'static,
    ) -> Self {
        self.callbacks.set(hook, bind(callback));
        self
    }

    /// Index of `item` in the order.
    pub fn index_of(&self, item: &ItemId) -> Option<usize> {
        self.items.iter().position(|i| i == item)
    }

    /// Whether `item` is marked disabled.
    pub fn is_disabled(&self, item: &ItemId) -> bool {
        self.meta.get(item).is_some_and(|m| m.disabled)
    }

    /// Bounds of `item`, if known.
    pub fn item_rect(&self, item: &ItemId) -> Option<Rect> {
        self.meta.get(item).and_then(|m| m.rect)
    }

    /// Typeahead label of `item`: its metadata label, or its id.
    pub fn label<'a>(&'a self, item: &'a ItemId) -> &'a str {
        self.meta
            .get(item)
            .and_then(|m| m.label.as_deref())
            .unwrap_or_else(|| item.as_str())
    }
}

/// Table of zones with an item→zone reverse index.
pub struct ZoneRegistry<C> {
    zones: HashMap<ZoneId, ZoneDescriptor<C>>,
    // Registration order; drives tab order and deterministic iteration.
    order: Vec<ZoneId>,
    owners: HashMap<ItemId, ZoneId>,
}

impl<C> fmt::Debug for ZoneRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZoneRegistry")
            .field("zones", &self.order)
            .field("items", &self.owners.len())
            .finish()
    }
}

impl<C> Default for ZoneRegistry<C> {
    fn default() -> Self {
        Self {
            zones: HashMap::new(),
            order: Vec::new(),
            owners: HashMap::new(),
        }
    }
}

impl<C> ZoneRegistry<C> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a zone. Returns `true` when the zone was not known before.
    ///
    /// When `descriptor` carries no items but the zone already has some (pushed earlier through
    /// [`ZoneRegistry::set_items`]), the known order and item metadata are kept. Item callbacks
    /// carry over only for items still in the order.
    pub fn register(&mut self, id: ZoneId, mut descriptor: ZoneDescriptor<C>) -> bool {
        let created = match self.zones.remove(&id) {
            Some(previous) => {
                if descriptor.items.is_empty() && !previous.items.is_empty() {
                    descriptor.items = previous.items;
                    for (item, meta) in previous.meta {
                        descriptor.meta.entry(item).or_insert(meta);
                    }
                }
                for (item, callbacks) in previous.item_callbacks {
                    if descriptor.items.contains(&item) {
                        descriptor.item_callbacks.entry(item).or_insert(callbacks);
                    }
                }
                self.owners.retain(|_, owner| *owner != id);
                false
            }
            None => {
                self.order.push(id.clone());
                true
            }
        };
        for item in &descriptor.items {
            self.owners.insert(item.clone(), id.clone());
        }
        self.zones.insert(id, descriptor);
        created
    }

    /// Remove a zone and its reverse-index entries.
    ///
    /// Child zones stay registered; their path simply ends where the missing parent was.
    pub fn unregister(&mut self, id: &ZoneId) -> Option<ZoneDescriptor<C>> {
        let removed = self.zones.remove(id)?;
        self.order.retain(|z| z != id);
        self.owners.retain(|_, owner| owner != id);
        Some(removed)
    }

    /// Descriptor of `id`.
    pub fn get(&self, id: &ZoneId) -> Option<&ZoneDescriptor<C>> {
        self.zones.get(id)
    }

    /// Whether `id` is registered.
    pub fn contains(&self, id: &ZoneId) -> bool {
        self.zones.contains_key(id)
    }

    /// Number of registered zones.
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Whether no zone is registered.
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Zone ids in registration order.
    pub fn zone_ids(&self) -> impl Iterator<Item = &ZoneId> {
        self.order.iter()
    }

    /// Zone owning `item`.
    pub fn find_item_owner(&self, item: &ItemId) -> Option<&ZoneId> {
        self.owners.get(item)
    }

    /// Item order of `zone`; empty when unknown.
    pub fn items(&self, zone: &ZoneId) -> &[ItemId] {
        self.zones.get(zone).map_or(&[], |z| z.items.as_slice())
    }

    /// Replace the item order of `zone`, returning the previous order.
    ///
    /// Metadata and item callbacks of items that left the order are dropped. Creates a placeholder zone with a default config when `zone` is not registered yet.
    pub fn set_items(&mut self, zone: &ZoneId, items: Vec<ItemId>) -> Vec<ItemId> {
        if !self.zones.contains_key(zone) {
            self.register(zone.clone(), ZoneDescriptor::new(ZoneConfig::default()));
        }
        let Some(descriptor) = self.zones.get_mut(zone) else {
            return Vec::new();
        };
        let previous = core::mem::replace(&mut descriptor.items, items);
        for item in &previous {
            if self.owners.get(item) == Some(zone) {
                self.owners.remove(item);
            }
        }
        for item in &descriptor.items {
            self.owners.insert(item.clone(), zone.clone());
        }
        let ZoneDescriptor {
            items,
            meta,
            item_callbacks,
            ..
        } = descriptor;
        meta.retain(|item, _| items.contains(item));
        item_callbacks.retain(|item, _| items.contains(item));
        previous
    }

    /// Attach metadata to an item. Returns `false` when the zone is unknown.
    pub fn set_item_meta(&mut self, zone: &ZoneId, item: ItemId, meta: ItemMeta) -> bool {
        match self.zones.get_mut(zone) {
            Some(descriptor) => {
                descriptor.meta.insert(item, meta);
                true
            }
            None => false,
        }
    }

    /// Set the bounds of a zone. Returns `false` when the zone is unknown.
    pub fn set_zone_rect(&mut self, zone: &ZoneId, rect: Option<Rect>) -> bool {
        match self.zones.get_mut(zone) {
            Some(descriptor) => {
                descriptor.rect = rect;
                true
            }
            None => false,
        }
    }

    /// Bind a zone-level callback. Returns `false` when the zone is unknown.
    pub fn set_zone_callback(&mut self, zone: &ZoneId, hook: Hook, callback: Callback<C>) -> bool {
        match self.zones.get_mut(zone) {
            Some(descriptor) => {
                descriptor.callbacks.set(hook, callback);
                true
            }
            None => false,
        }
    }

    /// Bind an item-level callback. Returns `false` when the zone is unknown.
    ///
    /// Binding does not require the item to be in the order yet.
    pub fn set_item_callback(
        &mut self,
        zone: &ZoneId,
        item: ItemId,
        hook: Hook,
        callback: Callback<C>,
    ) -> bool {
        match self.zones.get_mut(zone) {
            Some(descriptor) => {
                descriptor
                    .item_callbacks
                    .entry(item)
                    .or_default()
                    .set(hook, callback);
                true
            }
            None => false,
        }
    }

    /// Callback for `hook`: the item's own binding first, then the zone's.
    pub fn callback(
        &self,
        zone: &ZoneId,
        item: Option<&ItemId>,
        hook: Hook,
    ) -> Option<&Callback<C>> {
        let descriptor = self.zones.get(zone)?;
        item.and_then(|i| descriptor.item_callbacks.get(i))
            .and_then(|cbs| cbs.get(hook))
            .or_else(|| descriptor.callbacks.get(hook))
    }

    /// Parent of `zone`.
    pub fn parent_of(&self, zone: &ZoneId) -> Option<&ZoneId> {
        self.zones.get(zone)?.parent.as_ref()
    }

    /// Registered children of `zone`, in registration order.
    pub fn children_of(&self, zone: &ZoneId) -> Vec<ZoneId> {
        self.order
            .iter()
            .filter(|z| self.parent_of(z) == Some(zone))
            .cloned()
            .collect()
    }

    /// Registered zones sharing `zone`'s parent, excluding `zone`.
    pub fn siblings_of(&self, zone: &ZoneId) -> Vec<ZoneId> {
        let parent = self.effective_parent(zone);
        self.order
            .iter()
            .filter(|z| *z != zone && self.effective_parent(z) == parent)
            .cloned()
            .collect()
    }

    /// Root→`zone` path through registered parents.
    ///
    /// The walk stops at the first parent that is not registered, and at a repeated zone so a
    /// malformed parent cycle cannot loop. Unknown zones yield an empty path.
    pub fn path_to(&self, zone: &ZoneId) -> ZonePath {
        let mut out = ZonePath::new();
        if !self.contains(zone) {
            return out;
        }
        let mut cur = zone.clone();
        loop {
            if out.contains(&cur) {
                break;
            }
            out.push(cur.clone());
            match self.parent_of(&cur) {
                Some(p) if self.contains(p) => cur = p.clone(),
                _ => break,
            }
        }
        out.reverse();
        out
    }

    /// Zones in depth-first order: each root in registration order, children after parents.
    pub fn tab_order(&self) -> Vec<ZoneId> {
        let mut out = Vec::with_capacity(self.order.len());
        for root in self.order.iter().filter(|z| self.effective_parent(z).is_none()) {
            self.push_subtree(root, &mut out);
        }
        out
    }

    fn push_subtree(&self, zone: &ZoneId, out: &mut Vec<ZoneId>) {
        if out.contains(zone) {
            return;
        }
        out.push(zone.clone());
        for child in self.children_of(zone) {
            self.push_subtree(&child, out);
        }
    }

    // Parent if it is registered; dangling parents make a zone a root.
    fn effective_parent(&self, zone: &ZoneId) -> Option<&ZoneId> {
        self.parent_of(zone).filter(|p| self.contains(p))
    }
}
