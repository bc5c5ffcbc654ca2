// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Zone: focus scopes and the registry that owns them.
//!
//! A **zone** is a focus scope grouping an ordered set of **items** under one navigation and
//! selection policy. Zones nest: each zone may name a parent, and the chain of zones from the
//! root to the active zone is the **focus path** used for command scope resolution.
//!
//! This crate provides:
//! - [`ZoneId`] / [`ItemId`]: string identifiers for zones and items.
//! - [`ZoneConfig`]: immutable per-zone policy (navigation, tab, selection, activation, dismiss).
//! - [`ZoneState`]: the mutable focus/selection state of one zone, owned by whoever drives
//!   commands (for example `understory_kernel`).
//! - [`ZoneRegistry`]: the table of [`ZoneDescriptor`]s with an item→zone reverse index and
//!   push-model [`Hook`] callbacks.
//!
//! The registry never needs a rendering pass: it can be populated and queried headlessly.
//!
//! ```rust
//! use understory_zone::{ItemId, ZoneConfig, ZoneDescriptor, ZoneId, ZoneRegistry};
//!
//! let mut registry: ZoneRegistry<()> = ZoneRegistry::new();
//! registry.register(
//!     ZoneId::from("sidebar"),
//!     ZoneDescriptor::new(ZoneConfig::default()).with_items(["a", "b", "c"]),
//! );
//!
//! assert_eq!(registry.find_item_owner(&ItemId::from("b")), Some(&ZoneId::from("sidebar")));
//! assert_eq!(registry.path_to(&ZoneId::from("sidebar")).len(), 1);
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for `kurbo`.
//! - `libm`: enables `no_std` builds that rely on `libm` for floating-point math.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod id;
mod registry;
mod state;

pub use config::{
    Activation, DismissConfig, DismissPolicy, EntryPolicy, NavigateConfig, Orientation,
    RecoveryPolicy, SelectConfig, SelectionMode, TabBehavior, ZoneConfig,
};
pub use id::{ItemId, ZoneId};
pub use registry::{
    bind, Callback, CallbackCx, Callbacks, Hook, ItemMeta, ZoneDescriptor, ZonePath, ZoneRegistry,
};
pub use state::ZoneState;
