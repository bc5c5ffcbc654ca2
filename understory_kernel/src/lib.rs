// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Kernel: a headless command kernel for keyboard-first interfaces.
//!
//! Every user interaction is a [`Command`]. The [`Kernel`] owns one state tree ([`State`]):
//! application `data`, the OS slice ([`OsState`]: active zone, focus path, per-zone focus and
//! selection) and the undo [`History`]. Dispatch resolves a handler along the focus path
//! (deepest zone first, then [`Scope::Global`]), runs it, and passes the result through a
//! middleware pipeline that queues [`Effect`]s for the host and records undo entries.
//!
//! The built-in `OS_*` commands implement navigation, tab traversal, selection, activation,
//! escape, expansion, typeahead, clipboard routing and undo/redo on top of
//! [`understory_zone`], [`understory_focus`] and [`understory_selection`]. Apps register their
//! own commands globally or per zone, and shadow built-ins by registering the same id in a zone.
//!
//! The kernel never touches a real UI. Hosts translate input into commands ([`translate`]), dispatch
//! them, and apply [`EffectRecord`]s through a [`Projector`].
//!
//! ## Example
//!
//! ```rust
//! use understory_focus::Direction;
//! use understory_kernel::{Command, Kernel};
//! use understory_zone::{ItemId, ZoneConfig, ZoneDescriptor};
//!
//! let mut kernel = Kernel::new(());
//! kernel.register_zone(
//!     "sidebar",
//!     ZoneDescriptor::new(ZoneConfig::default()).with_items(["inbox", "drafts", "sent"]),
//! );
//!
//! kernel.dispatch(Command::focus("sidebar", "inbox"));
//! kernel.dispatch(Command::navigate(Direction::Down));
//! assert_eq!(kernel.state().os.focused_item(), Some(&ItemId::from("drafts")));
//!
//! // Focus and scroll requests wait for the host.
//! assert!(!kernel.pending_effects().is_empty());
//! ```
//!
//! ## Logging
//!
//! The kernel emits [`tracing`] events: `warn` for unresolved commands, exhausted follow-up
//! budgets and persistence failures; `debug` for ignored commands and focus recovery; `trace`
//! for every resolution. Install any subscriber to see them.

mod builtin;
mod clock;
mod command;
mod config;
mod effect;
mod history;
mod intent;
mod kernel;
mod middleware;
mod persist;
mod scope;
mod shared;
mod state;

pub use clock::{Clock, ManualClock, SystemClock};
pub use command::{Arg, Command, ExpandAction, FocusRef, Payload, keys, os};
pub use config::{HistoryConfig, KernelConfig};
pub use effect::{Effect, EffectAction, EffectRecord, Projector};
pub use history::{DEFAULT_CAP, History, HistoryEntry};
pub use intent::{ClipboardKind, Intent, Modifiers, clipboard_command, translate};
pub use kernel::{DispatchStatus, Kernel, SubscriptionId};
pub use middleware::{
    AfterCx, EffectApplier, HistoryRecorder, Middleware, PlaceholderResolver, Snapshot,
};
pub use persist::{MemoryStore, PersistError, Persistence};
pub use scope::{
    CommandDef, Context, Handler, HandlerTable, Reaction, Scope, ScopeChain, describe_chain,
    handler, scope_chain,
};
pub use shared::SharedKernel;
pub use state::{FocusTarget, OsState, State};
