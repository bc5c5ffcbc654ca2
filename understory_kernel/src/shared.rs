// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared kernel handle with a re-entrancy guard.
//!
//! Callbacks and subscribers that need to dispatch hold a [`SharedKernel`]. A dispatch that
//! arrives while another one is running (from a subscriber, or from a handler that captured the
//! handle) is dropped, not queued. Within one dispatch exactly one command chain runs to
//! completion before the next dispatch is accepted.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::command::Command;
use crate::kernel::{DispatchStatus, Kernel, SubscriptionId};
use crate::state::State;

/// Reference-counted [`Kernel`] handle.
pub struct SharedKernel<D>(Rc<RefCell<Kernel<D>>>);

impl<D> Clone for SharedKernel<D> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<D> fmt::Debug for SharedKernel<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(kernel) => f.debug_tuple("SharedKernel").field(&*kernel).finish(),
            Err(_) => f.write_str("SharedKernel(<dispatching>)"),
        }
    }
}

impl<D: Clone + PartialEq + 'static> SharedKernel<D> {
    /// Share `kernel`.
    pub fn new(kernel: Kernel<D>) -> Self {
        Self(Rc::new(RefCell::new(kernel)))
    }

    /// Dispatch `command`, or drop it when a dispatch is already in flight.
    pub fn dispatch(&self, command: Command) -> DispatchStatus {
        match self.0.try_borrow_mut() {
            Ok(mut kernel) => kernel.dispatch(command),
            Err(_) => {
                debug!(command = %command.kind, "re-entrant dispatch dropped");
                DispatchStatus::Dropped
            }
        }
    }

    /// Whether a dispatch is running.
    pub fn is_dispatching(&self) -> bool {
        self.0.try_borrow_mut().is_err()
    }

    /// Read the kernel. Returns `None` while a dispatch is running.
    pub fn with<R>(&self, f: impl FnOnce(&Kernel<D>) -> R) -> Option<R> {
        self.0.try_borrow().ok().map(|kernel| f(&kernel))
    }

    /// Mutate the kernel outside dispatch (registry updates, host state). Returns `None` while
    /// a dispatch is running.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut Kernel<D>) -> R) -> Option<R> {
        self.0.try_borrow_mut().ok().map(|mut kernel| f(&mut kernel))
    }

    /// Subscribe to handled dispatches. Returns `None` while a dispatch is running.
    pub fn subscribe(&self, listener: impl FnMut(&State<D>) + 'static) -> Option<SubscriptionId> {
        self.with_mut(|kernel| kernel.subscribe(listener))
    }

    /// Remove a subscription. Returns `false` when it was unknown or a dispatch is running.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.with_mut(|kernel| kernel.unsubscribe(id)).unwrap_or(false)
    }
}
