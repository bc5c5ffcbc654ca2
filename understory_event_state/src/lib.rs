// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Event State: small timestamped state machines for keyboard input.
//!
//! - [`typeahead`]: a prefix buffer with an inactivity reset, and case-insensitive matching of
//!   the buffered query against item labels.
//!
//! All timestamps are caller-supplied milliseconds; nothing here reads a clock.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod typeahead;

pub use typeahead::{Query, TypeaheadState};
