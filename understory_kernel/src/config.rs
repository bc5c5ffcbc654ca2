// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Kernel configuration.
//!
//! Every struct implements `Default` and deserializes with `#[serde(default)]`, so a host can
//! load a partial configuration from any serde format.

use serde::{Deserialize, Serialize};

use crate::command::os;
use crate::history::DEFAULT_CAP;

/// History recording policy.
///
/// Coalescing only applies to the kinds listed in `coalesce`, which is empty by default; every
/// other recorded command gets its own undo entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Bound on the past and future stacks.
    pub cap: usize,
    /// Window within which same-field commands of one kind merge, in milliseconds.
    pub coalesce_window_ms: u64,
    /// Command kinds never recorded.
    pub skip: Vec<String>,
    /// Command kinds that coalesce instead of recording one entry each.
    pub coalesce: Vec<String>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            cap: DEFAULT_CAP,
            coalesce_window_ms: 500,
            skip: vec![os::UNDO.to_owned(), os::REDO.to_owned()],
            coalesce: Vec::new(),
        }
    }
}

impl HistoryConfig {
    /// Whether `kind` is on the skip list.
    pub fn skips(&self, kind: &str) -> bool {
        self.skip.iter().any(|k| k == kind)
    }

    /// Coalescing window for `kind`, if it coalesces.
    pub fn coalesce_window(&self, kind: &str) -> Option<u64> {
        self.coalesce
            .iter()
            .any(|k| k == kind)
            .then_some(self.coalesce_window_ms)
    }
}

/// Top-level kernel configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// History policy.
    pub history: HistoryConfig,
    /// Typeahead buffer reset, in milliseconds.
    pub typeahead_reset_ms: u64,
    /// Follow-up commands one top-level dispatch may run.
    pub max_follow_ups: usize,
    /// Key under which `data` is loaded and saved, when persistence is attached.
    pub persist_key: Option<String>,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            history: HistoryConfig::default(),
            typeahead_reset_ms: understory_event_state::typeahead::DEFAULT_RESET_MS,
            max_follow_ups: 16,
            persist_key: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undo_and_redo_are_skipped_by_default() {
        let config = HistoryConfig::default();
        assert!(config.skips(os::UNDO));
        assert!(config.skips(os::REDO));
        assert!(!config.skips(os::NAVIGATE));
        assert_eq!(config.coalesce_window("SYNC"), None);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: KernelConfig =
            serde_json::from_str(r#"{"history":{"coalesce":["SYNC"]},"persist_key":"app"}"#)
                .unwrap();
        assert_eq!(config.history.cap, 50);
        assert_eq!(config.history.coalesce_window("SYNC"), Some(500));
        assert_eq!(config.max_follow_ups, 16);
        assert_eq!(config.persist_key.as_deref(), Some("app"));
    }
}
