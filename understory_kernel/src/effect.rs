// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Effects: imperative host actions described as data.
//!
//! Handlers return [`Effect`]s next to their state change. After each command the kernel turns
//! them into [`EffectRecord`]s and queues them; the host drains the queue with
//! [`Kernel::flush_effects`](crate::Kernel::flush_effects), handing each record to a
//! [`Projector`] that performs the action (move DOM focus, scroll, touch the system clipboard).
//! Records are transient: they are never persisted and never recorded in history.

use serde::{Deserialize, Serialize};
use understory_zone::{ItemId, ZoneId};

/// Handler-level effect intent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Move host focus to an item, or to the zone itself when `item` is `None`.
    Focus {
        /// Zone that becomes active.
        zone: ZoneId,
        /// Item to focus.
        item: Option<ItemId>,
    },
    /// Scroll an item into view.
    ScrollIntoView {
        /// Item to reveal.
        item: ItemId,
    },
    /// Drop host focus.
    Blur,
    /// Write text to the system clipboard.
    ClipboardWrite(String),
    /// Read the system clipboard.
    ClipboardRead,
}

/// Kind of host action.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectAction {
    /// Focus.
    Focus,
    /// Scroll into view.
    Scroll,
    /// Blur.
    Blur,
    /// Clipboard write.
    ClipboardWrite,
    /// Clipboard read.
    ClipboardRead,
}

/// Projector-level record of an effect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectRecord {
    /// What to do.
    pub action: EffectAction,
    /// Item the action targets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<ItemId>,
    /// Zone the action targets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<ZoneId>,
    /// Extra data, such as clipboard text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    /// Set once the projector performed the action.
    pub executed: bool,
    /// Why the projector did not perform the action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl EffectRecord {
    fn new(action: EffectAction) -> Self {
        Self {
            action,
            target: None,
            zone: None,
            payload: None,
            executed: false,
            reason: None,
        }
    }
}

impl From<Effect> for EffectRecord {
    fn from(effect: Effect) -> Self {
        match effect {
            Effect::Focus { zone, item } => Self {
                zone: Some(zone),
                target: item,
                ..Self::new(EffectAction::Focus)
            },
            Effect::ScrollIntoView { item } => Self {
                target: Some(item),
                ..Self::new(EffectAction::Scroll)
            },
            Effect::Blur => Self::new(EffectAction::Blur),
            Effect::ClipboardWrite(text) => Self {
                payload: Some(text),
                ..Self::new(EffectAction::ClipboardWrite)
            },
            Effect::ClipboardRead => Self::new(EffectAction::ClipboardRead),
        }
    }
}

/// Host-side effect runner.
pub trait Projector {
    /// Perform `record`. An `Err` carries the reason the action was skipped.
    fn project(&mut self, record: &EffectRecord) -> Result<(), String>;
}

impl<F> Projector for F
where
    F: FnMut(&EffectRecord) -> Result<(), String>,
{
    fn project(&mut self, record: &EffectRecord) -> Result<(), String> {
        self(record)
    }
}

/// Run every record through `projector`, marking each `executed` or stamping its `reason`.
pub(crate) fn project_all(
    records: impl IntoIterator<Item = EffectRecord>,
    projector: &mut impl Projector,
) -> Vec<EffectRecord> {
    records
        .into_iter()
        .map(|mut record| {
            match projector.project(&record) {
                Ok(()) => record.executed = true,
                Err(reason) => {
                    tracing::debug!(action = ?record.action, %reason, "projector skipped effect");
                    record.reason = Some(reason);
                }
            }
            record
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_effect_carries_zone_and_item() {
        let record = EffectRecord::from(Effect::Focus {
            zone: ZoneId::from("list"),
            item: Some(ItemId::from("a")),
        });
        assert_eq!(record.action, EffectAction::Focus);
        assert_eq!(record.zone, Some(ZoneId::from("list")));
        assert_eq!(record.target, Some(ItemId::from("a")));
        assert!(!record.executed);
    }

    #[test]
    fn projection_marks_outcomes() {
        let records = [
            EffectRecord::from(Effect::Blur),
            EffectRecord::from(Effect::ClipboardWrite("hi".into())),
        ];
        let out = project_all(records, &mut |r: &EffectRecord| match r.action {
            EffectAction::Blur => Ok(()),
            _ => Err(String::from("no clipboard")),
        });
        assert!(out[0].executed);
        assert!(!out[1].executed);
        assert_eq!(out[1].reason.as_deref(), Some("no clipboard"));
    }

    #[test]
    fn records_serialize_compactly() {
        let json = serde_json::to_string(&EffectRecord::from(Effect::ScrollIntoView {
            item: ItemId::from("b"),
        }))
        .unwrap();
        assert_eq!(json, r#"{"action":"scroll","target":"b","executed":false}"#);
    }
}
