// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use understory_zone::ZoneDescriptor;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Step {
    Forward,
    Backward,
}

/// Next enabled index from `current` in `step` order, or `None` at a non-wrapping boundary.
///
/// With no current index, forward starts at the first enabled item and backward at the last.
pub(crate) fn step_linear<C>(
    descriptor: &ZoneDescriptor<C>,
    current: Option<usize>,
    step: Step,
    wrap: bool,
) -> Option<usize> {
    let len = descriptor.items.len();
    let Some(start) = current else {
        return match step {
            Step::Forward => first_enabled(descriptor),
            Step::Backward => last_enabled(descriptor),
        };
    };

    let mut idx = start;
    for _ in 0..len {
        idx = match step {
            Step::Forward if idx + 1 < len => idx + 1,
            Step::Forward if wrap => 0,
            Step::Backward if idx > 0 => idx - 1,
            Step::Backward if wrap => len - 1,
            _ => return None,
        };
        if idx == start {
            return None;
        }
        if !descriptor.is_disabled(&descriptor.items[idx]) {
            return Some(idx);
        }
    }
    None
}

pub(crate) fn first_enabled<C>(descriptor: &ZoneDescriptor<C>) -> Option<usize> {
    descriptor
        .items
        .iter()
        .position(|item| !descriptor.is_disabled(item))
}

pub(crate) fn last_enabled<C>(descriptor: &ZoneDescriptor<C>) -> Option<usize> {
    descriptor
        .items
        .iter()
        .rposition(|item| !descriptor.is_disabled(item))
}

#[cfg(test)]
mod tests {
    use super::*;
    use understory_zone::{ItemMeta, ZoneConfig};

    fn list(disabled: &[&str]) -> ZoneDescriptor<()> {
        let mut descriptor = ZoneDescriptor::new(ZoneConfig::default()).with_items(["a", "b", "c"]);
        for item in disabled {
            descriptor = descriptor.with_item_meta(
                *item,
                ItemMeta {
                    disabled: true,
                    ..ItemMeta::default()
                },
            );
        }
        descriptor
    }

    #[test]
    fn stops_at_edges_without_wrap() {
        let d = list(&[]);
        assert_eq!(step_linear(&d, Some(2), Step::Forward, false), None);
        assert_eq!(step_linear(&d, Some(0), Step::Backward, false), None);
        assert_eq!(step_linear(&d, Some(0), Step::Forward, false), Some(1));
    }

    #[test]
    fn wraps_when_asked() {
        let d = list(&[]);
        assert_eq!(step_linear(&d, Some(2), Step::Forward, true), Some(0));
        assert_eq!(step_linear(&d, Some(0), Step::Backward, true), Some(2));
    }

    #[test]
    fn skips_disabled_items() {
        let d = list(&["b"]);
        assert_eq!(step_linear(&d, Some(0), Step::Forward, false), Some(2));
        assert_eq!(step_linear(&d, Some(2), Step::Backward, false), Some(0));
        assert_eq!(first_enabled(&list(&["a"])), Some(1));
        assert_eq!(last_enabled(&list(&["c"])), Some(1));
    }

    #[test]
    fn no_origin_starts_at_the_ends() {
        let d = list(&[]);
        assert_eq!(step_linear(&d, None, Step::Forward, false), Some(0));
        assert_eq!(step_linear(&d, None, Step::Backward, false), Some(2));
    }

    #[test]
    fn single_enabled_item_has_nowhere_to_go() {
        let d = list(&["a", "c"]);
        assert_eq!(step_linear(&d, Some(1), Step::Forward, true), None);
    }
}
