// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use core::borrow::Borrow;
use core::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create an identifier from anything string-like.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// The identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Debug::fmt(&self.0, f)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.into())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Identifier of a zone (a focus scope).
    ZoneId
);

string_id!(
    /// Identifier of an item inside a zone.
    ///
    /// Item ids are expected to be unique across the registry; the reverse index used by
    /// [`ZoneRegistry::find_item_owner`](crate::ZoneRegistry::find_item_owner) keeps the most
    /// recent owner when they are not.
    ItemId
);

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    #[test]
    fn display_and_debug_show_the_raw_id() {
        let id = ItemId::from("row-1");
        assert_eq!(format!("{id}"), "row-1");
        assert_eq!(format!("{id:?}"), "\"row-1\"");
        assert_eq!(id.as_str(), "row-1");
    }

    #[test]
    fn borrow_allows_str_lookups() {
        let mut set = hashbrown::HashSet::new();
        set.insert(ZoneId::from("main"));
        assert!(set.contains("main"));
    }
}
