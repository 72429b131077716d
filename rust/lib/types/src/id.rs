//! Identifier newtypes.
//!
//! Group, frame and user ids are all strings on the wire; wrapping them
//! keeps a frame id from being passed where a group id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }

            /// True for the empty id, which the service never issues.
            pub fn is_empty(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl Deref for $name {
            type Target = str;
            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

string_id!(
    /// Server-assigned group identifier.
    GroupId
);

string_id!(
    /// Frame identifier. For registered devices this is the serial number.
    FrameId
);

string_id!(
    /// Identity-provider user id, as reported by `GET /me`.
    UserId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_transparently() {
        let id = GroupId::new("g1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"g1\"");
        let back: GroupId = serde_json::from_str("\"g1\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn blank_ids_are_empty() {
        assert!(FrameId::new("").is_empty());
        assert!(FrameId::new("   ").is_empty());
        assert!(!FrameId::new("d1").is_empty());
    }

    #[test]
    fn compares_with_str() {
        assert_eq!(UserId::new("u1"), "u1");
        assert_eq!(&*UserId::new("u1"), "u1");
    }
}
