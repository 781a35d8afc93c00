//! Strongly-typed identifiers
//!
//! Every record in the engine is keyed by a generated identifier. Wrapping
//! them in newtypes keeps a participant id from being passed where a session
//! id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

macro_rules! generated_id {
    ($(#[$meta:meta])* $name:ident) => {
        string_id!($(#[$meta])* $name);

        impl $name {
            /// Generate a fresh random identifier
            pub fn generate() -> Self {
                Self(Uuid::new_v4().simple().to_string())
            }
        }
    };
}

generated_id!(
    /// Identifier of a voting session
    SessionId
);

generated_id!(
    /// Identifier of a registered participant
    ParticipantId
);

generated_id!(
    /// Identifier of an immutable vote record
    VoteId
);

string_id!(
    /// Identifier of a catalog option (round-one or round-two)
    ///
    /// Round-one option ids double as group ids for round two.
    OptionId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = SessionId::generate();
        let b = SessionId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 32);
    }

    #[test]
    fn test_ids_serialize_as_plain_strings() {
        let id = OptionId::new("pain-point-workload");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"pain-point-workload\"");

        let back: OptionId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
