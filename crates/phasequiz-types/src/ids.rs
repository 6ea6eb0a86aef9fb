//! Type-safe identifier wrappers around [`Uuid`].
//!
//! Every persisted record has a strongly-typed ID so a session ID can never
//! be passed where a question ID is expected. All IDs use UUID v7
//! (time-ordered) for efficient database indexing.
//!
//! IDs are generated app-side and bound on insert, so both the in-memory
//! and the `PostgreSQL` stores share the same identity scheme.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a team's game session.
    SessionId
}

define_id! {
    /// Unique identifier for a recorded phase result.
    PhaseResultId
}

define_id! {
    /// Unique identifier for a per-phase token configuration record.
    TokenConfigId
}

define_id! {
    /// Unique identifier for a per-phase configuration record.
    PhaseConfigId
}

define_id! {
    /// Unique identifier for a question in the question bank.
    QuestionId
}

define_id! {
    /// Unique identifier for an administrator record.
    AdminUserId
}
