//! Strongly-typed identifier value objects.
//!
//! Every record in the external store is keyed by an opaque string (a UUID
//! for the relational backend, a document id for the document backend), so
//! identifiers wrap a non-empty `String` rather than a parsed `Uuid`.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning error if empty.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(ValidationError::empty_field($field));
                }
                Ok(Self(id))
            }

            /// Returns the inner string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

string_id!(
    /// User identifier issued by the auth service.
    UserId,
    "user_id"
);

string_id!(
    /// Identifier of a subscription plan.
    PlanId,
    "plan_id"
);

string_id!(
    /// Identifier of a user's subscription row.
    SubscriptionId,
    "subscription_id"
);

string_id!(
    /// Identifier of a movie (a watchable content item).
    MovieId,
    "movie_id"
);

string_id!(
    /// Identifier of a scheduled show.
    ShowId,
    "show_id"
);

string_id!(
    /// Identifier of a theater.
    TheaterId,
    "theater_id"
);

string_id!(ScreenId, "screen_id");
