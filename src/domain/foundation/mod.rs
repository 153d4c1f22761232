//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers and error types that form the
//! vocabulary of the cinepass domain.

mod auth;
mod errors;
mod ids;
mod timestamp;

pub use auth::{AuthError, Credentials, Identity, SignInPolicy, SignUpProfile};
pub use errors::{StoreError, ValidationError};
pub use ids::{MovieId, PlanId, ScreenId, ShowId, SubscriptionId, TheaterId, UserId};
pub use timestamp::Timestamp;
