//! Session module - identity resolution state and auth events.

mod events;
mod state;

pub use events::{AuthEvent, ChangeCause, IdentityChange};
pub use state::IdentityStatus;
