//! Hosted backend adapter.
//!
//! One [`BaasClient`] is shared by the auth service and the data store so
//! table reads carry the signed-in user's token.
//!
//! ```ignore
//! let client = Arc::new(BaasClient::new(BaasEndpoint::from(&config.baas))?);
//! let auth = BaasAuthService::new(client.clone(), config.session.event_buffer);
//! let store = BaasDataStore::new(client);
//! ```

mod auth;
mod client;
mod store;

pub use auth::BaasAuthService;
pub use client::{BaasClient, BaasEndpoint, PostgrestQuery};
pub use store::BaasDataStore;
