//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - In-memory auth service with fault injection
//! - `subscription` - In-memory plan and subscription store
//! - `catalog` - In-memory movie and show store
//! - `baas` - Hosted backend over REST (PostgREST tables, GoTrue auth)

pub mod auth;
pub mod baas;
pub mod catalog;
pub mod subscription;

pub use auth::InMemoryAuthService;
pub use baas::{BaasAuthService, BaasClient, BaasDataStore, BaasEndpoint};
pub use catalog::InMemoryCatalogStore;
pub use subscription::InMemorySubscriptionStore;
