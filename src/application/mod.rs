//! Application layer - services the UI calls.
//!
//! Each service orchestrates domain logic over the ports and owns no state,
//! except the session provider, which caches the current identity.

mod account;
mod catalog_service;
mod entitlement;
mod plan_catalog;
mod session_provider;

pub use account::AccountService;
pub use catalog_service::{CatalogError, CatalogService, MovieListing, MovieQuery};
pub use entitlement::{Entitlement, EntitlementResolver};
pub use plan_catalog::{PlanCatalog, PlanOffer};
pub use session_provider::{ListenerId, SessionProvider};
