//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Auth
//!
//! - `AuthService` - Session lookup, auth events and account commands
//!
//! ## Data store
//!
//! - `SubscriptionReader` - Plans and user subscriptions
//! - `CatalogReader` - Movies and show listings

mod auth_service;
mod catalog_reader;
mod subscription_reader;

pub use auth_service::AuthService;
pub use catalog_reader::CatalogReader;
pub use subscription_reader::SubscriptionReader;
