//! Authentication adapters.
//!
//! Implementations of the `AuthService` port that don't require external
//! services. The hosted implementation lives in `baas`.

mod in_memory;

pub use in_memory::InMemoryAuthService;
