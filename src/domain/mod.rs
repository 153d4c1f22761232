//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, identity, errors)
//! - `subscription` - Plans, the tier table and user subscription rows
//! - `session` - Identity resolution state and auth events
//! - `catalog` - Movies, shows and their display transforms

pub mod catalog;
pub mod foundation;
pub mod session;
pub mod subscription;
