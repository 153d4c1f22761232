//! Cinepass - session, entitlement and catalog core for a movie streaming
//! and show booking front-end.
//!
//! The crate is organised as ports and adapters:
//! - `domain` - plans, tiers, catalog records and pure view transforms
//! - `ports` - traits for the auth service and the data store
//! - `adapters` - in-memory fakes and the hosted REST backend
//! - `application` - the services the UI calls

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
