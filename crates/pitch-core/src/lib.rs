//! # pitch-core
//!
//! Core types shared by every Pitchside crate.
//!
//! - The uniform backend response envelope (`ApiEnvelope<T>`)
//! - The credential pair and the cached user snapshot
//! - Resource entities (football matches, calendar events, analytics, profile)
//! - Cross-cutting error types

pub mod credentials;
pub mod entities;
pub mod envelope;
pub mod errors;
pub mod user;

pub use credentials::CredentialPair;
pub use envelope::{ApiEnvelope, parse_envelope};
pub use errors::CoreError;
pub use user::{CachedUser, UserRole};
