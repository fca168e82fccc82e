//! # pitch-client
//!
//! HTTP client for the Pitchside dashboard API.
//!
//! [`ApiClient`] attaches the session's bearer token to every request, refreshes
//! it ahead of expiry, and replays a request once after a 401. Typed methods for
//! matches, calendar events, analytics, and the user profile live in
//! [`resources`].

pub mod client;
pub mod error;
pub mod resources;

pub use client::ApiClient;
pub use error::ClientError;
