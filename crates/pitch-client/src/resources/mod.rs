//! Typed bindings for the dashboard resources. Every call goes through
//! [`ApiClient::execute`](crate::ApiClient::execute).

mod analytics;
mod events;
mod matches;
mod profile;
mod sessions;

pub const MATCHES_PATH: &str = "/footballmatch";
pub const EVENTS_PATH: &str = "/calendarevent";
pub const PROFILE_PATH: &str = "/profile";
