mod analytics;
mod auth;
mod events;
mod matches;
mod profile;

pub use analytics::AnalyticsCommands;
pub use auth::{AuthCommands, AuthLoginArgs, AuthLogoutArgs};
pub use events::EventCommands;
pub use matches::MatchCommands;
pub use profile::ProfileCommands;
