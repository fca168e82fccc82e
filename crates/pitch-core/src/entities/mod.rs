//! Resource entities served by the dashboard backend.
//!
//! Field names follow the backend's camelCase JSON. Write models (`New*`,
//! `*Update`) are separate from read models so partial updates never send
//! server-owned fields such as `id` or `createdAt`.

mod analytics;
mod calendar_event;
mod football_match;
mod profile;

pub use analytics::{AnalyticsSummary, MonthlyCount};
pub use calendar_event::{CalendarEvent, CalendarEventUpdate, NewCalendarEvent};
pub use football_match::{FootballMatch, FootballMatchUpdate, MatchStatus, NewFootballMatch};
pub use profile::{
    ChangePasswordRequest, Profile, ProfileUpdate, TwoFactorCode, TwoFactorSetup,
};
