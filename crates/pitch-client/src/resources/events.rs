//! Calendar event endpoints

use pitch_core::entities::{CalendarEvent, CalendarEventUpdate, NewCalendarEvent};
use reqwest::Method;

use super::EVENTS_PATH;
use crate::{ApiClient, ClientError};

impl ApiClient {
    pub async fn list_events(&self) -> Result<Vec<CalendarEvent>, ClientError> {
        self.get_json(EVENTS_PATH).await
    }

    pub async fn get_event(&self, id: i64) -> Result<CalendarEvent, ClientError> {
        self.get_json(&format!("{EVENTS_PATH}/{id}")).await
    }

    pub async fn create_event(&self, new: &NewCalendarEvent) -> Result<CalendarEvent, ClientError> {
        self.send_json(Method::POST, EVENTS_PATH, new).await
    }

    pub async fn update_event(
        &self,
        id: i64,
        update: &CalendarEventUpdate,
    ) -> Result<CalendarEvent, ClientError> {
        self.send_json(Method::PUT, &format!("{EVENTS_PATH}/{id}"), update)
            .await
    }

    pub async fn delete_event(&self, id: i64) -> Result<(), ClientError> {
        self.send_unit::<()>(Method::DELETE, &format!("{EVENTS_PATH}/{id}"), None)
            .await
    }
}
