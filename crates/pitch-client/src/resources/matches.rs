//! Football match endpoints

use pitch_core::entities::{FootballMatch, FootballMatchUpdate, NewFootballMatch};
use reqwest::Method;

use super::MATCHES_PATH;
use crate::{ApiClient, ClientError};

impl ApiClient {
    /// List all matches, most recent first as returned by the backend.
    pub async fn list_matches(&self) -> Result<Vec<FootballMatch>, ClientError> {
        self.get_json(MATCHES_PATH).await
    }

    pub async fn get_match(&self, id: i64) -> Result<FootballMatch, ClientError> {
        self.get_json(&format!("{MATCHES_PATH}/{id}")).await
    }

    pub async fn create_match(&self, new: &NewFootballMatch) -> Result<FootballMatch, ClientError> {
        self.send_json(Method::POST, MATCHES_PATH, new).await
    }

    pub async fn update_match(
        &self,
        id: i64,
        update: &FootballMatchUpdate,
    ) -> Result<FootballMatch, ClientError> {
        self.send_json(Method::PUT, &format!("{MATCHES_PATH}/{id}"), update)
            .await
    }

    pub async fn delete_match(&self, id: i64) -> Result<(), ClientError> {
        self.send_unit::<()>(Method::DELETE, &format!("{MATCHES_PATH}/{id}"), None)
            .await
    }
}
