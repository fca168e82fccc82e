//! Session-wide operations

use crate::{ApiClient, ClientError};

impl ApiClient {
    /// Sign out every device. Goes straight to `/auth/revoke-all-tokens` with
    /// the current bearer token (auth endpoints are never intercepted), then
    /// clears the local session even if the server call failed.
    pub async fn revoke_all_sessions(&self) -> Result<(), ClientError> {
        Ok(self.session().revoke_all().await?)
    }
}
