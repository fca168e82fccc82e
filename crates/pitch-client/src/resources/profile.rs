//! Profile and two-factor management

use pitch_core::entities::{
    ChangePasswordRequest, Profile, ProfileUpdate, TwoFactorCode, TwoFactorSetup,
};
use reqwest::Method;

use super::PROFILE_PATH;
use crate::{ApiClient, ClientError};

impl ApiClient {
    pub async fn profile(&self) -> Result<Profile, ClientError> {
        self.get_json(PROFILE_PATH).await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Profile, ClientError> {
        self.send_json(Method::PUT, PROFILE_PATH, update).await
    }

    pub async fn change_password(&self, request: &ChangePasswordRequest) -> Result<(), ClientError> {
        self.send_unit(
            Method::POST,
            &format!("{PROFILE_PATH}/change-password"),
            Some(request),
        )
        .await
    }

    /// Start two-factor enrolment. The returned secret must be confirmed with
    /// [`Self::verify_two_factor`] before it takes effect.
    pub async fn enable_two_factor(&self) -> Result<TwoFactorSetup, ClientError> {
        self.send_json(
            Method::POST,
            &format!("{PROFILE_PATH}/2fa/enable"),
            &serde_json::json!({}),
        )
        .await
    }

    pub async fn verify_two_factor(&self, code: &TwoFactorCode) -> Result<(), ClientError> {
        self.send_unit(Method::POST, &format!("{PROFILE_PATH}/2fa/verify"), Some(code))
            .await
    }

    pub async fn disable_two_factor(&self, code: &TwoFactorCode) -> Result<(), ClientError> {
        self.send_unit(Method::POST, &format!("{PROFILE_PATH}/2fa/disable"), Some(code))
            .await
    }
}
