use chrono::Utc;
use reqwest::Method;
use shared::protocol::{
    EmailDuplicateRequest, EmailDuplicateResponse, LoginRequest, LoginResponse, SignUpRequest,
    SignUpResponse, UpdateProfileRequest, UpdateProfileResponse, UserProfileResponse,
};
use tracing::info;

use super::{encode_body, ApiGateway};
use crate::{error::{GatewayError, SessionError}, session::Session, transport::ApiRequest};

impl ApiGateway {
    pub async fn signup(&self, request: &SignUpRequest) -> Result<SignUpResponse, GatewayError> {
        const OPERATION: &str = "signup";
        let body = encode_body(OPERATION, request)?;
        self.dispatch(
            OPERATION,
            ApiRequest::new(Method::POST, ["users", "signup"]).with_body(body),
        )
        .await
    }

    /// Signs in and stores the returned credential for later requests.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, GatewayError> {
        const OPERATION: &str = "login";
        let body = encode_body(OPERATION, request)?;
        let response: LoginResponse = self
            .dispatch(
                OPERATION,
                ApiRequest::new(Method::POST, ["users", "login"]).with_body(body),
            )
            .await?;
        self.session
            .save(Session::from_login(&response, Utc::now()))
            .map_err(|source| GatewayError::Session {
                operation: OPERATION,
                source,
            })?;
        info!(user_id = response.user.id.0, "gateway: session stored after login");
        Ok(response)
    }

    pub async fn check_email_duplicate(
        &self,
        request: &EmailDuplicateRequest,
    ) -> Result<EmailDuplicateResponse, GatewayError> {
        const OPERATION: &str = "check_email_duplicate";
        let body = encode_body(OPERATION, request)?;
        self.dispatch(
            OPERATION,
            ApiRequest::new(Method::POST, ["users", "email", "check"]).with_body(body),
        )
        .await
    }

    pub async fn get_profile(&self) -> Result<UserProfileResponse, GatewayError> {
        self.dispatch("get_profile", ApiRequest::new(Method::GET, ["users", "me"]))
            .await
    }

    pub async fn update_profile(
        &self,
        request: &UpdateProfileRequest,
    ) -> Result<UpdateProfileResponse, GatewayError> {
        const OPERATION: &str = "update_profile";
        let body = encode_body(OPERATION, request)?;
        self.dispatch(
            OPERATION,
            ApiRequest::new(Method::PATCH, ["users", "me"]).with_body(body),
        )
        .await
    }

    /// Local only: drops the stored credential. No request is sent.
    pub fn logout(&self) -> Result<(), SessionError> {
        self.session.clear()?;
        info!("gateway: session cleared");
        Ok(())
    }
}
