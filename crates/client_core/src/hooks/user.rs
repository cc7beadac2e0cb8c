use std::{future::Future, sync::Arc};

use shared::protocol::{
    EmailDuplicateRequest, EmailDuplicateResponse, LoginRequest, LoginResponse, SignUpRequest,
    SignUpResponse, UpdateProfileRequest, UpdateProfileResponse, UserProfileResponse,
};

use super::track;
use crate::{
    error::{GatewayError, SessionError},
    gateway::ApiGateway,
    tracker::OperationTracker,
};

pub struct UserApi {
    gateway: Arc<ApiGateway>,
    pub signup: OperationTracker<SignUpRequest, SignUpResponse>,
    pub login: OperationTracker<LoginRequest, LoginResponse>,
    pub email_check: OperationTracker<EmailDuplicateRequest, EmailDuplicateResponse>,
    pub profile: OperationTracker<(), UserProfileResponse>,
    pub profile_update: OperationTracker<UpdateProfileRequest, UpdateProfileResponse>,
}

impl UserApi {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self {
            signup: track(&gateway, "sign up", |gw, request: SignUpRequest| async move {
                gw.signup(&request).await
            }),
            login: track(&gateway, "login", |gw, request: LoginRequest| async move {
                gw.login(&request).await
            }),
            email_check: track(
                &gateway,
                "email check",
                |gw, request: EmailDuplicateRequest| async move {
                    gw.check_email_duplicate(&request).await
                },
            ),
            profile: track(&gateway, "profile fetch", |gw, ()| async move {
                gw.get_profile().await
            }),
            profile_update: track(
                &gateway,
                "profile update",
                |gw, request: UpdateProfileRequest| async move {
                    gw.update_profile(&request).await
                },
            ),
            gateway,
        }
    }

    pub fn signup(
        &self,
        request: SignUpRequest,
    ) -> impl Future<Output = Result<SignUpResponse, GatewayError>> {
        self.signup.execute(request)
    }

    pub fn login(
        &self,
        request: LoginRequest,
    ) -> impl Future<Output = Result<LoginResponse, GatewayError>> {
        self.login.execute(request)
    }

    pub fn check_email_duplicate(
        &self,
        request: EmailDuplicateRequest,
    ) -> impl Future<Output = Result<EmailDuplicateResponse, GatewayError>> {
        self.email_check.execute(request)
    }

    pub fn get_profile(&self) -> impl Future<Output = Result<UserProfileResponse, GatewayError>> {
        self.profile.execute(())
    }

    pub fn update_profile(
        &self,
        request: UpdateProfileRequest,
    ) -> impl Future<Output = Result<UpdateProfileResponse, GatewayError>> {
        self.profile_update.execute(request)
    }

    /// Drops the stored credential and resets the login tracker.
    ///
    /// Local and synchronous: no request is sent and no tracker enters `loading`.
    /// The login tracker is reset even if clearing the store fails.
    pub fn logout(&self) -> Result<(), SessionError> {
        let cleared = self.gateway.logout();
        self.login.reset();
        cleared
    }
}
