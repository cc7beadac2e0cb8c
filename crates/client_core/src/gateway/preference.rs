use reqwest::Method;
use shared::protocol::{
    MessageResponse, PreferredCategoriesResponse, RegionResponse, SetPreferredRegionRequest,
    UpdatePreferredCategoriesRequest,
};

use super::{encode_body, ApiGateway};
use crate::{error::GatewayError, transport::ApiRequest};

impl ApiGateway {
    pub async fn set_preferred_region(
        &self,
        request: &SetPreferredRegionRequest,
    ) -> Result<MessageResponse, GatewayError> {
        const OPERATION: &str = "set_preferred_region";
        let body = encode_body(OPERATION, request)?;
        self.dispatch(
            OPERATION,
            ApiRequest::new(Method::PUT, ["preferences", "region"]).with_body(body),
        )
        .await
    }

    pub async fn get_preferred_region(&self) -> Result<RegionResponse, GatewayError> {
        self.dispatch(
            "get_preferred_region",
            ApiRequest::new(Method::GET, ["preferences", "region"]),
        )
        .await
    }

    pub async fn set_preferred_categories(
        &self,
        request: &UpdatePreferredCategoriesRequest,
    ) -> Result<MessageResponse, GatewayError> {
        const OPERATION: &str = "set_preferred_categories";
        let body = encode_body(OPERATION, request)?;
        self.dispatch(
            OPERATION,
            ApiRequest::new(Method::PUT, ["preferences", "categories"]).with_body(body),
        )
        .await
    }

    pub async fn get_preferred_categories(
        &self,
    ) -> Result<PreferredCategoriesResponse, GatewayError> {
        self.dispatch(
            "get_preferred_categories",
            ApiRequest::new(Method::GET, ["preferences", "categories"]),
        )
        .await
    }
}
