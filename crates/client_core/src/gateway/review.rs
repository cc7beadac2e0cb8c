use reqwest::Method;
use shared::{
    domain::{ReviewId, StoreId},
    protocol::{
        CreateReviewResponse, DeleteReviewResponse, ReviewRequest, ReviewResponse,
        UserReviewsResponse,
    },
};

use super::{encode_body, ApiGateway};
use crate::{error::GatewayError, transport::ApiRequest};

impl ApiGateway {
    pub async fn get_my_reviews(&self) -> Result<UserReviewsResponse, GatewayError> {
        self.dispatch(
            "get_my_reviews",
            ApiRequest::new(Method::GET, ["reviews", "me"]),
        )
        .await
    }

    pub async fn create_review(
        &self,
        store_id: StoreId,
        request: &ReviewRequest,
    ) -> Result<CreateReviewResponse, GatewayError> {
        const OPERATION: &str = "create_review";
        let body = encode_body(OPERATION, request)?;
        self.dispatch(
            OPERATION,
            ApiRequest::new(
                Method::POST,
                ["stores".to_string(), store_id.to_string(), "reviews".to_string()],
            )
            .with_body(body),
        )
        .await
    }

    pub async fn update_review(
        &self,
        review_id: ReviewId,
        request: &ReviewRequest,
    ) -> Result<ReviewResponse, GatewayError> {
        const OPERATION: &str = "update_review";
        let body = encode_body(OPERATION, request)?;
        self.dispatch(
            OPERATION,
            ApiRequest::new(Method::PUT, ["reviews".to_string(), review_id.to_string()])
                .with_body(body),
        )
        .await
    }

    pub async fn delete_review(
        &self,
        review_id: ReviewId,
    ) -> Result<DeleteReviewResponse, GatewayError> {
        self.dispatch(
            "delete_review",
            ApiRequest::new(Method::DELETE, ["reviews".to_string(), review_id.to_string()]),
        )
        .await
    }
}
