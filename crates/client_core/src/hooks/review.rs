use std::{future::Future, sync::Arc};

use shared::{
    domain::{ReviewId, StoreId},
    protocol::{
        CreateReviewResponse, DeleteReviewResponse, ReviewRequest, ReviewResponse,
        UserReviewsResponse,
    },
};

use super::track;
use crate::{error::GatewayError, gateway::ApiGateway, tracker::OperationTracker};

pub struct ReviewApi {
    pub my_reviews: OperationTracker<(), UserReviewsResponse>,
    pub create_review: OperationTracker<(StoreId, ReviewRequest), CreateReviewResponse>,
    pub update_review: OperationTracker<(ReviewId, ReviewRequest), ReviewResponse>,
    pub delete_review: OperationTracker<ReviewId, DeleteReviewResponse>,
}

impl ReviewApi {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self {
            my_reviews: track(&gateway, "my reviews fetch", |gw, ()| async move {
                gw.get_my_reviews().await
            }),
            create_review: track(
                &gateway,
                "review creation",
                |gw, (store_id, request): (StoreId, ReviewRequest)| async move {
                    gw.create_review(store_id, &request).await
                },
            ),
            update_review: track(
                &gateway,
                "review update",
                |gw, (review_id, request): (ReviewId, ReviewRequest)| async move {
                    gw.update_review(review_id, &request).await
                },
            ),
            delete_review: track(
                &gateway,
                "review deletion",
                |gw, review_id: ReviewId| async move { gw.delete_review(review_id).await },
            ),
        }
    }

    pub fn get_my_reviews(
        &self,
    ) -> impl Future<Output = Result<UserReviewsResponse, GatewayError>> {
        self.my_reviews.execute(())
    }

    pub fn create_review(
        &self,
        store_id: StoreId,
        request: ReviewRequest,
    ) -> impl Future<Output = Result<CreateReviewResponse, GatewayError>> {
        self.create_review.execute((store_id, request))
    }

    pub fn update_review(
        &self,
        review_id: ReviewId,
        request: ReviewRequest,
    ) -> impl Future<Output = Result<ReviewResponse, GatewayError>> {
        self.update_review.execute((review_id, request))
    }

    pub fn delete_review(
        &self,
        review_id: ReviewId,
    ) -> impl Future<Output = Result<DeleteReviewResponse, GatewayError>> {
        self.delete_review.execute(review_id)
    }
}
