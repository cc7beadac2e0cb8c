use std::{future::Future, sync::Arc};

use shared::{
    domain::StoreId,
    protocol::{NearbyStoreDto, PlaceDetailsDto, PopularStoreDto, RecommendedStore, StoreSearchParams},
};

use super::track;
use crate::{
    error::GatewayError,
    gateway::{ApiGateway, DEFAULT_RECOMMENDATION_LIMIT},
    tracker::OperationTracker,
};

pub struct StoreApi {
    gateway: Arc<ApiGateway>,
    pub popular: OperationTracker<StoreSearchParams, Vec<PopularStoreDto>>,
    pub nearby: OperationTracker<StoreSearchParams, Vec<NearbyStoreDto>>,
    pub store_details: OperationTracker<StoreId, PlaceDetailsDto>,
    pub place_details: OperationTracker<String, PlaceDetailsDto>,
}

impl StoreApi {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self {
            popular: track(
                &gateway,
                "popular stores fetch",
                |gw, params: StoreSearchParams| async move { gw.get_popular_stores(&params).await },
            ),
            nearby: track(
                &gateway,
                "nearby stores fetch",
                |gw, params: StoreSearchParams| async move { gw.get_nearby_stores(&params).await },
            ),
            store_details: track(
                &gateway,
                "store details fetch",
                |gw, store_id: StoreId| async move { gw.get_store_details(store_id).await },
            ),
            place_details: track(
                &gateway,
                "place details fetch",
                |gw, place_id: String| async move {
                    gw.get_place_details_by_place_id(&place_id).await
                },
            ),
            gateway,
        }
    }

    pub fn get_popular_stores(
        &self,
        params: StoreSearchParams,
    ) -> impl Future<Output = Result<Vec<PopularStoreDto>, GatewayError>> {
        self.popular.execute(params)
    }

    pub fn get_nearby_stores(
        &self,
        params: StoreSearchParams,
    ) -> impl Future<Output = Result<Vec<NearbyStoreDto>, GatewayError>> {
        self.nearby.execute(params)
    }

    pub fn get_store_details(
        &self,
        store_id: StoreId,
    ) -> impl Future<Output = Result<PlaceDetailsDto, GatewayError>> {
        self.store_details.execute(store_id)
    }

    pub fn get_place_details_by_place_id(
        &self,
        place_id: impl Into<String>,
    ) -> impl Future<Output = Result<PlaceDetailsDto, GatewayError>> {
        self.place_details.execute(place_id.into())
    }

    /// Untracked pass-through; `None` asks for the default number of entries.
    pub async fn get_recommendations(
        &self,
        limit: Option<u32>,
    ) -> Result<Vec<RecommendedStore>, GatewayError> {
        self.gateway
            .get_recommendations(limit.unwrap_or(DEFAULT_RECOMMENDATION_LIMIT))
            .await
    }
}
