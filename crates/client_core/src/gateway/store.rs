use reqwest::Method;
use shared::{
    domain::StoreId,
    protocol::{NearbyStoreDto, PlaceDetailsDto, PopularStoreDto, RecommendedStore, StoreSearchParams},
};

use super::{encode_query, ApiGateway};
use crate::{error::GatewayError, transport::ApiRequest};

pub const DEFAULT_RECOMMENDATION_LIMIT: u32 = 5;

impl ApiGateway {
    pub async fn get_popular_stores(
        &self,
        params: &StoreSearchParams,
    ) -> Result<Vec<PopularStoreDto>, GatewayError> {
        const OPERATION: &str = "get_popular_stores";
        let query = encode_query(OPERATION, params)?;
        self.dispatch(
            OPERATION,
            ApiRequest::new(Method::GET, ["stores", "popular"]).with_query(query),
        )
        .await
    }

    pub async fn get_nearby_stores(
        &self,
        params: &StoreSearchParams,
    ) -> Result<Vec<NearbyStoreDto>, GatewayError> {
        const OPERATION: &str = "get_nearby_stores";
        let query = encode_query(OPERATION, params)?;
        self.dispatch(
            OPERATION,
            ApiRequest::new(Method::GET, ["stores", "nearby"]).with_query(query),
        )
        .await
    }

    pub async fn get_store_details(
        &self,
        store_id: StoreId,
    ) -> Result<PlaceDetailsDto, GatewayError> {
        self.dispatch(
            "get_store_details",
            ApiRequest::new(Method::GET, ["stores".to_string(), store_id.to_string()]),
        )
        .await
    }

    pub async fn get_place_details_by_place_id(
        &self,
        place_id: &str,
    ) -> Result<PlaceDetailsDto, GatewayError> {
        self.dispatch(
            "get_place_details_by_place_id",
            ApiRequest::new(Method::GET, ["stores", "places", place_id]),
        )
        .await
    }

    pub async fn get_recommendations(
        &self,
        limit: u32,
    ) -> Result<Vec<RecommendedStore>, GatewayError> {
        self.dispatch(
            "get_recommendations",
            ApiRequest::new(Method::GET, ["stores", "recommendations"])
                .with_query(vec![("limit".to_string(), limit.to_string())]),
        )
        .await
    }
}
