use std::{future::Future, sync::Arc};

use shared::protocol::{
    MessageResponse, PreferredCategoriesResponse, RegionResponse, SetPreferredRegionRequest,
    UpdatePreferredCategoriesRequest,
};

use super::track;
use crate::{error::GatewayError, gateway::ApiGateway, tracker::OperationTracker};

pub struct PreferenceApi {
    pub set_region: OperationTracker<SetPreferredRegionRequest, MessageResponse>,
    pub region: OperationTracker<(), RegionResponse>,
    pub set_categories: OperationTracker<UpdatePreferredCategoriesRequest, MessageResponse>,
    pub categories: OperationTracker<(), PreferredCategoriesResponse>,
}

impl PreferenceApi {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self {
            set_region: track(
                &gateway,
                "preferred region update",
                |gw, request: SetPreferredRegionRequest| async move {
                    gw.set_preferred_region(&request).await
                },
            ),
            region: track(&gateway, "preferred region fetch", |gw, ()| async move {
                gw.get_preferred_region().await
            }),
            set_categories: track(
                &gateway,
                "preferred categories update",
                |gw, request: UpdatePreferredCategoriesRequest| async move {
                    gw.set_preferred_categories(&request).await
                },
            ),
            categories: track(&gateway, "preferred categories fetch", |gw, ()| async move {
                gw.get_preferred_categories().await
            }),
        }
    }

    pub fn set_preferred_region(
        &self,
        request: SetPreferredRegionRequest,
    ) -> impl Future<Output = Result<MessageResponse, GatewayError>> {
        self.set_region.execute(request)
    }

    pub fn get_preferred_region(
        &self,
    ) -> impl Future<Output = Result<RegionResponse, GatewayError>> {
        self.region.execute(())
    }

    pub fn set_preferred_categories(
        &self,
        request: UpdatePreferredCategoriesRequest,
    ) -> impl Future<Output = Result<MessageResponse, GatewayError>> {
        self.set_categories.execute(request)
    }

    pub fn get_preferred_categories(
        &self,
    ) -> impl Future<Output = Result<PreferredCategoriesResponse, GatewayError>> {
        self.categories.execute(())
    }
}
