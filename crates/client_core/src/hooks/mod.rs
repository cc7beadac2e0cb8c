//! Per-domain bundles of trackers, one tracker per gateway operation.
//!
//! Each bound action returns the tracker's `execute` future directly, so the
//! tracker is already marked as loading when the action returns.

use std::{future::Future, sync::Arc};

use crate::{error::GatewayError, gateway::ApiGateway, tracker::OperationTracker};

mod bookmark;
mod preference;
mod review;
mod store;
mod user;

pub use bookmark::BookmarkApi;
pub use preference::PreferenceApi;
pub use review::ReviewApi;
pub use store::StoreApi;
pub use user::UserApi;

pub struct ApiHooks {
    pub user: UserApi,
    pub store: StoreApi,
    pub bookmark: BookmarkApi,
    pub preference: PreferenceApi,
    pub review: ReviewApi,
}

impl ApiHooks {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self {
            user: UserApi::new(Arc::clone(&gateway)),
            store: StoreApi::new(Arc::clone(&gateway)),
            bookmark: BookmarkApi::new(Arc::clone(&gateway)),
            preference: PreferenceApi::new(Arc::clone(&gateway)),
            review: ReviewApi::new(gateway),
        }
    }
}

fn track<I, O, F, Fut>(
    gateway: &Arc<ApiGateway>,
    label: &'static str,
    call: F,
) -> OperationTracker<I, O>
where
    I: Send + 'static,
    O: Clone + Send + Sync + 'static,
    F: Fn(Arc<ApiGateway>, I) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<O, GatewayError>> + Send + 'static,
{
    let gateway = Arc::clone(gateway);
    OperationTracker::new(label, move |input| call(Arc::clone(&gateway), input))
}

#[cfg(test)]
#[path = "../tests/hooks_tests.rs"]
mod tests;
