use reqwest::Method;
use shared::{
    domain::{GroupId, StoreId},
    protocol::{
        BookmarkGroupDetailResponse, BookmarkedGroupsResponse, CheckBookmarkedRequest,
        CheckBookmarkedResponse, CreateBookmarkGroupRequest, CreateBookmarkGroupResponse,
        CreateBookmarkRequest, CreateBookmarkResponse, DeleteBookmarkGroupRequest,
        DeleteBookmarkGroupResponse, DeleteBookmarkResponse, UpdateBookmarkGroupRequest,
        UpdateBookmarkGroupResponse, UserBookmarkItem,
    },
};

use super::{encode_body, ApiGateway};
use crate::{error::GatewayError, transport::ApiRequest};

fn group_path(group_id: GroupId) -> [String; 2] {
    ["bookmark-groups".to_string(), group_id.to_string()]
}

fn store_bookmark_path(store_id: StoreId) -> [String; 3] {
    [
        "stores".to_string(),
        store_id.to_string(),
        "bookmark".to_string(),
    ]
}

impl ApiGateway {
    pub async fn create_bookmark_group(
        &self,
        request: &CreateBookmarkGroupRequest,
    ) -> Result<CreateBookmarkGroupResponse, GatewayError> {
        const OPERATION: &str = "create_bookmark_group";
        let body = encode_body(OPERATION, request)?;
        self.dispatch(
            OPERATION,
            ApiRequest::new(Method::POST, ["bookmark-groups"]).with_body(body),
        )
        .await
    }

    pub async fn get_bookmark_groups(&self) -> Result<BookmarkedGroupsResponse, GatewayError> {
        self.dispatch(
            "get_bookmark_groups",
            ApiRequest::new(Method::GET, ["bookmark-groups"]),
        )
        .await
    }

    pub async fn get_bookmark_group(
        &self,
        group_id: GroupId,
    ) -> Result<BookmarkGroupDetailResponse, GatewayError> {
        self.dispatch(
            "get_bookmark_group",
            ApiRequest::new(Method::GET, group_path(group_id)),
        )
        .await
    }

    pub async fn update_bookmark_group(
        &self,
        group_id: GroupId,
        request: &UpdateBookmarkGroupRequest,
    ) -> Result<UpdateBookmarkGroupResponse, GatewayError> {
        const OPERATION: &str = "update_bookmark_group";
        let body = encode_body(OPERATION, request)?;
        self.dispatch(
            OPERATION,
            ApiRequest::new(Method::PATCH, group_path(group_id)).with_body(body),
        )
        .await
    }

    pub async fn delete_bookmark_group(
        &self,
        request: &DeleteBookmarkGroupRequest,
    ) -> Result<DeleteBookmarkGroupResponse, GatewayError> {
        self.dispatch(
            "delete_bookmark_group",
            ApiRequest::new(Method::DELETE, group_path(request.group_id)),
        )
        .await
    }

    pub async fn get_my_bookmarks(&self) -> Result<Vec<UserBookmarkItem>, GatewayError> {
        self.dispatch(
            "get_my_bookmarks",
            ApiRequest::new(Method::GET, ["bookmarks", "me"]),
        )
        .await
    }

    pub async fn create_bookmark(
        &self,
        store_id: StoreId,
        request: &CreateBookmarkRequest,
    ) -> Result<CreateBookmarkResponse, GatewayError> {
        const OPERATION: &str = "create_bookmark";
        let body = encode_body(OPERATION, request)?;
        self.dispatch(
            OPERATION,
            ApiRequest::new(Method::POST, store_bookmark_path(store_id)).with_body(body),
        )
        .await
    }

    pub async fn delete_bookmark(
        &self,
        store_id: StoreId,
    ) -> Result<DeleteBookmarkResponse, GatewayError> {
        self.dispatch(
            "delete_bookmark",
            ApiRequest::new(Method::DELETE, store_bookmark_path(store_id)),
        )
        .await
    }

    pub async fn check_my_bookmarked_stores(
        &self,
        store_ids: &[StoreId],
    ) -> Result<CheckBookmarkedResponse, GatewayError> {
        const OPERATION: &str = "check_my_bookmarked_stores";
        let body = encode_body(
            OPERATION,
            &CheckBookmarkedRequest {
                store_ids: store_ids.to_vec(),
            },
        )?;
        self.dispatch(
            OPERATION,
            ApiRequest::new(Method::POST, ["bookmarks", "check"]).with_body(body),
        )
        .await
    }
}
