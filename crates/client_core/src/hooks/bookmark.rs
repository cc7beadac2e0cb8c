use std::{future::Future, sync::Arc};

use shared::{
    domain::{GroupId, StoreId},
    protocol::{
        BookmarkGroupDetailResponse, BookmarkedGroupsResponse, CheckBookmarkedResponse,
        CreateBookmarkGroupRequest, CreateBookmarkGroupResponse, CreateBookmarkRequest,
        CreateBookmarkResponse, DeleteBookmarkGroupRequest, DeleteBookmarkGroupResponse,
        DeleteBookmarkResponse, UpdateBookmarkGroupRequest, UpdateBookmarkGroupResponse,
        UserBookmarkItem,
    },
};

use super::track;
use crate::{error::GatewayError, gateway::ApiGateway, tracker::OperationTracker};

pub struct BookmarkApi {
    pub create_group: OperationTracker<CreateBookmarkGroupRequest, CreateBookmarkGroupResponse>,
    pub groups: OperationTracker<(), BookmarkedGroupsResponse>,
    pub group: OperationTracker<GroupId, BookmarkGroupDetailResponse>,
    pub update_group:
        OperationTracker<(GroupId, UpdateBookmarkGroupRequest), UpdateBookmarkGroupResponse>,
    pub delete_group: OperationTracker<DeleteBookmarkGroupRequest, DeleteBookmarkGroupResponse>,
    pub my_bookmarks: OperationTracker<(), Vec<UserBookmarkItem>>,
    pub create_bookmark: OperationTracker<(StoreId, CreateBookmarkRequest), CreateBookmarkResponse>,
    pub delete_bookmark: OperationTracker<StoreId, DeleteBookmarkResponse>,
    pub check_bookmarked: OperationTracker<Vec<StoreId>, CheckBookmarkedResponse>,
}

impl BookmarkApi {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self {
            create_group: track(
                &gateway,
                "bookmark group creation",
                |gw, request: CreateBookmarkGroupRequest| async move {
                    gw.create_bookmark_group(&request).await
                },
            ),
            groups: track(&gateway, "bookmark groups fetch", |gw, ()| async move {
                gw.get_bookmark_groups().await
            }),
            group: track(
                &gateway,
                "bookmark group fetch",
                |gw, group_id: GroupId| async move { gw.get_bookmark_group(group_id).await },
            ),
            update_group: track(
                &gateway,
                "bookmark group update",
                |gw, (group_id, request): (GroupId, UpdateBookmarkGroupRequest)| async move {
                    gw.update_bookmark_group(group_id, &request).await
                },
            ),
            delete_group: track(
                &gateway,
                "bookmark group deletion",
                |gw, request: DeleteBookmarkGroupRequest| async move {
                    gw.delete_bookmark_group(&request).await
                },
            ),
            my_bookmarks: track(&gateway, "my bookmarks fetch", |gw, ()| async move {
                gw.get_my_bookmarks().await
            }),
            create_bookmark: track(
                &gateway,
                "bookmark creation",
                |gw, (store_id, request): (StoreId, CreateBookmarkRequest)| async move {
                    gw.create_bookmark(store_id, &request).await
                },
            ),
            delete_bookmark: track(
                &gateway,
                "bookmark deletion",
                |gw, store_id: StoreId| async move { gw.delete_bookmark(store_id).await },
            ),
            check_bookmarked: track(
                &gateway,
                "bookmark status check",
                |gw, store_ids: Vec<StoreId>| async move {
                    gw.check_my_bookmarked_stores(&store_ids).await
                },
            ),
        }
    }

    pub fn create_bookmark_group(
        &self,
        request: CreateBookmarkGroupRequest,
    ) -> impl Future<Output = Result<CreateBookmarkGroupResponse, GatewayError>> {
        self.create_group.execute(request)
    }

    pub fn get_bookmark_groups(
        &self,
    ) -> impl Future<Output = Result<BookmarkedGroupsResponse, GatewayError>> {
        self.groups.execute(())
    }

    pub fn get_bookmark_group(
        &self,
        group_id: GroupId,
    ) -> impl Future<Output = Result<BookmarkGroupDetailResponse, GatewayError>> {
        self.group.execute(group_id)
    }

    pub fn update_bookmark_group(
        &self,
        group_id: GroupId,
        request: UpdateBookmarkGroupRequest,
    ) -> impl Future<Output = Result<UpdateBookmarkGroupResponse, GatewayError>> {
        self.update_group.execute((group_id, request))
    }

    pub fn delete_bookmark_group(
        &self,
        request: DeleteBookmarkGroupRequest,
    ) -> impl Future<Output = Result<DeleteBookmarkGroupResponse, GatewayError>> {
        self.delete_group.execute(request)
    }

    pub fn get_my_bookmarks(
        &self,
    ) -> impl Future<Output = Result<Vec<UserBookmarkItem>, GatewayError>> {
        self.my_bookmarks.execute(())
    }

    pub fn create_bookmark(
        &self,
        store_id: StoreId,
        request: CreateBookmarkRequest,
    ) -> impl Future<Output = Result<CreateBookmarkResponse, GatewayError>> {
        self.create_bookmark.execute((store_id, request))
    }

    pub fn delete_bookmark(
        &self,
        store_id: StoreId,
    ) -> impl Future<Output = Result<DeleteBookmarkResponse, GatewayError>> {
        self.delete_bookmark.execute(store_id)
    }

    pub fn check_my_bookmarked_stores(
        &self,
        store_ids: Vec<StoreId>,
    ) -> impl Future<Output = Result<CheckBookmarkedResponse, GatewayError>> {
        self.check_bookmarked.execute(store_ids)
    }
}
