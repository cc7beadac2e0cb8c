use super::*;
use std::{
    collections::VecDeque,
    sync::Mutex,
};

use async_trait::async_trait;
use chrono::Duration;
use reqwest::Method;
use serde_json::json;
use shared::{
    domain::{GroupId, ReviewId, StoreId, UserId},
    protocol::{
        CreateBookmarkGroupRequest, CreateBookmarkRequest, DeleteBookmarkGroupRequest,
        EmailDuplicateRequest, LoginRequest, ReviewRequest, SetPreferredRegionRequest,
        StoreSearchParams, UpdateBookmarkGroupRequest, UpdatePreferredCategoriesRequest,
        UpdateProfileRequest, UserInfo,
    },
};

use crate::{
    config::ClientSettings,
    error::SessionError,
    session::Session,
    transport::MissingTransport,
};

/// Replays canned responses in order and records every request it was handed.
struct ScriptedTransport {
    responses: Mutex<VecDeque<RawResponse>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    fn replying(responses: impl IntoIterator<Item = (u16, &'static str)>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(
                responses
                    .into_iter()
                    .map(|(status, body)| RawResponse {
                        status,
                        body: body.as_bytes().to_vec(),
                    })
                    .collect(),
            ),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, TransportError> {
        self.requests.lock().expect("requests lock").push(request);
        self.responses
            .lock()
            .expect("responses lock")
            .pop_front()
            .ok_or_else(|| TransportError::Unavailable("script exhausted".into()))
    }
}

fn session_expiring_in(delta: Duration) -> Session {
    Session {
        access_token: "live-token".into(),
        token_type: "Bearer".into(),
        expires_at: Utc::now() + delta,
        user: UserInfo {
            email: "ana@example.com".into(),
            id: UserId(3),
        },
    }
}

fn gateway_with(transport: Arc<ScriptedTransport>) -> (ApiGateway, Arc<InMemorySessionStore>) {
    let session = Arc::new(InMemorySessionStore::new());
    (ApiGateway::new(transport, session.clone()), session)
}

#[tokio::test]
async fn create_group_posts_camel_case_body() {
    let transport = ScriptedTransport::replying([(
        201,
        r#"{"message":"created","group":{"groupId":7,"groupName":"Cafes","iconUrl":"U+2615"}}"#,
    )]);
    let (gateway, _) = gateway_with(transport.clone());

    let response = gateway
        .create_bookmark_group(&CreateBookmarkGroupRequest {
            group_name: "Cafes".into(),
            icon_url: "U+2615".into(),
        })
        .await
        .expect("create group");
    assert_eq!(response.group.group_id, GroupId(7));

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::POST);
    assert_eq!(requests[0].path(), "bookmark-groups");
    assert_eq!(
        requests[0].body,
        Some(json!({"groupName": "Cafes", "iconUrl": "U+2615"}))
    );
    assert_eq!(requests[0].bearer_token, None);
}

#[tokio::test]
async fn search_params_become_query_pairs_without_unset_fields() {
    let transport = ScriptedTransport::replying([(200, "[]")]);
    let (gateway, _) = gateway_with(transport.clone());

    let stores = gateway
        .get_nearby_stores(&StoreSearchParams {
            lat: 37.5,
            lng: 127.25,
            radius: Some(500),
            ..StoreSearchParams::default()
        })
        .await
        .expect("nearby");
    assert!(stores.is_empty());

    let request = &transport.requests()[0];
    assert_eq!(request.path(), "stores/nearby");
    let mut query = request.query.clone();
    query.sort();
    assert_eq!(
        query,
        vec![
            ("lat".to_string(), "37.5".to_string()),
            ("lng".to_string(), "127.25".to_string()),
            ("radius".to_string(), "500".to_string()),
        ]
    );
}

#[tokio::test]
async fn recommendations_send_limit() {
    let transport = ScriptedTransport::replying([(200, "[]")]);
    let (gateway, _) = gateway_with(transport.clone());
    gateway
        .get_recommendations(DEFAULT_RECOMMENDATION_LIMIT)
        .await
        .expect("recommendations");
    let request = &transport.requests()[0];
    assert_eq!(request.path(), "stores/recommendations");
    assert_eq!(request.query, vec![("limit".to_string(), "5".to_string())]);
}

#[tokio::test]
async fn delete_group_targets_group_path() {
    let transport = ScriptedTransport::replying([(
        200,
        r#"{"message":"deleted","deletedGroupId":9}"#,
    )]);
    let (gateway, _) = gateway_with(transport.clone());
    let response = gateway
        .delete_bookmark_group(&DeleteBookmarkGroupRequest {
            group_id: GroupId(9),
        })
        .await
        .expect("delete group");
    assert_eq!(response.deleted_group_id, GroupId(9));
    let request = &transport.requests()[0];
    assert_eq!(request.method, Method::DELETE);
    assert_eq!(request.segments, vec!["bookmark-groups", "9"]);
}

#[tokio::test]
async fn place_id_stays_a_single_segment() {
    let transport = ScriptedTransport::replying([(500, "")]);
    let (gateway, _) = gateway_with(transport.clone());
    let _ = gateway.get_place_details_by_place_id("ChIJ/abc def").await;
    assert_eq!(
        transport.requests()[0].segments,
        vec!["stores", "places", "ChIJ/abc def"]
    );
}

#[tokio::test]
async fn non_success_status_carries_server_message() {
    let transport = ScriptedTransport::replying([(
        409,
        r#"{"message":"group name already exists","status":409}"#,
    )]);
    let (gateway, _) = gateway_with(transport);
    let err = gateway
        .create_bookmark_group(&CreateBookmarkGroupRequest {
            group_name: "Cafes".into(),
            icon_url: "U+2615".into(),
        })
        .await
        .expect_err("conflict");

    assert_eq!(err.operation(), "create_bookmark_group");
    assert_eq!(err.status(), Some(409));
    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(
        err.to_string(),
        "server rejected request with status 409: group name already exists"
    );
}

#[tokio::test]
async fn non_success_without_body_uses_status_reason() {
    let transport = ScriptedTransport::replying([(401, "")]);
    let (gateway, _) = gateway_with(transport);
    let err = gateway.get_profile().await.expect_err("unauthorized");
    assert!(err.requires_reauth());
    match err {
        GatewayError::Rejected { message, .. } => assert_eq!(message, "Unauthorized"),
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn undecodable_success_body_is_malformed() {
    let transport = ScriptedTransport::replying([(200, r#"{"unexpected":true}"#)]);
    let (gateway, _) = gateway_with(transport);
    let err = gateway.get_my_reviews().await.expect_err("malformed");
    assert!(matches!(
        err,
        GatewayError::Malformed {
            operation: "get_my_reviews",
            ..
        }
    ));
}

#[tokio::test]
async fn transport_failure_is_attributed_to_operation() {
    let gateway = ApiGateway::new(Arc::new(MissingTransport), Arc::new(InMemorySessionStore::new()));
    let err = gateway.get_bookmark_groups().await.expect_err("no transport");
    assert!(err.is_transport());
    assert_eq!(err.operation(), "get_bookmark_groups");
    assert!(err.to_string().contains("no api base url configured"));
}

#[tokio::test]
async fn login_stores_session_and_later_requests_carry_bearer() {
    let transport = ScriptedTransport::replying([
        (
            200,
            r#"{"accessToken":"jwt-1","tokenType":"Bearer","expiresInMillis":3600000,"user":{"email":"ana@example.com","id":3}}"#,
        ),
        (200, r#"{"id":3,"nickname":"ana","email":"ana@example.com"}"#),
    ]);
    let (gateway, session) = gateway_with(transport.clone());

    gateway
        .login(&LoginRequest {
            email: "ana@example.com".into(),
            password: "secret".into(),
        })
        .await
        .expect("login");
    let stored = session.read().expect("read").expect("session stored");
    assert_eq!(stored.access_token, "jwt-1");
    assert_eq!(stored.user.id, UserId(3));

    gateway.get_profile().await.expect("profile");
    let requests = transport.requests();
    assert_eq!(requests[0].bearer_token, None);
    assert_eq!(requests[1].bearer_token.as_deref(), Some("jwt-1"));
}

#[tokio::test]
async fn failed_login_leaves_session_untouched() {
    let transport = ScriptedTransport::replying([(401, r#"{"error":"bad credentials"}"#)]);
    let (gateway, session) = gateway_with(transport);
    let err = gateway
        .login(&LoginRequest {
            email: "ana@example.com".into(),
            password: "wrong".into(),
        })
        .await
        .expect_err("rejected");
    assert_eq!(
        err.to_string(),
        "server rejected request with status 401: bad credentials"
    );
    assert_eq!(session.read().expect("read"), None);
}

#[tokio::test]
async fn expired_session_is_not_sent() {
    let transport = ScriptedTransport::replying([(200, r#"{"message":"ok","reviews":[]}"#)]);
    let session = Arc::new(InMemorySessionStore::with_session(session_expiring_in(
        Duration::seconds(-1),
    )));
    let gateway = ApiGateway::new(transport.clone(), session);
    gateway.get_my_reviews().await.expect("reviews");
    assert_eq!(transport.requests()[0].bearer_token, None);
}

#[tokio::test]
async fn logout_clears_session_without_a_request() {
    let transport = ScriptedTransport::replying([]);
    let session = Arc::new(InMemorySessionStore::with_session(session_expiring_in(
        Duration::hours(1),
    )));
    let gateway = ApiGateway::new(transport.clone(), session.clone());
    gateway.logout().expect("logout");
    assert_eq!(session.read().expect("read"), None);
    assert!(transport.requests().is_empty());
}

struct BrokenSessionStore;

impl SessionStore for BrokenSessionStore {
    fn read(&self) -> Result<Option<Session>, SessionError> {
        Err(SessionError::Poisoned)
    }

    fn save(&self, _session: Session) -> Result<(), SessionError> {
        Err(SessionError::Poisoned)
    }

    fn clear(&self) -> Result<(), SessionError> {
        Err(SessionError::Poisoned)
    }
}

#[tokio::test]
async fn unreadable_session_fails_before_sending() {
    let transport = ScriptedTransport::replying([(200, "[]")]);
    let gateway = ApiGateway::new(transport.clone(), Arc::new(BrokenSessionStore));
    let err = gateway.get_my_bookmarks().await.expect_err("session failure");
    assert!(matches!(err, GatewayError::Session { .. }));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn empty_success_body_does_not_satisfy_object_response() {
    let transport = ScriptedTransport::replying([(204, "")]);
    let (gateway, _) = gateway_with(transport);
    let err = gateway
        .check_my_bookmarked_stores(&[StoreId(1)])
        .await
        .expect_err("null is not an object");
    assert!(matches!(err, GatewayError::Malformed { .. }));
}

/// `(method, path, body)` of every request the transport saw, in order.
fn routes(transport: &ScriptedTransport) -> Vec<(Method, String, Option<Value>)> {
    transport
        .requests()
        .into_iter()
        .map(|request| (request.method.clone(), request.path(), request.body))
        .collect()
}

#[tokio::test]
async fn user_operations_use_their_routes() {
    let transport = ScriptedTransport::replying([
        (200, r#"{"message":"available","duplicated":false}"#),
        (200, r#"{"message":"updated","nickname":"ana2"}"#),
    ]);
    let (gateway, _) = gateway_with(transport.clone());

    let check = gateway
        .check_email_duplicate(&EmailDuplicateRequest {
            email: "ana@example.com".into(),
        })
        .await
        .expect("email check");
    assert!(!check.duplicated);
    gateway
        .update_profile(&UpdateProfileRequest {
            nickname: "ana2".into(),
            password: None,
        })
        .await
        .expect("update profile");

    assert_eq!(
        routes(&transport),
        vec![
            (
                Method::POST,
                "users/email/check".to_string(),
                Some(json!({"email": "ana@example.com"})),
            ),
            (
                Method::PATCH,
                "users/me".to_string(),
                Some(json!({"nickname": "ana2"})),
            ),
        ]
    );
}

#[tokio::test]
async fn store_operations_use_their_routes() {
    let transport = ScriptedTransport::replying([
        (200, "[]"),
        (
            200,
            r#"{"placeId":"ChIJx","name":"Corner Cafe","formattedAddress":"1 Main St","lng":127.0,"lat":37.5}"#,
        ),
    ]);
    let (gateway, _) = gateway_with(transport.clone());

    gateway
        .get_popular_stores(&StoreSearchParams {
            lat: 37.5,
            lng: 127.0,
            limit: Some(10),
            category: Some("cafe".into()),
            ..StoreSearchParams::default()
        })
        .await
        .expect("popular");
    let details = gateway
        .get_store_details(StoreId(11))
        .await
        .expect("store details");
    assert_eq!(details.place_id, "ChIJx");

    let requests = transport.requests();
    assert_eq!(requests[0].method, Method::GET);
    assert_eq!(requests[0].path(), "stores/popular");
    let mut query = requests[0].query.clone();
    query.sort();
    assert_eq!(
        query,
        vec![
            ("category".to_string(), "cafe".to_string()),
            ("lat".to_string(), "37.5".to_string()),
            ("limit".to_string(), "10".to_string()),
            ("lng".to_string(), "127.0".to_string()),
        ]
    );
    assert_eq!(requests[1].method, Method::GET);
    assert_eq!(requests[1].path(), "stores/11");
    assert_eq!(requests[1].body, None);
}

#[tokio::test]
async fn bookmark_operations_use_their_routes() {
    let transport = ScriptedTransport::replying([
        (
            200,
            r#"{"message":"ok","group":{"groupId":4,"groupName":"Cafes","isDefault":false,"iconUrl":"U+2615"}}"#,
        ),
        (
            200,
            r#"{"message":"ok","group":{"groupId":4,"groupName":"Coffee","iconUrl":"U+2615"}}"#,
        ),
        (201, r#"{"bookmarkId":1,"storeId":42}"#),
        (201, r#"{"bookmarkId":2,"storeId":43}"#),
    ]);
    let (gateway, _) = gateway_with(transport.clone());

    let group = gateway
        .get_bookmark_group(GroupId(4))
        .await
        .expect("group");
    assert!(group.group.stores.is_empty());
    gateway
        .update_bookmark_group(
            GroupId(4),
            &UpdateBookmarkGroupRequest {
                group_name: Some("Coffee".into()),
                icon_url: None,
            },
        )
        .await
        .expect("update group");
    gateway
        .create_bookmark(
            StoreId(42),
            &CreateBookmarkRequest {
                group_id: Some(GroupId(4)),
            },
        )
        .await
        .expect("bookmark into group");
    gateway
        .create_bookmark(StoreId(43), &CreateBookmarkRequest::default())
        .await
        .expect("bookmark into default group");

    assert_eq!(
        routes(&transport),
        vec![
            (Method::GET, "bookmark-groups/4".to_string(), None),
            (
                Method::PATCH,
                "bookmark-groups/4".to_string(),
                Some(json!({"groupName": "Coffee"})),
            ),
            (
                Method::POST,
                "stores/42/bookmark".to_string(),
                Some(json!({"groupId": 4})),
            ),
            (Method::POST, "stores/43/bookmark".to_string(), Some(json!({}))),
        ]
    );
}

#[tokio::test]
async fn preference_operations_use_their_routes() {
    let transport = ScriptedTransport::replying([
        (200, r#"{"message":"saved"}"#),
        (
            200,
            r#"{"sido":"Seoul","sigungu":"Mapo-gu","lat":37.56,"lng":126.9}"#,
        ),
        (200, r#"{"message":"saved"}"#),
        (200, r#"{"categoryIds":["cafe","bar"]}"#),
    ]);
    let (gateway, _) = gateway_with(transport.clone());

    gateway
        .set_preferred_region(&SetPreferredRegionRequest {
            sido: "Seoul".into(),
            sigungu: "Mapo-gu".into(),
            dong: None,
        })
        .await
        .expect("set region");
    let region = gateway.get_preferred_region().await.expect("region");
    assert_eq!(region.sigungu, "Mapo-gu");
    gateway
        .set_preferred_categories(&UpdatePreferredCategoriesRequest {
            category_ids: vec!["cafe".into(), "bar".into()],
        })
        .await
        .expect("set categories");
    let categories = gateway.get_preferred_categories().await.expect("categories");
    assert_eq!(categories.category_ids, vec!["cafe", "bar"]);

    assert_eq!(
        routes(&transport),
        vec![
            (
                Method::PUT,
                "preferences/region".to_string(),
                Some(json!({"sido": "Seoul", "sigungu": "Mapo-gu"})),
            ),
            (Method::GET, "preferences/region".to_string(), None),
            (
                Method::PUT,
                "preferences/categories".to_string(),
                Some(json!({"categoryIds": ["cafe", "bar"]})),
            ),
            (Method::GET, "preferences/categories".to_string(), None),
        ]
    );
}

#[tokio::test]
async fn review_operations_use_their_routes() {
    let transport = ScriptedTransport::replying([
        (201, r#"{"reviewId":5}"#),
        (
            200,
            r#"{"reviewId":5,"message":"updated","rating":3.5,"content":"ok"}"#,
        ),
        (200, r#"{"message":"deleted"}"#),
    ]);
    let (gateway, _) = gateway_with(transport.clone());
    let review = ReviewRequest {
        rating: 4.5,
        content: "great coffee".into(),
        img_urls: vec!["https://img.example/1.jpg".into()],
    };

    let created = gateway
        .create_review(StoreId(42), &review)
        .await
        .expect("create review");
    assert_eq!(created.review_id, ReviewId(5));
    gateway
        .update_review(
            ReviewId(5),
            &ReviewRequest {
                rating: 3.5,
                content: "ok".into(),
                img_urls: Vec::new(),
            },
        )
        .await
        .expect("update review");
    gateway
        .delete_review(ReviewId(5))
        .await
        .expect("delete review");

    assert_eq!(
        routes(&transport),
        vec![
            (
                Method::POST,
                "stores/42/reviews".to_string(),
                Some(json!({
                    "rating": 4.5,
                    "content": "great coffee",
                    "imgUrls": ["https://img.example/1.jpg"]
                })),
            ),
            (
                Method::PUT,
                "reviews/5".to_string(),
                Some(json!({"rating": 3.5, "content": "ok"})),
            ),
            (Method::DELETE, "reviews/5".to_string(), None),
        ]
    );
}

#[tokio::test]
async fn login_with_unbounded_lifetime_keeps_a_session() {
    let transport = ScriptedTransport::replying([(
        200,
        r#"{"accessToken":"jwt-forever","tokenType":"Bearer","expiresInMillis":9223372036854775807,"user":{"email":"ana@example.com","id":3}}"#,
    )]);
    let (gateway, session) = gateway_with(transport);

    gateway
        .login(&LoginRequest {
            email: "ana@example.com".into(),
            password: "secret".into(),
        })
        .await
        .expect("login");
    let stored = session.read().expect("read").expect("session stored");
    assert!(!stored.is_expired(Utc::now()));
}

#[tokio::test]
async fn blank_base_url_builds_a_gateway_without_server() {
    let settings = ClientSettings {
        api_base_url: " ".into(),
        ..ClientSettings::default()
    };
    let gateway = ApiGateway::from_settings(&settings).expect("gateway");
    let err = gateway.get_profile().await.expect_err("no server");
    assert!(err.is_transport());
    assert_eq!(err.status(), None);
    assert!(err.to_string().contains("no api base url configured"));
}

#[test]
fn configured_base_url_builds_http_gateway() {
    let settings = ClientSettings {
        api_base_url: "http://127.0.0.1:9/api".into(),
        ..ClientSettings::default()
    };
    ApiGateway::from_settings(&settings).expect("gateway");
    let transport = HttpTransport::from_settings(&settings).expect("transport");
    assert_eq!(transport.base_url().as_str(), "http://127.0.0.1:9/api");
}
