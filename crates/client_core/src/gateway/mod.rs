//! One async function per remote endpoint.
//!
//! Operations are grouped by domain in the submodules; this module holds the
//! shared dispatch path: attach credentials, send exactly once, classify the
//! response. Nothing here retries or caches.

use std::sync::Arc;

use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use shared::error::{ApiErrorBody, ErrorCode};
use tracing::{debug, warn};

use crate::{
    config::ClientSettings,
    error::{GatewayError, TransportError},
    session::{FileSessionStore, InMemorySessionStore, SessionStore},
    transport::{ApiRequest, HttpTransport, MissingTransport, RawResponse, Transport},
};

mod bookmark;
mod preference;
mod review;
mod store;
mod user;

pub use store::DEFAULT_RECOMMENDATION_LIMIT;

pub struct ApiGateway {
    transport: Arc<dyn Transport>,
    session: Arc<dyn SessionStore>,
}

impl ApiGateway {
    pub fn new(transport: Arc<dyn Transport>, session: Arc<dyn SessionStore>) -> Self {
        Self { transport, session }
    }

    /// HTTP transport from the settings, or [`MissingTransport`] when no base url is set;
    /// file-backed session when a session file is configured.
    pub fn from_settings(settings: &ClientSettings) -> Result<Self, TransportError> {
        let transport: Arc<dyn Transport> = if settings.api_base_url.trim().is_empty() {
            warn!("gateway: no api base url configured, every request will fail");
            Arc::new(MissingTransport)
        } else {
            let http = HttpTransport::from_settings(settings)?;
            debug!(base_url = %http.base_url(), "gateway: using http transport");
            Arc::new(http)
        };
        let session: Arc<dyn SessionStore> = match &settings.session_file {
            Some(path) => Arc::new(FileSessionStore::new(path.clone())),
            None => Arc::new(InMemorySessionStore::new()),
        };
        Ok(Self::new(transport, session))
    }

    pub fn session_store(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    fn bearer_token(&self, operation: &'static str) -> Result<Option<String>, GatewayError> {
        let session = self
            .session
            .read()
            .map_err(|source| GatewayError::Session { operation, source })?;
        Ok(match session {
            Some(session) if session.is_expired(Utc::now()) => {
                debug!(operation, "gateway: stored session expired, sending without credentials");
                None
            }
            Some(session) => Some(session.access_token),
            None => None,
        })
    }

    async fn dispatch<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: ApiRequest,
    ) -> Result<T, GatewayError> {
        let request = request.with_bearer_token(self.bearer_token(operation)?);
        debug!(
            operation,
            method = %request.method,
            path = %request.path(),
            "gateway: dispatching request"
        );
        let response = self
            .transport
            .send(request)
            .await
            .map_err(|source| GatewayError::Transport { operation, source })?;
        decode_response(operation, &response)
    }
}

fn encode_body<B: Serialize>(operation: &'static str, body: &B) -> Result<Value, GatewayError> {
    serde_json::to_value(body).map_err(|source| GatewayError::Encode { operation, source })
}

/// Flattens a serializable struct into query pairs; `null` fields are omitted.
fn encode_query<Q: Serialize>(
    operation: &'static str,
    query: &Q,
) -> Result<Vec<(String, String)>, GatewayError> {
    let value = encode_body(operation, query)?;
    let Value::Object(fields) = value else {
        return Err(GatewayError::Encode {
            operation,
            source: serde::ser::Error::custom("query parameters must serialize to an object"),
        });
    };
    Ok(fields
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::Null => None,
            Value::String(text) => Some((key, text)),
            other => Some((key, other.to_string())),
        })
        .collect())
}

fn decode_response<T: DeserializeOwned>(
    operation: &'static str,
    response: &RawResponse,
) -> Result<T, GatewayError> {
    if !response.is_success() {
        let body = serde_json::from_slice::<ApiErrorBody>(&response.body).unwrap_or_default();
        let message = body
            .detail()
            .map(str::to_string)
            .or_else(|| {
                reqwest::StatusCode::from_u16(response.status)
                    .ok()
                    .and_then(|status| status.canonical_reason())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| "no detail provided".to_string());
        warn!(
            operation,
            status = response.status,
            %message,
            "gateway: request rejected"
        );
        return Err(GatewayError::Rejected {
            operation,
            status: response.status,
            code: ErrorCode::from_status(response.status),
            message,
        });
    }

    let body: &[u8] = if response.body.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        &response.body
    };
    serde_json::from_slice(body).map_err(|source| GatewayError::Malformed { operation, source })
}

#[cfg(test)]
#[path = "../tests/gateway_tests.rs"]
mod tests;
