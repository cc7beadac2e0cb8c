//! Client core for the place-discovery service: a typed request gateway over
//! the HTTP API and observable trackers that front ends bind to.

pub mod config;
pub mod emoji;
pub mod error;
pub mod gateway;
pub mod hooks;
pub mod places;
pub mod session;
pub mod tracker;
pub mod transport;

pub use config::{load_settings, ClientSettings, SettingsError};
pub use error::{GatewayError, SessionError, TransportError};
pub use gateway::{ApiGateway, DEFAULT_RECOMMENDATION_LIMIT};
pub use hooks::{ApiHooks, BookmarkApi, PreferenceApi, ReviewApi, StoreApi, UserApi};
pub use session::{FileSessionStore, InMemorySessionStore, Session, SessionStore};
pub use tracker::{format_operation_error, OperationState, OperationTracker};
pub use transport::{ApiRequest, HttpTransport, MissingTransport, RawResponse, Transport};
