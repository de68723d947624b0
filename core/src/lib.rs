//! Client core of the Wintender administrative dashboard.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values for every
//! REST endpoint the dashboard consumes (host-does-IO pattern), and layers
//! the dashboard's read/write conventions on top: cached queries, mutations
//! with standard notifications, and an explicit session context.
//!
//! # Design
//! - `WintenderClient` is stateless; it holds only `base_url`.
//! - A `Transport` executes requests; `UreqTransport` is the blocking default.
//! - `Dashboard` ties client, transport, `AppContext`, `QueryCache` and a
//!   `Notifier` together.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod countdown;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod format;
pub mod http;
pub mod logging;
pub mod mutation;
pub mod notify;
pub mod query;
pub mod session;
pub mod store;
pub mod table;
pub mod transport;
pub mod types;

pub use client::WintenderClient;
pub use config::{ConfigError, DashboardConfig};
pub use dashboard::{Dashboard, RefetchIntervals};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, MultipartForm, RequestBody};
pub use mutation::{FailureKind, Mutation, MutationStatus};
pub use notify::{Notifier, RecordingNotifier, TracingNotifier};
pub use query::{CacheKey, QueryCache, Resource};
pub use session::{AppContext, Session, SessionUser};
pub use transport::{Transport, UreqTransport};
pub use types::*;
