#![forbid(unsafe_code)]

//! HTTP plumbing for tenantctl.
//!
//! [`http`] defines one request/response exchange and the base reqwest transport,
//! [`retry`] layers rate-limit and transient-error retries on top of any transport, and
//! [`client`] speaks the management API through the resulting chain.

pub mod client;
pub mod http;
pub mod retry;

pub use crate::client::{AccessToken, ClientError, ManagementClient, Resource};
pub use crate::http::{ErrorKind, HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportError};
pub use crate::retry::{RateLimitConfig, RetryConfig, resilient_transport};
