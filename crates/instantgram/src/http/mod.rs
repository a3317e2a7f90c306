//! HTTP layer: request descriptors, the transport seam and the
//! authenticated client on top of it.

mod client;
pub mod endpoints;
mod request;
mod response;
mod transport;

pub use client::{
    ApiClient, AuthEvent, LogoutReason, MAX_AUTH_RETRIES, RetryDecision, retry_decision,
};
pub use request::{ApiRequest, FormPart, MultipartForm, RequestBody};
pub use response::ApiResponse;
pub use transport::{REQUEST_TIMEOUT, ReqwestTransport, Transport};
