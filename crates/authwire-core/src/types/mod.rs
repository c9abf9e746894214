//! Core request-layer types.
//!
//! These types enforce their invariants at construction time, so the
//! executor and transports never see an unvalidated URL or method.

mod api_url;
mod http;

pub use api_url::ApiUrl;
pub use http::{Body, Headers, HttpRequest, HttpResponse, Method, Part};
