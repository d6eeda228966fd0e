//! Mock implementations for testing.
//!
//! - [`MockHttpClient`] - HTTP client with configurable responses and
//!   stream-release tracking

pub mod http;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
