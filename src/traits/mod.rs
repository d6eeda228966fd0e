//! Trait abstractions for dependency injection and testability.
//!
//! - [`HttpClient`] - HTTP operations used by [`ChatClient`](crate::client::ChatClient)

pub mod http;

pub use http::{ByteStream, Headers, HttpClient, Response};
