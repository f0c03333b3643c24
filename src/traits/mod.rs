//! Trait abstractions for external dependencies.
//!
//! These traits are the crate's dependency-injection seams. Production
//! adapters live in [`crate::adapters`]; mock implementations for tests
//! live in [`crate::adapters::mock`].

mod http;

pub use http::{HttpClient, HttpError, Response};
