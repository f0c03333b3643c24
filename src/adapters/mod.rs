//! Production adapters implementing the crate's trait seams.

pub mod mock;
mod reqwest_http;

pub use reqwest_http::ReqwestHttpClient;
