mod client;

pub use client::{query_string, ApiClient, ApiError, Operation};
