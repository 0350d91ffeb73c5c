//! Transport-independent request boundary.
//!
//! Parses a request (query string for reads, JSON body for writes), calls
//! the session engine and renders the `{ success, data }` /
//! `{ error, details }` envelopes with their status codes. An HTTP server,
//! the `api` CLI command and the tests all go through [`handle`].

pub mod params;
pub mod request;
pub mod response;
pub mod routes;

pub use request::{Method, Request};
pub use response::Response;
pub use routes::{ROUTE_PREFIX, handle};
