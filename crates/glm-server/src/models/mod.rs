//! Request/response bodies of the HTTP API.

pub mod status;
pub mod stream;

pub use status::{CheckResponse, StatusResponse};
pub use stream::{StreamFrame, StreamRequest};
