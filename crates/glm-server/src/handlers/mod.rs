//! HTTP request handlers for API endpoints.

pub mod control;
pub mod index;
pub mod stream;

pub use control::{handle_check, handle_interrupt};
pub use index::handle_index;
pub use stream::handle_stream;
