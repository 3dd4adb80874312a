//! JSON wire codec: handshake, status, recipe, and response shapes.
//!
//! Per spec.md §4.2/§9, framing is newline-delimited JSON: each message is
//! exactly one JSON value terminated by `\n`. See [`crate::connection`]
//! for the reader that turns a byte stream into a sequence of these.

pub mod handshake;
pub mod recipe;
pub mod response;
pub mod status;

pub use handshake::{parse_handshake, Handshake};
pub use recipe::parse_recipe;
pub use response::ResponseBuilder;
pub use status::Status;
