mod alu;
mod crypto;
mod flow;
mod predicate;

#[cfg(feature = "debug")]
mod debug;

pub use super::common;
