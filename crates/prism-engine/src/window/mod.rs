//! Platform window + event loop.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
