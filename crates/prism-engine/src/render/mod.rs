//! GPU rendering subsystem.
//!
//! Pass objects consume a [`RenderCtx`] and record commands into a
//! [`RenderTarget`]. Each pass is responsible for its own GPU resources
//! (pipelines, bind group layouts, samplers).

mod ctx;
pub mod present;

pub use ctx::{RenderCtx, RenderTarget};
