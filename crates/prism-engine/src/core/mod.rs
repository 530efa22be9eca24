//! Core engine-facing contracts.
//!
//! This module defines the stable interface between the runtime (platform
//! loop) and collaborator applications: a per-frame context plus the `App`
//! callback trait. Runtime internals never leak into user code.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
