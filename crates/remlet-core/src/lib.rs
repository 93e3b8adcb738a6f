//! remlet-core: Core types for the remlet job launcher
//!
//! This crate provides the fundamental types used throughout remlet:
//! - Inference job descriptions
//! - GPU class placement requests
//! - Configuration types
//! - Error handling

pub mod config;
pub mod error;
pub mod gpu;
pub mod job;

pub use config::*;
pub use error::*;
pub use gpu::*;
pub use job::*;
