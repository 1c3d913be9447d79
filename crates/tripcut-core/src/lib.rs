//! Tripcut Core - Foundation types for the vlog pipeline
//!
//! This crate provides the types shared by every pipeline stage:
//! - Sampled frames and the ordered frame sequence
//! - Timestamp formatting and parsing
//! - Output dimension scaling

pub mod error;
pub mod frame;
pub mod geometry;
pub mod time;

pub use error::{Result, TripcutError};
pub use frame::{Frame, FrameSequence, SharedFrameSequence};
pub use geometry::Dimensions;
pub use time::{format_timestamp, parse_timestamp};
