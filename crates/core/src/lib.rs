//! Core library for live face following: detect the largest face in a
//! camera stream, keep a correlation tracker locked onto it, and turn
//! its position into per-axis steering directives for the platform
//! operator.
//!
//! Each concern is split into a `domain` layer (traits and pure logic)
//! and an `infrastructure` layer (rustface detection, MOSSE tracking,
//! nokhwa capture, minifb display), so the frame loop in `pipeline` can
//! be exercised end to end with test doubles.

pub mod detection;
pub mod pipeline;
pub mod shared;
pub mod steering;
pub mod tracking;
pub mod video;
