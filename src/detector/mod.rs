//! Region extraction from binary masks
//!
//! Outer borders of top-level regions, traced on top of
//! `imageproc::contours` so that regions touching the image frame are found
//! too.

/// Outer border tracing on top of `imageproc::contours`
pub mod contours;
