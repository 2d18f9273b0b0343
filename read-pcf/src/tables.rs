//! The PCF tables

pub mod accelerators;
pub mod bitmaps;
pub mod encoding;
pub mod metrics;
pub mod properties;
