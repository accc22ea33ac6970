//! CLI library components for the staffport exporter.

pub mod logging;
pub mod selection;
