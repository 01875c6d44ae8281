//! Runtime execution modes.
//!
//! - `browse`: interactive line-oriented catalog browser

pub mod browse;
