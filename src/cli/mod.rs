//! CLI-specific utilities for indoor-wayfinder
//!
//! This module contains code specific to the command-line interface,
//! separate from the core library functionality.

pub mod output;

pub use output::{format_pois, format_route};
