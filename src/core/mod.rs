//! Core library modules for indoor-wayfinder
//!
//! Data model, weight policy, graph compilation, shortest-path search, route
//! reconstruction and the engine that ties them together.

pub mod config;
pub mod dijkstra;
pub mod engine;
pub mod error;
pub mod graph;
pub mod model;
pub mod route;
pub mod source;
pub mod weight;
