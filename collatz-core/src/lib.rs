//! Core force-directed Collatz graph simulation library.
//!
//! Main components:
//! - [`config`] — tunable simulation parameters.
//! - [`node`] — graph vertices with physics state.
//! - [`graph`] — the live node registry and edge operations.
//! - [`collatz`] — sequence generators that grow the graph.
//! - [`phases`] — per-frame simulation pipeline.
//! - [`types`] — shared type aliases and IDs.

pub mod collatz;
pub mod config;
pub mod graph;
pub mod node;
pub mod phases;
pub mod types;
