//! Conversion between [`ocal_core::Event`] and Graph event resources.

mod from_graph;
mod to_graph;
pub mod types;

pub use from_graph::{FromGraph, normalize_fractional_seconds};
pub use to_graph::ToGraph;
pub use types::GraphEvent;
