//! Force-directed layout of activity nodes around a ring of person anchors.
//!
//! The host owns the frame cadence and calls [`LayoutSimulator::tick`] with the
//! elapsed time; the simulator turns that into fixed integration steps.

mod arena;
mod config;
mod sim;

pub use arena::{LayoutNode, NodeArena, NodeId, Vec2};
pub use config::LayoutConfig;
pub use sim::{LayoutGraph, LayoutSimulator, Phase, SurfaceSize};
