mod class_names;
mod component;
mod config;
mod dom;
mod forces;
mod geometry;
mod interaction;
mod render;
mod simulation;
mod state;
mod types;

pub use class_names::CLASS_NAMES;
pub use component::HierarchyGraph;
pub use config::LayoutConfig;
pub use types::{GraphData, GraphLink, GraphNode, NetworkKind, TimeState};
