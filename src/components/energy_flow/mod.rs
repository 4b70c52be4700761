mod component;
mod controller;
mod frame_loop;
pub mod geometry;
mod icons;
pub mod particles;
pub mod paths;
mod render;
pub mod snapshot;
mod state;
pub mod topology;
mod types;

pub use component::EnergyFlowCanvas;
pub use controller::EnergyFlowController;
pub use snapshot::{EnergySnapshot, PowerValue, RoleReading};
pub use state::{EnergyFlowState, LoopPhase};
pub use types::{FlowData, FlowLink, FlowNode, FlowState, LinkKey, NodeRole};
