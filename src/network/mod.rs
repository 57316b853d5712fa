pub mod forward;
pub mod layer;
pub mod net;
pub mod persist;
pub mod spec;
pub mod topology;

pub use layer::Layer;
pub use net::Net;
pub use persist::WEIGHTS_FILE;
pub use spec::{NetSpec, TopologySpec};
pub use topology::Topology;
